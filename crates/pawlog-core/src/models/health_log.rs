//! Daily health log model.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{local_date_time, local_timestamp};
use crate::store::{OwnedRecord, Record, Timestamped};

/// What a health log entry records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    #[default]
    General,
    Meal,
    Water,
    Litter,
    Weight,
    Symptom,
}

/// Observed activity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Active,
    Normal,
    Lazy,
}

/// Observed mood.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Normal,
    Sad,
    Angry,
}

/// A daily health log entry.
///
/// Deserialization goes through [`StoredHealthLog`] so that legacy entries
/// without `timestamp` or `type` are backfilled on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredHealthLog")]
pub struct HealthLog {
    pub id: String,
    pub cat_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: Option<String>,
    /// Epoch milliseconds, derived from `date` + `time`
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Grams
    pub wet_food_amount: Option<f64>,
    /// Grams
    pub dry_food_amount: Option<f64>,
    pub snack_amount: Option<f64>,
    pub snack_type: Option<String>,
    /// Millilitres
    pub water_amount: Option<f64>,
    pub litter_count: Option<u32>,
    pub activity_level: Option<ActivityLevel>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
}

impl HealthLog {
    /// New log stamped at `now_millis`, with `date` and `time` taken from local time.
    pub fn new(cat_id: impl Into<String>, log_type: LogType, now_millis: i64) -> Self {
        let (date, time) = local_date_time(now_millis);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.into(),
            date,
            time: Some(time),
            timestamp: now_millis,
            log_type,
            wet_food_amount: None,
            dry_food_amount: None,
            snack_amount: None,
            snack_type: None,
            water_amount: None,
            litter_count: None,
            activity_level: None,
            mood: None,
            notes: None,
        }
    }

    /// New log for an explicit local `date` and `time`.
    ///
    /// Returns `None` if the date or time does not parse.
    pub fn on_date(
        cat_id: impl Into<String>,
        log_type: LogType,
        date: &str,
        time: Option<&str>,
    ) -> Option<Self> {
        let timestamp = local_timestamp(date, time)?;
        let mut log = Self::new(cat_id, log_type, timestamp);
        log.date = date.to_string();
        log.time = time.map(str::to_string);
        Some(log)
    }

    /// Total food in grams across wet, dry and snacks.
    pub fn total_food(&self) -> f64 {
        [self.wet_food_amount, self.dry_food_amount, self.snack_amount]
            .into_iter()
            .flatten()
            .sum()
    }
}

impl Record for HealthLog {
    const COLLECTION: &'static str = "health-logs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for HealthLog {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Timestamped for HealthLog {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Stored shape of a health log. Older entries may lack `timestamp` and `type`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredHealthLog {
    id: String,
    cat_id: String,
    #[serde(default)]
    date: String,
    time: Option<String>,
    timestamp: Option<i64>,
    #[serde(rename = "type")]
    log_type: Option<LogType>,
    wet_food_amount: Option<f64>,
    dry_food_amount: Option<f64>,
    snack_amount: Option<f64>,
    snack_type: Option<String>,
    water_amount: Option<f64>,
    litter_count: Option<u32>,
    activity_level: Option<ActivityLevel>,
    mood: Option<Mood>,
    notes: Option<String>,
}

impl From<StoredHealthLog> for HealthLog {
    fn from(stored: StoredHealthLog) -> Self {
        let timestamp = stored.timestamp.unwrap_or_else(|| {
            local_timestamp(&stored.date, stored.time.as_deref()).unwrap_or_else(|| {
                warn!(id = %stored.id, date = %stored.date, "legacy health log has an unparseable date");
                0
            })
        });

        Self {
            id: stored.id,
            cat_id: stored.cat_id,
            date: stored.date,
            time: stored.time,
            timestamp,
            log_type: stored.log_type.unwrap_or_default(),
            wet_food_amount: stored.wet_food_amount,
            dry_food_amount: stored.dry_food_amount,
            snack_amount: stored.snack_amount,
            snack_type: stored.snack_type,
            water_amount: stored.water_amount,
            litter_count: stored.litter_count,
            activity_level: stored.activity_level,
            mood: stored.mood,
            notes: stored.notes,
        }
    }
}
