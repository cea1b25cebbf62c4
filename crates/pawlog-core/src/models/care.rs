//! Weight, vet visit, prescription and mood records.

use serde::{Deserialize, Serialize};

use super::health_log::Mood;
use crate::store::{OwnedRecord, Record, Timestamped};

/// A weight measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightLog {
    pub id: String,
    pub cat_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Kilograms
    pub weight: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WeightLog {
    pub fn new(cat_id: impl Into<String>, weight_kg: f64, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.into(),
            timestamp: now_millis,
            weight: weight_kg,
            notes: None,
        }
    }
}

/// A veterinary visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VetVisit {
    pub id: String,
    pub cat_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VetVisit {
    pub fn new(cat_id: impl Into<String>, reason: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.into(),
            timestamp: now_millis,
            clinic_name: String::new(),
            reason: reason.into(),
            diagnosis: None,
            notes: None,
        }
    }
}

/// A prescription issued at a vet visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub cat_id: String,
    pub visit_id: String,
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Prescription {
    pub fn new(visit: &VetVisit, medication: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: visit.cat_id.clone(),
            visit_id: visit.id.clone(),
            medication: medication.into(),
            dosage: String::new(),
            frequency: String::new(),
            duration_days: None,
            notes: None,
        }
    }
}

/// A mood observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: String,
    pub cat_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub mood: Mood,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MoodLog {
    pub fn new(cat_id: impl Into<String>, mood: Mood, now_millis: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.into(),
            timestamp: now_millis,
            mood,
            notes: None,
        }
    }
}

impl Record for WeightLog {
    const COLLECTION: &'static str = "weight-logs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for WeightLog {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Timestamped for WeightLog {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Record for VetVisit {
    const COLLECTION: &'static str = "vet-visits";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for VetVisit {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Timestamped for VetVisit {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Record for Prescription {
    const COLLECTION: &'static str = "prescriptions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for Prescription {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Record for MoodLog {
    const COLLECTION: &'static str = "mood-logs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for MoodLog {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Timestamped for MoodLog {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
