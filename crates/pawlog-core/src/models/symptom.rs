//! Symptom reports and triage levels.

use serde::{Deserialize, Serialize};

use crate::clock::local_date_time;
use crate::store::{OwnedRecord, Record, Timestamped};

/// Owner-reported severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Map a 1-10 slider reading: 3 and below is mild, 7 and below moderate.
    pub fn from_slider(value: u8) -> Self {
        match value {
            0..=3 => Severity::Mild,
            4..=7 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }
}

/// Triage urgency, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Monitor at home
    Mild,
    /// Needs observation, consider a vet visit
    Warning,
    /// Potentially life-threatening, see a vet now
    Emergency,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Mild => "mild",
            Urgency::Warning => "warning",
            Urgency::Emergency => "emergency",
        }
    }
}

/// A symptom report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: String,
    pub cat_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Free text, possibly several comma-joined selections
    pub symptom_type: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    /// Set once the report has been triaged
    #[serde(default)]
    pub urgency: Option<Urgency>,
}

impl Symptom {
    pub fn new(
        cat_id: impl Into<String>,
        symptom_type: impl Into<String>,
        severity: Severity,
        now_millis: i64,
    ) -> Self {
        let (date, _) = local_date_time(now_millis);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: cat_id.into(),
            date,
            timestamp: now_millis,
            symptom_type: symptom_type.into(),
            severity,
            description: String::new(),
            urgency: None,
        }
    }

    /// Join several selected symptom labels into one `symptom_type`.
    pub fn join_types<S: AsRef<str>>(types: &[S]) -> String {
        types
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }
}

impl Record for Symptom {
    const COLLECTION: &'static str = "symptoms";

    fn id(&self) -> &str {
        &self.id
    }
}

impl OwnedRecord for Symptom {
    fn cat_id(&self) -> &str {
        &self.cat_id
    }
}

impl Timestamped for Symptom {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
