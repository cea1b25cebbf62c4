//! Structured reply parsing.
//!
//! Replies are free text expected to hold one JSON object, optionally inside a
//! triple-backtick fence. Parsing is strict: a missing required field or a
//! field of the wrong type rejects the whole reply, and the caller falls back.

use pawlog_core::models::{
    ActivityLevel, HealthLog, LogType, Mood, Severity, Symptom, Urgency,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::language::Language;

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::JsonParse(_) => "json_parse",
            ExtractionError::InvalidFormat(_) => "invalid_format",
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_open = &trimmed[start + 3..];
    // The opening fence line may carry a language tag.
    let body = match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => after_open.trim_start_matches("json"),
    };
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

fn parse_object<T: DeserializeOwned>(text: &str) -> ExtractionResult<T> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ExtractionError::InvalidFormat("empty reply".into()));
    }
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(ExtractionError::InvalidFormat(
            "reply is not a JSON object".into(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

// =========================================================================
// Chat
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ChatReply {
    pub fn fallback(language: Language) -> Self {
        Self {
            answer: language.chat_fallback().to_string(),
            follow_up_questions: Vec::new(),
            sources: Vec::new(),
        }
    }
}

pub fn parse_chat_reply(text: &str) -> ExtractionResult<ChatReply> {
    parse_object(text)
}

// =========================================================================
// Symptom triage
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysis {
    pub urgency: Urgency,
    pub analysis: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl SymptomAnalysis {
    /// Unanalyzed symptoms are treated as needing observation.
    pub fn fallback(language: Language) -> Self {
        Self {
            urgency: Urgency::Warning,
            analysis: language.symptom_fallback().to_string(),
            recommendations: language.symptom_fallback_recommendations(),
        }
    }
}

pub fn parse_symptom_analysis(text: &str) -> ExtractionResult<SymptomAnalysis> {
    parse_object(text)
}

// =========================================================================
// Voice transcript
// =========================================================================

/// Symptom mentioned in a voice note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSymptom {
    pub symptom_type: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

/// Log fields extracted from a voice note.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceLog {
    #[serde(rename = "type", default)]
    pub log_type: LogType,
    #[serde(default)]
    pub wet_food_amount: Option<f64>,
    #[serde(default)]
    pub dry_food_amount: Option<f64>,
    #[serde(default)]
    pub snack_amount: Option<f64>,
    #[serde(default)]
    pub snack_type: Option<String>,
    #[serde(default)]
    pub water_amount: Option<f64>,
    #[serde(default)]
    pub litter_count: Option<u32>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub symptom: Option<VoiceSymptom>,
}

impl VoiceLog {
    /// Health log for `cat_id` stamped at `now_millis`.
    pub fn to_health_log(&self, cat_id: &str, now_millis: i64) -> HealthLog {
        let mut log = HealthLog::new(cat_id, self.log_type, now_millis);
        log.wet_food_amount = self.wet_food_amount;
        log.dry_food_amount = self.dry_food_amount;
        log.snack_amount = self.snack_amount;
        log.snack_type = self.snack_type.clone();
        log.water_amount = self.water_amount;
        log.litter_count = self.litter_count;
        log.activity_level = self.activity_level;
        log.mood = self.mood;
        log.notes = self.notes.clone();
        log
    }

    /// Symptom report for the embedded symptom, if one was mentioned.
    pub fn to_symptom(&self, cat_id: &str, now_millis: i64) -> Option<Symptom> {
        let symptom = self.symptom.as_ref()?;
        if symptom.symptom_type.trim().is_empty() {
            return None;
        }
        Some(
            Symptom::new(cat_id, symptom.symptom_type.trim(), symptom.severity, now_millis)
                .with_description(symptom.description.clone()),
        )
    }
}

/// Outcome of voice-transcript extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceParse {
    Parsed(VoiceLog),
    /// Nothing loggable, or the reply could not be used
    Failed,
}

impl VoiceParse {
    pub fn is_success(&self) -> bool {
        matches!(self, VoiceParse::Parsed(_))
    }

    pub fn log(&self) -> Option<&VoiceLog> {
        match self {
            VoiceParse::Parsed(log) => Some(log),
            VoiceParse::Failed => None,
        }
    }
}

#[derive(Deserialize)]
struct VoiceEnvelope {
    success: bool,
}

/// `{"success": false}` is a valid reply meaning nothing could be extracted.
pub fn parse_voice_reply(text: &str) -> ExtractionResult<VoiceParse> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body)?;
    let envelope: VoiceEnvelope = serde_json::from_value(value.clone())?;
    if !envelope.success {
        return Ok(VoiceParse::Failed);
    }
    Ok(VoiceParse::Parsed(serde_json::from_value(value)?))
}
