//! Pawlog Core Library
//!
//! Local-first cat health tracking: profiles, daily logs, symptoms and care
//! records kept in client-local key-value storage.
//!
//! # Architecture
//!
//! ```text
//! action ──▶ container (state) ──▶ repository (repo) ──▶ collection (store)
//!                 │                                          read-all / write-all
//!                 │
//!                 ├──▶ subscribers (view refresh)
//!                 └──▶ Notifier (notify) ──▶ NotificationCenter + observers
//! ```
//!
//! # Modules
//!
//! - [`store`]: key-value backends and the generic JSON collection
//! - [`models`]: domain types (Cat, HealthLog, Symptom, care records, chat)
//! - [`repo`]: per-entity repositories with their query rules
//! - [`state`]: view-state containers and the notification center
//! - [`notify`]: notification/telemetry publish point
//! - [`clock`]: injectable time source

pub mod clock;
pub mod config;
pub mod models;
pub mod notify;
pub mod repo;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use models::{
    ActivityLevel, Cat, ChatMessage, Conversation, HealthLog, LogType, Mood, MoodLog,
    Prescription, Role, Severity, Symptom, Urgency, VetVisit, WeightLog,
};
pub use notify::{EventObserver, Notifier, TelemetryEvent, TracingObserver};
pub use state::{HealthStore, Notice, NoticeDraft, NoticeSeverity, ProfileStore};
pub use store::{KvStore, MemoryKv, Patch, SqliteKv, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use repo::{ChatHistoryRepository, ConversationRepository, HealthLogRepository, SymptomRepository};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PawlogError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StoreError> for PawlogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidPatch(msg) => PawlogError::InvalidInput(msg),
            StoreError::Json(e) => PawlogError::SerializationError(e.to_string()),
            other => PawlogError::StorageError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for PawlogError {
    fn from(e: serde_json::Error) -> Self {
        PawlogError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PawlogError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PawlogError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store at the given path.
#[uniffi::export]
pub fn open_pawlog(path: String) -> Result<Arc<PawlogCore>, PawlogError> {
    let kv = StoreConfig::File(path.into()).open()?;
    Ok(Arc::new(PawlogCore::with_parts(
        Arc::new(kv),
        Arc::new(SystemClock),
    )))
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_pawlog_in_memory() -> Result<Arc<PawlogCore>, PawlogError> {
    let kv = StoreConfig::InMemory.open()?;
    Ok(Arc::new(PawlogCore::with_parts(
        Arc::new(kv),
        Arc::new(SystemClock),
    )))
}

/// Install the global `tracing` subscriber.
///
/// `filter` uses `EnvFilter` syntax (e.g. `"info,pawlog_core=debug"`); an
/// invalid filter falls back to `info`. Calling this more than once is a no-op.
#[uniffi::export]
pub fn init_logging(filter: String) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe facade over the containers for FFI.
///
/// Locks are always taken profile first, then health.
#[derive(uniffi::Object)]
pub struct PawlogCore {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<Notifier>,
    profile: Arc<Mutex<ProfileStore>>,
    health: Arc<Mutex<HealthStore>>,
}

impl PawlogCore {
    /// Wire the containers over an existing backend and clock.
    pub fn with_parts(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let notifier = Arc::new(Notifier::new(clock.clone()));
        notifier.subscribe(Arc::new(TracingObserver));

        let profile = ProfileStore::load(kv.clone(), notifier.clone());
        let mut health = HealthStore::new(kv.clone(), clock.clone(), notifier.clone());
        if let Some(cat) = profile.selected() {
            health.load_for_cat(&cat.id);
        }

        Self {
            kv,
            clock,
            notifier,
            profile: Arc::new(Mutex::new(profile)),
            health: Arc::new(Mutex::new(health)),
        }
    }

    /// Shared notifier, for attaching observers.
    pub fn notifier(&self) -> Arc<Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Reload the health caches when the selected cat changed.
    fn follow_selection(profile: &ProfileStore, health: &mut HealthStore) {
        let selected = profile.selected().map(|c| c.id.as_str());
        if health.state().cat_id.as_deref() == selected {
            return;
        }
        match selected {
            Some(cat_id) => health.load_for_cat(cat_id),
            None => health.clear(),
        }
    }

    fn selected_cat_id(profile: &ProfileStore) -> Result<String, PawlogError> {
        profile
            .selected()
            .map(|c| c.id.clone())
            .ok_or_else(|| PawlogError::InvalidInput("no cat selected".to_string()))
    }
}

#[uniffi::export]
impl PawlogCore {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// All cat profiles in insertion order.
    pub fn list_cats(&self) -> Result<Vec<FfiCat>, PawlogError> {
        let profile = self.profile.lock()?;
        Ok(profile.cats().iter().cloned().map(Into::into).collect())
    }

    pub fn selected_cat(&self) -> Result<Option<FfiCat>, PawlogError> {
        let profile = self.profile.lock()?;
        Ok(profile.selected().cloned().map(Into::into))
    }

    /// Create a cat profile.
    pub fn add_cat(&self, cat: FfiNewCat) -> Result<FfiCat, PawlogError> {
        if cat.name.trim().is_empty() {
            return Err(PawlogError::InvalidInput("cat name is empty".to_string()));
        }
        let mut profile = self.profile.lock()?;
        let mut health = self.health.lock()?;

        let mut record = Cat::new(cat.name.trim(), self.clock.now_millis())
            .with_breed(cat.breed)
            .with_neutered(cat.neutered)
            .with_chronic_conditions(cat.chronic_conditions);
        record.weight = cat.weight_kg;
        record.birth_date = cat.birth_date;
        record.gender = cat.gender;

        profile.add_cat(record.clone())?;
        Self::follow_selection(&profile, &mut health);
        Ok(record.into())
    }

    /// Merge a JSON object of camelCase fields into a cat profile.
    pub fn update_cat(&self, id: String, patch_json: String) -> Result<Option<FfiCat>, PawlogError> {
        let patch = parse_patch(&patch_json)?;
        let mut profile = self.profile.lock()?;
        Ok(profile.update_cat(&id, &patch)?.map(Into::into))
    }

    /// Delete a cat profile. Its records are left in storage.
    pub fn delete_cat(&self, id: String) -> Result<bool, PawlogError> {
        let mut profile = self.profile.lock()?;
        let mut health = self.health.lock()?;
        let removed = profile.delete_cat(&id)?;
        Self::follow_selection(&profile, &mut health);
        Ok(removed)
    }

    /// Select a cat. An unknown id clears the selection and returns false.
    pub fn select_cat(&self, id: String) -> Result<bool, PawlogError> {
        let mut profile = self.profile.lock()?;
        let mut health = self.health.lock()?;
        let found = profile.select(&id)?;
        Self::follow_selection(&profile, &mut health);
        Ok(found)
    }

    // =========================================================================
    // Health Log Operations
    // =========================================================================

    /// Cached logs of the selected cat, in storage order.
    pub fn health_logs(&self) -> Result<Vec<FfiHealthLog>, PawlogError> {
        let health = self.health.lock()?;
        Ok(health.health_logs().iter().cloned().map(Into::into).collect())
    }

    /// Logs of the selected cat from the last `days` days, newest first.
    pub fn recent_health_logs(&self, days: u32) -> Result<Vec<FfiHealthLog>, PawlogError> {
        let health = self.health.lock()?;
        Ok(health.recent_logs(days).into_iter().map(Into::into).collect())
    }

    /// Record a health log. `cat_id` defaults to the selected cat, `date` to now.
    pub fn add_health_log(&self, log: FfiNewHealthLog) -> Result<FfiHealthLog, PawlogError> {
        let profile = self.profile.lock()?;
        let mut health = self.health.lock()?;

        let cat_id = match log.cat_id {
            Some(id) if !id.is_empty() => id,
            _ => Self::selected_cat_id(&profile)?,
        };
        let log_type: LogType = parse_label("log type", &log.log_type)?;
        let mut record = match log.date.as_deref() {
            Some(date) if !date.is_empty() => {
                HealthLog::on_date(cat_id, log_type, date, log.time.as_deref()).ok_or_else(|| {
                    PawlogError::InvalidInput(format!(
                        "invalid date/time: {} {}",
                        date,
                        log.time.as_deref().unwrap_or("")
                    ))
                })?
            }
            _ => HealthLog::new(cat_id, log_type, self.clock.now_millis()),
        };
        record.wet_food_amount = log.wet_food_amount;
        record.dry_food_amount = log.dry_food_amount;
        record.snack_amount = log.snack_amount;
        record.snack_type = log.snack_type;
        record.water_amount = log.water_amount;
        record.litter_count = log.litter_count;
        record.activity_level = log
            .activity_level
            .map(|l| parse_label("activity level", &l))
            .transpose()?;
        record.mood = log.mood.map(|m| parse_label("mood", &m)).transpose()?;
        record.notes = log.notes;

        health.add(record.clone())?;
        Ok(record.into())
    }

    /// Merge a JSON object of camelCase fields into a health log.
    pub fn update_health_log(
        &self,
        id: String,
        patch_json: String,
    ) -> Result<Option<FfiHealthLog>, PawlogError> {
        let patch = parse_patch(&patch_json)?;
        let mut health = self.health.lock()?;
        let merged: Option<HealthLog> = health.update(&id, &patch)?;
        Ok(merged.map(Into::into))
    }

    pub fn delete_health_log(&self, id: String) -> Result<bool, PawlogError> {
        let mut health = self.health.lock()?;
        Ok(health.delete::<HealthLog>(&id)?)
    }

    /// Logs of the selected cat dated `date` (`YYYY-MM-DD`).
    pub fn health_logs_on(&self, date: String) -> Result<Vec<FfiHealthLog>, PawlogError> {
        let cat_id = Self::selected_cat_id(&*self.profile.lock()?)?;
        Ok(HealthLogRepository::new(self.kv.clone(), self.clock.clone())
            .get_by_date(&cat_id, &date)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Grams of food logged for the selected cat on `date`.
    pub fn food_total_on(&self, date: String) -> Result<f64, PawlogError> {
        let cat_id = Self::selected_cat_id(&*self.profile.lock()?)?;
        Ok(HealthLogRepository::new(self.kv.clone(), self.clock.clone())
            .get_by_date(&cat_id, &date)
            .iter()
            .map(HealthLog::total_food)
            .sum())
    }

    // =========================================================================
    // Symptom Operations
    // =========================================================================

    /// Cached symptom reports of the selected cat.
    pub fn symptoms(&self) -> Result<Vec<FfiSymptom>, PawlogError> {
        let health = self.health.lock()?;
        Ok(health.symptoms().iter().cloned().map(Into::into).collect())
    }

    /// Report symptoms for the selected cat from a 1-10 severity slider.
    pub fn add_symptom(
        &self,
        symptom_types: Vec<String>,
        severity_slider: u8,
        description: String,
    ) -> Result<FfiSymptom, PawlogError> {
        let symptom_type = Symptom::join_types(&symptom_types);
        if symptom_type.is_empty() {
            return Err(PawlogError::InvalidInput("no symptom selected".to_string()));
        }
        let profile = self.profile.lock()?;
        let mut health = self.health.lock()?;
        let cat_id = Self::selected_cat_id(&profile)?;

        let record = Symptom::new(
            cat_id,
            symptom_type,
            Severity::from_slider(severity_slider),
            self.clock.now_millis(),
        )
        .with_description(description);
        health.add(record.clone())?;
        Ok(record.into())
    }

    /// Store a triage result on a symptom report.
    pub fn set_symptom_urgency(
        &self,
        id: String,
        urgency: String,
    ) -> Result<Option<FfiSymptom>, PawlogError> {
        let urgency: Urgency = parse_label("urgency", &urgency)?;
        let mut patch = Patch::new();
        patch.insert("urgency".to_string(), Value::String(urgency.as_str().to_string()));

        let mut health = self.health.lock()?;
        let merged: Option<Symptom> = health.update(&id, &patch)?;
        Ok(merged.map(Into::into))
    }

    pub fn delete_symptom(&self, id: String) -> Result<bool, PawlogError> {
        let mut health = self.health.lock()?;
        Ok(health.delete::<Symptom>(&id)?)
    }

    /// Symptoms of the selected cat triaged at `urgency` or above.
    pub fn symptoms_at_least(&self, urgency: String) -> Result<Vec<FfiSymptom>, PawlogError> {
        let urgency: Urgency = parse_label("urgency", &urgency)?;
        let cat_id = Self::selected_cat_id(&*self.profile.lock()?)?;
        Ok(SymptomRepository::new(self.kv.clone(), self.clock.clone())
            .get_at_least(&cat_id, urgency)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Weight / Mood Operations
    // =========================================================================

    /// Weights of the selected cat, oldest first.
    pub fn weights(&self) -> Result<Vec<FfiWeightLog>, PawlogError> {
        let health = self.health.lock()?;
        Ok(health.weights().iter().cloned().map(Into::into).collect())
    }

    pub fn add_weight(&self, weight_kg: f64, notes: Option<String>) -> Result<FfiWeightLog, PawlogError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(PawlogError::InvalidInput(format!("invalid weight: {}", weight_kg)));
        }
        let profile = self.profile.lock()?;
        let mut health = self.health.lock()?;
        let cat_id = Self::selected_cat_id(&profile)?;

        let mut record = WeightLog::new(cat_id, weight_kg, self.clock.now_millis());
        record.notes = notes;
        health.add(record.clone())?;
        Ok(record.into())
    }

    /// Moods of the selected cat, newest first.
    pub fn moods(&self) -> Result<Vec<FfiMoodLog>, PawlogError> {
        let health = self.health.lock()?;
        Ok(health.moods().iter().cloned().map(Into::into).collect())
    }

    pub fn add_mood(&self, mood: String, notes: Option<String>) -> Result<FfiMoodLog, PawlogError> {
        let mood: Mood = parse_label("mood", &mood)?;
        let profile = self.profile.lock()?;
        let mut health = self.health.lock()?;
        let cat_id = Self::selected_cat_id(&profile)?;

        let mut record = MoodLog::new(cat_id, mood, self.clock.now_millis());
        record.notes = notes;
        health.add(record.clone())?;
        Ok(record.into())
    }

    // =========================================================================
    // Chat History Operations
    // =========================================================================

    /// Persisted chat messages for a cat, or the global conversation if `None`.
    pub fn chat_history(&self, cat_id: Option<String>) -> Vec<FfiChatMessage> {
        ChatHistoryRepository::new(self.kv.clone())
            .get_by_cat(cat_id.as_deref())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Remove one conversation's messages. Returns how many were removed.
    pub fn clear_chat_history(&self, cat_id: Option<String>) -> Result<u32, PawlogError> {
        let removed = ChatHistoryRepository::new(self.kv.clone()).clear(cat_id.as_deref())?;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }

    /// Saved AI conversations, most recently updated first.
    pub fn conversations(&self) -> Vec<FfiConversation> {
        ConversationRepository::new(self.kv.clone())
            .get_all()
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub fn conversation_messages(&self, id: String) -> Vec<FfiChatMessage> {
        ConversationRepository::new(self.kv.clone())
            .get(&id)
            .map(|c| c.messages.into_iter().map(Into::into).collect())
            .unwrap_or_default()
    }

    pub fn delete_conversation(&self, id: String) -> Result<bool, PawlogError> {
        Ok(ConversationRepository::new(self.kv.clone()).delete(&id)?)
    }

    // =========================================================================
    // Notification Operations
    // =========================================================================

    /// Active notices, most recent first.
    pub fn active_notices(&self) -> Vec<FfiNotice> {
        self.notifier.active().into_iter().map(Into::into).collect()
    }

    pub fn dismiss_notice(&self, id: String) -> bool {
        self.notifier.dismiss(&id)
    }

    /// Epoch millis of the next auto-dismiss, for scheduling a refresh.
    pub fn next_notice_expiry(&self) -> Option<i64> {
        self.notifier.next_expiry()
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn parse_patch(json: &str) -> Result<Patch, PawlogError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(store::patch_from_value(value)?)
}

/// Parse a lowercase enum label such as `"meal"` or `"warning"`.
fn parse_label<T: DeserializeOwned>(what: &str, label: &str) -> Result<T, PawlogError> {
    serde_json::from_value(Value::String(label.trim().to_lowercase()))
        .map_err(|_| PawlogError::InvalidInput(format!("unknown {}: {}", what, label)))
}

fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        _ => String::new(),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe cat profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCat {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub weight_kg: Option<f64>,
    pub neutered: bool,
    pub chronic_conditions: Vec<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub created_at: i64,
}

impl From<Cat> for FfiCat {
    fn from(cat: Cat) -> Self {
        Self {
            id: cat.id,
            name: cat.name,
            breed: cat.breed,
            weight_kg: cat.weight,
            neutered: cat.neutered,
            chronic_conditions: cat.chronic_conditions,
            birth_date: cat.birth_date,
            gender: cat.gender,
            created_at: cat.created_at,
        }
    }
}

/// Input for a new cat profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewCat {
    pub name: String,
    pub breed: String,
    pub weight_kg: Option<f64>,
    pub neutered: bool,
    pub chronic_conditions: Vec<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

/// FFI-safe health log. Enum fields carry their lowercase labels.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthLog {
    pub id: String,
    pub cat_id: String,
    pub date: String,
    pub time: Option<String>,
    pub timestamp: i64,
    pub log_type: String,
    pub wet_food_amount: Option<f64>,
    pub dry_food_amount: Option<f64>,
    pub snack_amount: Option<f64>,
    pub snack_type: Option<String>,
    pub water_amount: Option<f64>,
    pub litter_count: Option<u32>,
    pub activity_level: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
}

impl From<HealthLog> for FfiHealthLog {
    fn from(log: HealthLog) -> Self {
        Self {
            log_type: label(&log.log_type),
            activity_level: log.activity_level.as_ref().map(label),
            mood: log.mood.as_ref().map(label),
            id: log.id,
            cat_id: log.cat_id,
            date: log.date,
            time: log.time,
            timestamp: log.timestamp,
            wet_food_amount: log.wet_food_amount,
            dry_food_amount: log.dry_food_amount,
            snack_amount: log.snack_amount,
            snack_type: log.snack_type,
            water_amount: log.water_amount,
            litter_count: log.litter_count,
            notes: log.notes,
        }
    }
}

/// Input for a new health log.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewHealthLog {
    pub cat_id: Option<String>,
    /// `YYYY-MM-DD`; `None` means now
    pub date: Option<String>,
    /// `HH:MM`; `None` means noon when `date` is given
    pub time: Option<String>,
    pub log_type: String,
    pub wet_food_amount: Option<f64>,
    pub dry_food_amount: Option<f64>,
    pub snack_amount: Option<f64>,
    pub snack_type: Option<String>,
    pub water_amount: Option<f64>,
    pub litter_count: Option<u32>,
    pub activity_level: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
}

/// FFI-safe symptom report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptom {
    pub id: String,
    pub cat_id: String,
    pub date: String,
    pub timestamp: i64,
    pub symptom_type: String,
    pub severity: String,
    pub description: String,
    pub urgency: Option<String>,
}

impl From<Symptom> for FfiSymptom {
    fn from(symptom: Symptom) -> Self {
        Self {
            severity: label(&symptom.severity),
            urgency: symptom.urgency.map(|u| u.as_str().to_string()),
            id: symptom.id,
            cat_id: symptom.cat_id,
            date: symptom.date,
            timestamp: symptom.timestamp,
            symptom_type: symptom.symptom_type,
            description: symptom.description,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeightLog {
    pub id: String,
    pub cat_id: String,
    pub timestamp: i64,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

impl From<WeightLog> for FfiWeightLog {
    fn from(log: WeightLog) -> Self {
        Self {
            id: log.id,
            cat_id: log.cat_id,
            timestamp: log.timestamp,
            weight_kg: log.weight,
            notes: log.notes,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMoodLog {
    pub id: String,
    pub cat_id: String,
    pub timestamp: i64,
    pub mood: String,
    pub notes: Option<String>,
}

impl From<MoodLog> for FfiMoodLog {
    fn from(log: MoodLog) -> Self {
        Self {
            mood: label(&log.mood),
            id: log.id,
            cat_id: log.cat_id,
            timestamp: log.timestamp,
            notes: log.notes,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatMessage {
    pub id: String,
    pub cat_id: Option<String>,
    pub role: String,
    pub content: String,
    pub timestamp: i64,
}

impl From<ChatMessage> for FfiChatMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: label(&message.role),
            id: message.id,
            cat_id: message.cat_id,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConversation {
    pub id: String,
    pub cat_id: Option<String>,
    pub title: String,
    pub message_count: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Conversation> for FfiConversation {
    fn from(conversation: Conversation) -> Self {
        Self {
            message_count: u32::try_from(conversation.messages.len()).unwrap_or(u32::MAX),
            id: conversation.id,
            cat_id: conversation.cat_id,
            title: conversation.title,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

/// FFI-safe notice. `metadata` is a JSON string.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotice {
    pub id: String,
    pub kind: String,
    pub severity: String,
    pub message: Option<String>,
    pub translation_key: Option<String>,
    pub params: HashMap<String, String>,
    pub metadata: Option<String>,
    pub created_at: i64,
    pub auto_dismiss_ms: u64,
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        Self {
            severity: notice.severity.as_str().to_string(),
            metadata: notice.metadata.as_ref().map(Value::to_string),
            id: notice.id,
            kind: notice.kind,
            message: notice.message,
            translation_key: notice.translation_key,
            params: notice.params.into_iter().collect(),
            created_at: notice.created_at,
            auto_dismiss_ms: notice.auto_dismiss_ms,
        }
    }
}
