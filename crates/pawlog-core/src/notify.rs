//! Notification and telemetry channel.
//!
//! [`Notifier`] is the one entry point components use to report state
//! changes. Publishing a [`NoticeDraft`] adds a notice to the shared
//! [`NotificationCenter`] and hands a [`TelemetryEvent`] with the same payload
//! to every registered [`EventObserver`]. Delivery is fire-and-forget: there is
//! no acknowledgement and no retry.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::state::{Notice, NoticeDraft, NoticeSeverity, NotificationCenter, SubscriptionId};

/// Event broadcast to observers for every published notice.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub notice_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: NoticeSeverity,
    pub message: Option<String>,
    pub translation_key: Option<String>,
    pub params: BTreeMap<String, String>,
    pub metadata: Option<Value>,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

impl From<&Notice> for TelemetryEvent {
    fn from(notice: &Notice) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(notice.created_at)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        Self {
            notice_id: notice.id.clone(),
            kind: notice.kind.clone(),
            severity: notice.severity,
            message: notice.message.clone(),
            translation_key: notice.translation_key.clone(),
            params: notice.params.clone(),
            metadata: notice.metadata.clone(),
            timestamp,
        }
    }
}

/// Out-of-band consumer of telemetry events (analytics, logging).
pub trait EventObserver: Send + Sync {
    fn on_event(&self, event: &TelemetryEvent);
}

impl<F> EventObserver for F
where
    F: Fn(&TelemetryEvent) + Send + Sync,
{
    fn on_event(&self, event: &TelemetryEvent) {
        self(event)
    }
}

/// Writes every event to the `tracing` pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn on_event(&self, event: &TelemetryEvent) {
        info!(
            event_type = %event.kind,
            severity = event.severity.as_str(),
            message = event.message.as_deref().unwrap_or(""),
            translation_key = event.translation_key.as_deref().unwrap_or(""),
            timestamp = %event.timestamp,
            "telemetry event"
        );
    }
}

type ObserverList = Vec<(SubscriptionId, Arc<dyn EventObserver>)>;

/// Process-wide publish point, shared as `Arc<Notifier>`.
pub struct Notifier {
    center: Mutex<NotificationCenter>,
    observers: RwLock<ObserverList>,
    next_id: AtomicU64,
}

impl Notifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            center: Mutex::new(NotificationCenter::new(clock)),
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a notice and broadcast it. Returns the notice as stored.
    pub fn publish(&self, draft: NoticeDraft) -> Notice {
        let notice = self.center().add(draft);
        let event = TelemetryEvent::from(&notice);
        debug!(event_type = %event.kind, notice_id = %event.notice_id, "publishing notice");

        // Snapshot so observers may subscribe or unsubscribe while being called.
        let observers: Vec<Arc<dyn EventObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer.on_event(&event);
        }

        notice
    }

    /// Register an observer. Observers are called in registration order.
    pub fn subscribe(&self, observer: Arc<dyn EventObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(sub, _)| *sub != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Active notices, most recent first.
    pub fn active(&self) -> Vec<Notice> {
        self.center().active()
    }

    /// Dismiss a notice now.
    pub fn dismiss(&self, id: &str) -> bool {
        self.center().remove(id)
    }

    /// Earliest pending auto-dismiss instant.
    pub fn next_expiry(&self) -> Option<i64> {
        self.center().next_expiry()
    }

    fn center(&self) -> MutexGuard<'_, NotificationCenter> {
        self.center.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
