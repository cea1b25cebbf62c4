//! Transient user-visible notices.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::Clock;

/// Default lifetime of a notice.
pub const DEFAULT_AUTO_DISMISS_MS: u64 = 5_000;

/// Notice severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Success => "success",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        }
    }
}

/// A notice to publish. Unset fields are filled in when it is added.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeDraft {
    pub id: Option<String>,
    /// Dotted type tag, e.g. `cat.added`
    pub kind: String,
    pub severity: NoticeSeverity,
    pub message: Option<String>,
    pub translation_key: Option<String>,
    pub params: BTreeMap<String, String>,
    pub metadata: Option<Value>,
    /// `None` = default lifetime, `Some(0)` = never auto-dismissed
    pub auto_dismiss_ms: Option<u64>,
}

impl NoticeDraft {
    pub fn new(kind: impl Into<String>, severity: NoticeSeverity) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            severity,
            message: None,
            translation_key: None,
            params: BTreeMap::new(),
            metadata: None,
            auto_dismiss_ms: None,
        }
    }

    pub fn info(kind: impl Into<String>) -> Self {
        Self::new(kind, NoticeSeverity::Info)
    }

    pub fn success(kind: impl Into<String>) -> Self {
        Self::new(kind, NoticeSeverity::Success)
    }

    pub fn warning(kind: impl Into<String>) -> Self {
        Self::new(kind, NoticeSeverity::Warning)
    }

    pub fn error(kind: impl Into<String>) -> Self {
        Self::new(kind, NoticeSeverity::Error)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_translation(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_auto_dismiss(mut self, millis: u64) -> Self {
        self.auto_dismiss_ms = Some(millis);
        self
    }

    /// Never auto-dismiss.
    pub fn sticky(self) -> Self {
        self.with_auto_dismiss(0)
    }
}

/// An active notice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: NoticeSeverity,
    pub message: Option<String>,
    pub translation_key: Option<String>,
    pub params: BTreeMap<String, String>,
    pub metadata: Option<Value>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// 0 = never auto-dismissed
    pub auto_dismiss_ms: u64,
}

impl Notice {
    /// Instant at which this notice expires, if it ever does.
    pub fn expires_at(&self) -> Option<i64> {
        match self.auto_dismiss_ms {
            0 => None,
            ms => Some(self.created_at.saturating_add(i64::try_from(ms).unwrap_or(i64::MAX))),
        }
    }

    fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at().is_some_and(|at| at <= now_millis)
    }
}

/// Ordered set of active notices.
///
/// Expiry is evaluated against the injected clock whenever notices are added
/// or read, so every notice expires independently of the others.
pub struct NotificationCenter {
    clock: Arc<dyn Clock>,
    notices: Vec<Notice>,
}

impl NotificationCenter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            notices: Vec::new(),
        }
    }

    /// Add a notice, filling in id, lifetime and creation time.
    /// Expired notices are dropped first.
    pub fn add(&mut self, draft: NoticeDraft) -> Notice {
        self.expire();
        let notice = Notice {
            id: draft
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            kind: draft.kind,
            severity: draft.severity,
            message: draft.message,
            translation_key: draft.translation_key,
            params: draft.params,
            metadata: draft.metadata,
            created_at: self.clock.now_millis(),
            auto_dismiss_ms: draft.auto_dismiss_ms.unwrap_or(DEFAULT_AUTO_DISMISS_MS),
        };
        self.notices.push(notice.clone());
        notice
    }

    /// Remove a notice now. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drop every expired notice. Returns how many were dropped.
    pub fn expire(&mut self) -> usize {
        let now = self.clock.now_millis();
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired(now));
        before - self.notices.len()
    }

    /// Active notices, most recent first.
    pub fn active(&mut self) -> Vec<Notice> {
        self.expire();
        let mut notices: Vec<Notice> = self.notices.iter().rev().cloned().collect();
        notices.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        notices
    }

    /// Earliest pending expiry, for scheduling a redraw.
    pub fn next_expiry(&self) -> Option<i64> {
        self.notices.iter().filter_map(Notice::expires_at).min()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notices.iter().any(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn setup() -> (Arc<ManualClock>, NotificationCenter) {
        let clock = Arc::new(ManualClock::new(10_000));
        let center = NotificationCenter::new(clock.clone());
        (clock, center)
    }

    #[test]
    fn test_default_auto_dismiss_after_exactly_5000ms() {
        let (clock, mut center) = setup();
        let notice = center.add(NoticeDraft::success("cat.added"));
        assert_eq!(notice.auto_dismiss_ms, DEFAULT_AUTO_DISMISS_MS);

        clock.advance(4_999);
        assert_eq!(center.active().len(), 1);

        clock.advance(1);
        assert!(center.active().is_empty());

        clock.advance(60_000);
        assert!(!center.contains(&notice.id));
    }

    #[test]
    fn test_zero_auto_dismiss_never_expires() {
        let (clock, mut center) = setup();
        let notice = center.add(NoticeDraft::error("ai.unavailable").sticky());

        clock.advance(i64::from(u32::MAX));
        assert_eq!(center.active(), vec![notice.clone()]);
        assert_eq!(center.next_expiry(), None);

        assert!(center.remove(&notice.id));
        assert!(center.is_empty());
    }

    #[test]
    fn test_add_evicts_expired_without_reads() {
        let (clock, mut center) = setup();
        for i in 0..1_000 {
            center.add(NoticeDraft::info(format!("n{}", i)));
            clock.advance(10_000);
        }
        assert_eq!(center.len(), 1);
        assert_eq!(center.next_expiry(), Some(clock.now_millis() - 10_000 + 5_000));

        let sticky = center.add(NoticeDraft::info("kept").sticky());
        clock.advance(10_000);
        center.add(NoticeDraft::info("later"));
        assert_eq!(center.len(), 2);
        assert!(center.contains(&sticky.id));
    }

    #[test]
    fn test_explicit_id_kept() {
        let (_, mut center) = setup();
        let notice = center.add(NoticeDraft::info("sync").with_id("fixed"));
        assert_eq!(notice.id, "fixed");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_, mut center) = setup();
        let notice = center.add(NoticeDraft::info("x"));
        assert!(center.remove(&notice.id));
        assert!(!center.remove(&notice.id));
        assert!(!center.remove("never-existed"));
    }

    #[test]
    fn test_active_is_most_recent_first() {
        let (clock, mut center) = setup();
        let first = center.add(NoticeDraft::info("a").sticky());
        clock.advance(10);
        let second = center.add(NoticeDraft::info("b").sticky());
        clock.advance(10);
        let third = center.add(NoticeDraft::info("c").sticky());

        center.remove(&second.id);
        let fourth = center.add(NoticeDraft::info("d").sticky());

        let order: Vec<String> = center.active().into_iter().map(|n| n.id).collect();
        assert_eq!(order, vec![fourth.id, third.id, first.id]);
    }

    #[test]
    fn test_independent_expiry() {
        let (clock, mut center) = setup();
        let short = center.add(NoticeDraft::info("short").with_auto_dismiss(1_000));
        let long = center.add(NoticeDraft::info("long").with_auto_dismiss(3_000));
        assert_eq!(center.next_expiry(), Some(11_000));

        clock.advance(1_000);
        assert_eq!(center.expire(), 1);
        assert!(!center.contains(&short.id));
        assert!(center.contains(&long.id));

        clock.advance(2_000);
        assert_eq!(center.expire(), 1);
        assert!(center.is_empty());
    }

    #[test]
    fn test_translation_params() {
        let (_, mut center) = setup();
        let notice = center.add(
            NoticeDraft::success("cat.added")
                .with_translation("notifications.catAdded")
                .with_param("name", "Nabi"),
        );
        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(value["type"], "cat.added");
        assert_eq!(value["translationKey"], "notifications.catAdded");
        assert_eq!(value["params"]["name"], "Nabi");
        assert_eq!(value["autoDismissMs"], 5_000);
    }
}
