//! Symptom repository.

use std::sync::Arc;

use super::{owned_by, recent};
use crate::clock::Clock;
use crate::models::{Symptom, Urgency};
use crate::store::{Collection, KvStore, Patch, StoreResult};

pub struct SymptomRepository {
    symptoms: Collection<Symptom>,
    clock: Arc<dyn Clock>,
}

impl SymptomRepository {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            symptoms: Collection::new(kv),
            clock,
        }
    }

    pub fn get_all(&self) -> Vec<Symptom> {
        self.symptoms.get_all()
    }

    /// Symptoms for one cat, in storage order.
    pub fn get_by_cat(&self, cat_id: &str) -> Vec<Symptom> {
        owned_by(self.symptoms.get_all(), cat_id)
    }

    /// Symptoms for one cat from the last `days` days, newest first.
    pub fn get_recent(&self, cat_id: &str, days: u32) -> Vec<Symptom> {
        recent(self.symptoms.get_all(), cat_id, days, self.clock.now_millis())
    }

    /// Symptoms for one cat triaged at `urgency` or above.
    pub fn get_at_least(&self, cat_id: &str, urgency: Urgency) -> Vec<Symptom> {
        self.get_by_cat(cat_id)
            .into_iter()
            .filter(|s| s.urgency.is_some_and(|u| u >= urgency))
            .collect()
    }

    pub fn add(&self, symptom: Symptom) -> StoreResult<()> {
        self.symptoms.add(symptom)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<Symptom>> {
        self.symptoms.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.symptoms.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, DAY_MS};
    use crate::models::Severity;
    use crate::store::{patch_from_value, MemoryKv};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    fn setup() -> SymptomRepository {
        SymptomRepository::new(Arc::new(MemoryKv::new()), Arc::new(ManualClock::new(NOW)))
    }

    #[test]
    fn test_recent_symptoms_newest_first() {
        let repo = setup();
        let old = Symptom::new("c1", "sneezing", Severity::Mild, NOW - 10 * DAY_MS);
        let mid = Symptom::new("c1", "vomiting", Severity::Moderate, NOW - 2 * DAY_MS);
        let new = Symptom::new("c1", "lethargy", Severity::Severe, NOW - 1_000);
        repo.add(mid.clone()).unwrap();
        repo.add(old).unwrap();
        repo.add(new.clone()).unwrap();

        assert_eq!(repo.get_recent("c1", 7), vec![new, mid]);
    }

    #[test]
    fn test_triage_update_and_filter() {
        let repo = setup();
        let s = Symptom::new("c1", "not eating", Severity::from_slider(8), NOW);
        repo.add(s.clone()).unwrap();
        repo.add(Symptom::new("c1", "itchy", Severity::Mild, NOW).with_urgency(Urgency::Mild))
            .unwrap();

        let patch = patch_from_value(json!({"urgency": "emergency"})).unwrap();
        let triaged = repo.update(&s.id, &patch).unwrap().unwrap();
        assert_eq!(triaged.urgency, Some(Urgency::Emergency));
        assert_eq!(triaged.severity, Severity::Severe);

        let urgent = repo.get_at_least("c1", Urgency::Warning);
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].id, s.id);
    }

    #[test]
    fn test_bad_urgency_patch_rejected() {
        let repo = setup();
        let s = Symptom::new("c1", "cough", Severity::Mild, NOW);
        repo.add(s.clone()).unwrap();

        let patch = patch_from_value(json!({"urgency": "panic"})).unwrap();
        assert!(repo.update(&s.id, &patch).is_err());
        assert_eq!(repo.get_by_cat("c1"), vec![s]);
    }
}
