//! Health-domain view state.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{NoticeDraft, SubscriptionId, Subscribers};
use crate::clock::Clock;
use crate::models::{HealthLog, MoodLog, Prescription, Symptom, VetVisit, WeightLog};
use crate::notify::Notifier;
use crate::repo::{
    sort_newest_first, sort_oldest_first, window_start, HealthLogRepository, MoodRepository, PrescriptionRepository, SymptomRepository,
    VetVisitRepository, WeightRepository,
};
use crate::store::{Collection, KvStore, OwnedRecord, Patch, StoreResult};

/// Cached health records for the loaded cat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthState {
    pub cat_id: Option<String>,
    pub health_logs: Vec<HealthLog>,
    pub symptoms: Vec<Symptom>,
    pub weights: Vec<WeightLog>,
    pub vet_visits: Vec<VetVisit>,
    pub prescriptions: Vec<Prescription>,
    pub moods: Vec<MoodLog>,
}

/// A record kind cached in [`HealthState`].
pub trait HealthEntity: OwnedRecord {
    /// Event tag prefix, e.g. `healthLog` in `healthLog.added`.
    const KIND: &'static str;

    fn slice(state: &HealthState) -> &[Self];

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self>;

    /// Restore the kind's read order after a cache mutation. Storage order by default.
    fn order(_records: &mut [Self]) {}
}

impl HealthState {
    pub fn records<T: HealthEntity>(&self) -> &[T] {
        T::slice(self)
    }

    /// Append a record owned by the loaded cat. Records of other cats are not cached.
    #[must_use]
    pub fn with_added<T: HealthEntity>(&self, record: T) -> Self {
        let mut next = self.clone();
        if next.cat_id.as_deref() == Some(record.cat_id()) {
            let records = T::slice_mut(&mut next);
            records.push(record);
            T::order(records);
        }
        next
    }

    /// Replace the cached record with the same id, if cached.
    #[must_use]
    pub fn with_replaced<T: HealthEntity>(&self, record: T) -> Self {
        let mut next = self.clone();
        let records = T::slice_mut(&mut next);
        if let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) {
            *slot = record;
            T::order(records);
        }
        next
    }

    #[must_use]
    pub fn without<T: HealthEntity>(&self, id: &str) -> Self {
        let mut next = self.clone();
        T::slice_mut(&mut next).retain(|r| r.id() != id);
        next
    }
}

/// Health container: per-kind caches kept in lockstep with storage.
///
/// Mutations write through to the collection first and then apply the same
/// change to the cache, without re-reading storage.
pub struct HealthStore {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<Notifier>,
    state: HealthState,
    subscribers: Subscribers<HealthState>,
}

impl HealthStore {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>, notifier: Arc<Notifier>) -> Self {
        Self {
            kv,
            clock,
            notifier,
            state: HealthState::default(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn state(&self) -> &HealthState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&HealthState) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Populate every cache for one cat using each repository's read order.
    pub fn load_for_cat(&mut self, cat_id: &str) {
        let kv = &self.kv;
        let clock = &self.clock;

        let state = HealthState {
            cat_id: Some(cat_id.to_string()),
            health_logs: HealthLogRepository::new(kv.clone(), clock.clone()).get_by_cat(cat_id),
            symptoms: SymptomRepository::new(kv.clone(), clock.clone()).get_by_cat(cat_id),
            weights: WeightRepository::new(kv.clone()).get_by_cat(cat_id),
            vet_visits: VetVisitRepository::new(kv.clone()).get_by_cat(cat_id),
            prescriptions: PrescriptionRepository::new(kv.clone()).get_by_cat(cat_id),
            moods: MoodRepository::new(kv.clone()).get_by_cat(cat_id),
        };
        debug!(
            cat_id,
            health_logs = state.health_logs.len(),
            symptoms = state.symptoms.len(),
            "health state loaded"
        );

        self.apply(state);
    }

    /// Drop every cache, e.g. when the selection is cleared.
    pub fn clear(&mut self) {
        self.apply(HealthState::default());
    }

    pub fn add<T: HealthEntity>(&mut self, record: T) -> StoreResult<()> {
        let id = record.id().to_string();
        let cat_id = record.cat_id().to_string();
        Collection::<T>::new(self.kv.clone()).add(record.clone())?;

        let next = self.state.with_added(record);
        self.apply(next);
        self.publish::<T>("added", &id, &cat_id);
        Ok(())
    }

    /// Merge `patch` into a record. Returns the merged record, or `None` if unknown.
    pub fn update<T: HealthEntity>(&mut self, id: &str, patch: &Patch) -> StoreResult<Option<T>> {
        let Some(merged) = Collection::<T>::new(self.kv.clone()).update(id, patch)? else {
            return Ok(None);
        };

        let next = self.state.with_replaced(merged.clone());
        self.apply(next);
        self.publish::<T>("updated", id, merged.cat_id());
        Ok(Some(merged))
    }

    pub fn delete<T: HealthEntity>(&mut self, id: &str) -> StoreResult<bool> {
        let collection = Collection::<T>::new(self.kv.clone());
        let Some(owner) = collection.get(id).map(|r| r.cat_id().to_string()) else {
            return Ok(false);
        };
        let removed = collection.delete(id)?;

        let next = self.state.without::<T>(id);
        self.apply(next);
        if removed {
            self.publish::<T>("deleted", id, &owner);
        }
        Ok(removed)
    }

    pub fn health_logs(&self) -> &[HealthLog] {
        &self.state.health_logs
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.state.symptoms
    }

    pub fn weights(&self) -> &[WeightLog] {
        &self.state.weights
    }

    pub fn vet_visits(&self) -> &[VetVisit] {
        &self.state.vet_visits
    }

    pub fn prescriptions(&self) -> &[Prescription] {
        &self.state.prescriptions
    }

    pub fn moods(&self) -> &[MoodLog] {
        &self.state.moods
    }

    /// Cached health logs from the last `days` days, newest first.
    pub fn recent_logs(&self, days: u32) -> Vec<HealthLog> {
        let start = window_start(self.clock.now_millis(), days);
        let mut logs: Vec<HealthLog> = self
            .state
            .health_logs
            .iter()
            .filter(|log| log.timestamp >= start)
            .cloned()
            .collect();
        logs.sort_by_key(|log| std::cmp::Reverse(log.timestamp));
        logs
    }

    fn apply(&mut self, next: HealthState) {
        self.state = next;
        self.subscribers.emit(&self.state);
    }

    fn publish<T: HealthEntity>(&self, action: &str, id: &str, cat_id: &str) {
        self.notifier.publish(
            NoticeDraft::success(format!("{}.{}", T::KIND, action))
                .with_translation(format!("notifications.{}.{}", T::KIND, action))
                .with_metadata(json!({ "id": id, "catId": cat_id })),
        );
    }
}

impl HealthEntity for HealthLog {
    const KIND: &'static str = "healthLog";

    fn slice(state: &HealthState) -> &[Self] {
        &state.health_logs
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.health_logs
    }
}

impl HealthEntity for Symptom {
    const KIND: &'static str = "symptom";

    fn slice(state: &HealthState) -> &[Self] {
        &state.symptoms
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.symptoms
    }
}

impl HealthEntity for WeightLog {
    const KIND: &'static str = "weight";

    fn slice(state: &HealthState) -> &[Self] {
        &state.weights
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.weights
    }

    fn order(records: &mut [Self]) {
        sort_oldest_first(records);
    }
}

impl HealthEntity for VetVisit {
    const KIND: &'static str = "vetVisit";

    fn slice(state: &HealthState) -> &[Self] {
        &state.vet_visits
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.vet_visits
    }

    fn order(records: &mut [Self]) {
        sort_newest_first(records);
    }
}

impl HealthEntity for Prescription {
    const KIND: &'static str = "prescription";

    fn slice(state: &HealthState) -> &[Self] {
        &state.prescriptions
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.prescriptions
    }
}

impl HealthEntity for MoodLog {
    const KIND: &'static str = "mood";

    fn slice(state: &HealthState) -> &[Self] {
        &state.moods
    }

    fn slice_mut(state: &mut HealthState) -> &mut Vec<Self> {
        &mut state.moods
    }

    fn order(records: &mut [Self]) {
        sort_newest_first(records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, DAY_MS};
    use crate::models::{LogType, Mood, Severity};
    use crate::store::{patch_from_value, MemoryKv};

    const NOW: i64 = 1_700_000_000_000;

    struct Fixture {
        kv: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<Notifier>,
        store: HealthStore,
    }

    fn setup() -> Fixture {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(NOW));
        let notifier = Arc::new(Notifier::new(clock.clone()));
        let store = HealthStore::new(kv.clone(), clock.clone(), notifier.clone());
        Fixture {
            kv,
            clock,
            notifier,
            store,
        }
    }

    fn stored_logs(f: &Fixture) -> Vec<HealthLog> {
        HealthLogRepository::new(f.kv.clone(), f.clock.clone()).get_by_cat("c1")
    }

    #[test]
    fn test_load_for_cat_uses_repository_orders() {
        let mut f = setup();
        let weights = WeightRepository::new(f.kv.clone());
        weights.add(WeightLog::new("c1", 4.5, 200)).unwrap();
        weights.add(WeightLog::new("c1", 4.2, 100)).unwrap();
        let moods = MoodRepository::new(f.kv.clone());
        moods.add(MoodLog::new("c1", Mood::Sad, 100)).unwrap();
        moods.add(MoodLog::new("c1", Mood::Happy, 200)).unwrap();
        moods.add(MoodLog::new("c2", Mood::Angry, 300)).unwrap();

        f.store.load_for_cat("c1");

        let state = f.store.state();
        assert_eq!(state.cat_id.as_deref(), Some("c1"));
        assert_eq!(state.weights.iter().map(|w| w.timestamp).collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(state.moods.iter().map(|m| m.timestamp).collect::<Vec<_>>(), vec![200, 100]);
    }

    #[test]
    fn test_add_update_delete_keep_cache_and_storage_in_lockstep() {
        let mut f = setup();
        f.store.load_for_cat("c1");

        let log = HealthLog::new("c1", LogType::Water, NOW);
        f.store.add(log.clone()).unwrap();
        assert_eq!(f.store.health_logs(), stored_logs(&f).as_slice());

        let patch = patch_from_value(json!({"waterAmount": 90})).unwrap();
        let merged: HealthLog = f.store.update(&log.id, &patch).unwrap().unwrap();
        assert_eq!(merged.water_amount, Some(90.0));
        assert_eq!(f.store.health_logs(), stored_logs(&f).as_slice());

        assert!(f.store.delete::<HealthLog>(&log.id).unwrap());
        assert!(f.store.health_logs().is_empty());
        assert!(stored_logs(&f).is_empty());
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        f.store.add(Symptom::new("c1", "cough", Severity::Mild, NOW)).unwrap();
        let before = f.store.state().clone();

        let patch = patch_from_value(json!({"description": "x"})).unwrap();
        assert!(f.store.update::<Symptom>("ghost", &patch).unwrap().is_none());
        assert!(!f.store.delete::<Symptom>("ghost").unwrap());
        assert_eq!(f.store.state(), &before);
    }

    #[test]
    fn test_cache_not_reread_from_storage() {
        let mut f = setup();
        f.store.load_for_cat("c1");

        // Written behind the container's back: not visible until the next load.
        HealthLogRepository::new(f.kv.clone(), f.clock.clone())
            .add(HealthLog::new("c1", LogType::Meal, NOW))
            .unwrap();
        f.store.add(HealthLog::new("c1", LogType::Litter, NOW)).unwrap();
        assert_eq!(f.store.health_logs().len(), 1);

        f.store.load_for_cat("c1");
        assert_eq!(f.store.health_logs().len(), 2);
    }

    #[test]
    fn test_other_cats_records_are_stored_not_cached() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        f.store.add(HealthLog::new("c2", LogType::Water, NOW)).unwrap();

        assert!(f.store.health_logs().is_empty());
        let all = HealthLogRepository::new(f.kv.clone(), f.clock.clone()).get_all();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_recent_logs_from_cache() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        let old = HealthLog::new("c1", LogType::Meal, NOW - 9 * DAY_MS);
        let fresh = HealthLog::new("c1", LogType::Meal, NOW - DAY_MS);
        let newest = HealthLog::new("c1", LogType::Meal, NOW);
        f.store.add(fresh.clone()).unwrap();
        f.store.add(old).unwrap();
        f.store.add(newest.clone()).unwrap();

        assert_eq!(f.store.recent_logs(7), vec![newest, fresh]);
    }

    #[test]
    fn test_vet_visit_and_prescription_flow() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        let visit = VetVisit::new("c1", "uti", NOW);
        f.store.add(visit.clone()).unwrap();
        f.store.add(Prescription::new(&visit, "amoxicillin")).unwrap();

        assert_eq!(f.store.vet_visits().len(), 1);
        assert_eq!(f.store.prescriptions()[0].visit_id, visit.id);
        assert_eq!(f.store.state().records::<Prescription>().len(), 1);
    }

    #[test]
    fn test_added_records_keep_read_order() {
        let mut f = setup();
        f.store.load_for_cat("c1");

        f.store.add(MoodLog::new("c1", Mood::Sad, NOW)).unwrap();
        f.store.add(MoodLog::new("c1", Mood::Happy, NOW + 1_000)).unwrap();
        f.store.add(VetVisit::new("c1", "checkup", NOW)).unwrap();
        f.store.add(VetVisit::new("c1", "vaccine", NOW + 1_000)).unwrap();
        f.store.add(WeightLog::new("c1", 4.3, NOW)).unwrap();
        f.store.add(WeightLog::new("c1", 4.1, NOW - DAY_MS)).unwrap();

        let moods: Vec<i64> = f.store.moods().iter().map(|m| m.timestamp).collect();
        assert_eq!(moods, vec![NOW + 1_000, NOW]);
        let visits: Vec<i64> = f.store.vet_visits().iter().map(|v| v.timestamp).collect();
        assert_eq!(visits, vec![NOW + 1_000, NOW]);
        let weights: Vec<i64> = f.store.weights().iter().map(|w| w.timestamp).collect();
        assert_eq!(weights, vec![NOW - DAY_MS, NOW]);

        assert_eq!(f.store.moods(), MoodRepository::new(f.kv.clone()).get_by_cat("c1").as_slice());
        assert_eq!(
            f.store.weights(),
            WeightRepository::new(f.kv.clone()).get_by_cat("c1").as_slice()
        );

        let first = f.store.moods()[1].id.clone();
        let patch = patch_from_value(json!({"timestamp": NOW + 5_000})).unwrap();
        f.store.update::<MoodLog>(&first, &patch).unwrap();
        assert_eq!(f.store.moods()[0].id, first);
    }

    #[test]
    fn test_delete_event_names_record_owner() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        let other = WeightLog::new("c2", 3.9, NOW);
        f.store.add(other.clone()).unwrap();

        f.store.clear();
        assert!(f.store.delete::<WeightLog>(&other.id).unwrap());

        let notices = f.notifier.active();
        let deleted = notices.iter().find(|n| n.kind == "weight.deleted").unwrap();
        assert_eq!(deleted.metadata.as_ref().unwrap()["catId"], "c2");
    }

    #[test]
    fn test_mutations_publish_notices() {
        let mut f = setup();
        f.store.load_for_cat("c1");
        f.store.add(WeightLog::new("c1", 4.0, NOW)).unwrap();

        let kinds: Vec<String> = f.notifier.active().into_iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec!["weight.added".to_string()]);
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let mut f = setup();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        f.store.subscribe(move |state: &HealthState| {
            sink.lock().unwrap().push(state.moods.len());
        });

        f.store.load_for_cat("c1");
        let mood = MoodLog::new("c1", Mood::Happy, NOW);
        f.store.add(mood.clone()).unwrap();
        f.store.delete::<MoodLog>(&mood.id).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 0]);
    }
}
