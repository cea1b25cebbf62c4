//! Vet visit repository.

use std::sync::Arc;

use super::{owned_by, sort_newest_first};
use crate::models::VetVisit;
use crate::store::{Collection, KvStore, Patch, StoreResult};

pub struct VetVisitRepository {
    visits: Collection<VetVisit>,
}

impl VetVisitRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            visits: Collection::new(kv),
        }
    }

    /// Visits for one cat, newest first.
    pub fn get_by_cat(&self, cat_id: &str) -> Vec<VetVisit> {
        let mut visits = owned_by(self.visits.get_all(), cat_id);
        sort_newest_first(&mut visits);
        visits
    }

    pub fn get(&self, id: &str) -> Option<VetVisit> {
        self.visits.get(id)
    }

    pub fn add(&self, visit: VetVisit) -> StoreResult<()> {
        self.visits.add(visit)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<VetVisit>> {
        self.visits.update(id, patch)
    }

    /// Remove a visit. Its prescriptions are left in place.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.visits.delete(id)
    }
}
