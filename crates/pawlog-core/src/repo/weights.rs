//! Weight log repository.

use std::sync::Arc;

use super::{owned_by, sort_oldest_first};
use crate::models::WeightLog;
use crate::store::{Collection, KvStore, Patch, StoreResult};

pub struct WeightRepository {
    weights: Collection<WeightLog>,
}

impl WeightRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            weights: Collection::new(kv),
        }
    }

    /// Weights for one cat, oldest first (chart order).
    pub fn get_by_cat(&self, cat_id: &str) -> Vec<WeightLog> {
        let mut weights = owned_by(self.weights.get_all(), cat_id);
        sort_oldest_first(&mut weights);
        weights
    }

    /// Most recent measurement for one cat.
    pub fn latest(&self, cat_id: &str) -> Option<WeightLog> {
        self.get_by_cat(cat_id).pop()
    }

    pub fn add(&self, weight: WeightLog) -> StoreResult<()> {
        self.weights.add(weight)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<WeightLog>> {
        self.weights.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.weights.delete(id)
    }
}
