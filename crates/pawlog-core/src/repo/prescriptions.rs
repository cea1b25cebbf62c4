//! Prescription repository.

use std::sync::Arc;

use super::owned_by;
use crate::models::Prescription;
use crate::store::{Collection, KvStore, Patch, StoreResult};

pub struct PrescriptionRepository {
    prescriptions: Collection<Prescription>,
}

impl PrescriptionRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            prescriptions: Collection::new(kv),
        }
    }

    pub fn get_by_cat(&self, cat_id: &str) -> Vec<Prescription> {
        owned_by(self.prescriptions.get_all(), cat_id)
    }

    /// Prescriptions issued at one visit.
    pub fn get_by_visit(&self, visit_id: &str) -> Vec<Prescription> {
        self.prescriptions
            .get_all()
            .into_iter()
            .filter(|p| p.visit_id == visit_id)
            .collect()
    }

    pub fn add(&self, prescription: Prescription) -> StoreResult<()> {
        self.prescriptions.add(prescription)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<Prescription>> {
        self.prescriptions.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.prescriptions.delete(id)
    }
}
