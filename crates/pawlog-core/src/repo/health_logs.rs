//! Health log repository.

use std::sync::Arc;

use super::{owned_by, recent};
use crate::clock::Clock;
use crate::models::HealthLog;
use crate::store::{Collection, KvStore, Patch, StoreResult};

/// Health logs, with legacy entries backfilled on every read.
///
/// Backfilled `timestamp`/`type` values are not written on read; they reach
/// storage with the next write to the collection, since every write rewrites
/// the normalized records.
pub struct HealthLogRepository {
    logs: Collection<HealthLog>,
    clock: Arc<dyn Clock>,
}

impl HealthLogRepository {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: Collection::new(kv),
            clock,
        }
    }

    pub fn get_all(&self) -> Vec<HealthLog> {
        self.logs.get_all()
    }

    /// Logs for one cat, in storage order.
    pub fn get_by_cat(&self, cat_id: &str) -> Vec<HealthLog> {
        owned_by(self.logs.get_all(), cat_id)
    }

    /// Logs for one cat from the last `days` days, newest first.
    pub fn get_recent(&self, cat_id: &str, days: u32) -> Vec<HealthLog> {
        recent(self.logs.get_all(), cat_id, days, self.clock.now_millis())
    }

    /// Logs for one cat dated `date` (`YYYY-MM-DD`), in storage order.
    pub fn get_by_date(&self, cat_id: &str, date: &str) -> Vec<HealthLog> {
        self.get_by_cat(cat_id)
            .into_iter()
            .filter(|log| log.date == date)
            .collect()
    }

    pub fn add(&self, log: HealthLog) -> StoreResult<()> {
        self.logs.add(log)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<HealthLog>> {
        self.logs.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.logs.delete(id)
    }
}
