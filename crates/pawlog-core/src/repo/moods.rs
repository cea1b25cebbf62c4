//! Mood log repository.

use std::sync::Arc;

use super::{owned_by, sort_newest_first};
use crate::models::MoodLog;
use crate::store::{Collection, KvStore, Patch, StoreResult};

pub struct MoodRepository {
    moods: Collection<MoodLog>,
}

impl MoodRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            moods: Collection::new(kv),
        }
    }

    /// Moods for one cat, newest first.
    pub fn get_by_cat(&self, cat_id: &str) -> Vec<MoodLog> {
        let mut moods = owned_by(self.moods.get_all(), cat_id);
        sort_newest_first(&mut moods);
        moods
    }

    pub fn add(&self, mood: MoodLog) -> StoreResult<()> {
        self.moods.add(mood)
    }

    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<MoodLog>> {
        self.moods.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.moods.delete(id)
    }
}
