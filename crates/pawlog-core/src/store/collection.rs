//! Generic read-all / write-all collection over a [`KvStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{merge_patch, KvStore, Patch, Record, StoreResult};

/// A flat list of records serialized as one JSON array under `T::COLLECTION`.
pub struct Collection<T> {
    kv: Arc<dyn KvStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            _record: PhantomData,
        }
    }

    /// Storage key of this collection.
    pub fn key(&self) -> &'static str {
        T::COLLECTION
    }

    /// Every stored record, in storage order.
    ///
    /// An absent key, a backend read failure, or a malformed blob all read as
    /// an empty collection.
    pub fn get_all(&self) -> Vec<T> {
        let raw = match self.kv.get(T::COLLECTION) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(collection = T::COLLECTION, error = %e, "collection read failed, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(collection = T::COLLECTION, error = %e, "malformed collection, treating as empty");
                Vec::new()
            }
        }
    }

    /// Find a record by id.
    pub fn get(&self, id: &str) -> Option<T> {
        self.get_all().into_iter().find(|r| r.id() == id)
    }

    /// Append a record and rewrite the collection.
    pub fn add(&self, record: T) -> StoreResult<()> {
        let mut records = self.get_all();
        debug!(collection = T::COLLECTION, id = record.id(), "adding record");
        records.push(record);
        self.write_all(&records)
    }

    /// Merge `patch` into the record with `id`.
    ///
    /// Returns the merged record, or `None` without writing if no record has
    /// that id.
    pub fn update(&self, id: &str, patch: &Patch) -> StoreResult<Option<T>> {
        let mut records = self.get_all();
        let Some(existing) = records.iter_mut().find(|r| r.id() == id) else {
            debug!(collection = T::COLLECTION, id, "update target not found");
            return Ok(None);
        };

        let merged = merge_patch(&*existing, patch)?;
        *existing = merged.clone();
        self.write_all(&records)?;
        Ok(Some(merged))
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.get_all();
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            debug!(collection = T::COLLECTION, id, "delete target not found");
            return Ok(false);
        }

        self.write_all(&records)?;
        Ok(true)
    }

    /// Overwrite the whole collection.
    pub fn replace_all(&self, records: &[T]) -> StoreResult<()> {
        self.write_all(records)
    }

    fn write_all(&self, records: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.kv.set(T::COLLECTION, &raw)
    }
}
