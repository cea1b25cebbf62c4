//! Local collection store.
//!
//! Every entity kind lives under one key as a JSON array. Reads deserialize the
//! whole blob, writes rewrite it. There is no locking across calls: two writers
//! racing on the same key lose whichever write lands first.

mod collection;
mod kv;
mod schema;

pub use collection::*;
pub use kv::*;
pub use schema::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Partial field update, keyed by the record's serialized (camelCase) field names.
pub type Patch = serde_json::Map<String, Value>;

/// A record persisted in its own collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Storage key of the collection.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// A record owned by a cat profile.
pub trait OwnedRecord: Record {
    fn cat_id(&self) -> &str;
}

/// A record carrying an epoch-millisecond timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

/// Shallow-merge `patch` into `record`.
///
/// Top-level fields present in the patch replace the record's; everything else
/// is preserved. The `id` field is never patched. A patch that leaves the record
/// unable to deserialize (wrong field type, bad enum value) is rejected.
pub fn merge_patch<T>(record: &T, patch: &Patch) -> StoreResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(record)?;
    let Value::Object(fields) = &mut value else {
        return Err(StoreError::InvalidPatch(
            "record does not serialize to a JSON object".into(),
        ));
    };

    for (key, field) in patch {
        if key == "id" {
            continue;
        }
        fields.insert(key.clone(), field.clone());
    }

    serde_json::from_value(value).map_err(|e| StoreError::InvalidPatch(e.to_string()))
}

/// Build a [`Patch`] from a JSON object value. Anything else is rejected.
pub fn patch_from_value(value: Value) -> StoreResult<Patch> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidPatch(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
