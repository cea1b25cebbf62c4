//! Key-value backends.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{StoreError, StoreResult, SCHEMA};

/// Client-local persistent key-value storage.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-process backend. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// SQLite-backed store: one row per key.
pub struct SqliteKv {
    conn: Mutex<Connection>,
}

impl SqliteKv {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn()?
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key, bytes = value.len(), "writing collection");
        self.conn()?.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn()?.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(kv: &dyn KvStore) {
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set("a", "[1]").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("[1]"));

        kv.set("a", "[2]").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("[2]"));

        kv.remove("a").unwrap();
        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_kv() {
        exercise(&MemoryKv::new());
    }

    #[test]
    fn test_sqlite_kv_in_memory() {
        exercise(&SqliteKv::open_in_memory().unwrap());
    }

    #[test]
    fn test_sqlite_kv_lists_keys() {
        let kv = SqliteKv::open_in_memory().unwrap();
        kv.set("symptoms", "[]").unwrap();
        kv.set("health-logs", "[]").unwrap();
        assert_eq!(kv.keys().unwrap(), vec!["health-logs", "symptoms"]);
    }

    #[test]
    fn test_sqlite_kv_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pawlog.db");

        {
            let kv = SqliteKv::open(&path).unwrap();
            kv.set("cat-profile", r#"{"cats":[]}"#).unwrap();
        }

        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(
            kv.get("cat-profile").unwrap().as_deref(),
            Some(r#"{"cats":[]}"#)
        );
    }
}
