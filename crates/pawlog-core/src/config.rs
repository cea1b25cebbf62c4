//! Store configuration.
//!
//! ## Environment Variables
//! - `PAWLOG_DB_PATH`: SQLite database file. Unset or empty means an
//!   in-memory store that vanishes with the process.

use std::path::PathBuf;

use crate::store::{SqliteKv, StoreResult};

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "PAWLOG_DB_PATH";

/// Where the collection store lives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreConfig {
    #[default]
    InMemory,
    File(PathBuf),
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_path(std::env::var(DB_PATH_ENV).ok())
    }

    fn from_path(path: Option<String>) -> Self {
        match path.map(|p| p.trim().to_string()) {
            Some(p) if !p.is_empty() => StoreConfig::File(PathBuf::from(p)),
            _ => StoreConfig::InMemory,
        }
    }

    pub fn open(&self) -> StoreResult<SqliteKv> {
        match self {
            StoreConfig::InMemory => {
                tracing::debug!("opening in-memory store");
                SqliteKv::open_in_memory()
            }
            StoreConfig::File(path) => {
                tracing::info!(path = %path.display(), "opening store");
                SqliteKv::open(path)
            }
        }
    }
}
