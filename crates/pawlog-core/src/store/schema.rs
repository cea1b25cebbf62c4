//! SQLite schema for the key-value backend.

/// Key-value table holding one JSON blob per collection.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Collections
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- JSON array or object
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
