//! SQL schema definitions
//!
//! Only the fixed part of the schema lives here. Digest columns are managed
//! at runtime by the schema maintainer because the set of enabled
//! algorithms is configuration.

/// Migration bookkeeping table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
)
"#;

/// Base schema: managed file records plus the digest row table keyed by
/// file id. Digest columns are added per enabled algorithm.
pub const SCHEMA_V1: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS files (
        fid INTEGER PRIMARY KEY AUTOINCREMENT,
        uri TEXT,
        mime_type TEXT,
        status TEXT NOT NULL DEFAULT 'temporary',
        created_at INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS filehash (
        fid INTEGER PRIMARY KEY REFERENCES files (fid) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_files_status ON files (status)
    "#,
];
