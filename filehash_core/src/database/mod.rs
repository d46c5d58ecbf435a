//! SQLite-backed digest storage
//!
//! Reference implementation of the store contracts over a local SQLite
//! database: one row per file in `files`, one digest row per file in
//! `filehash` with a column per enabled algorithm (plus `original_*`
//! columns when original tracking is on).

pub mod schema;
mod store;

pub use store::SqliteDigestStore;

use crate::error::{IoError, StoreError};
use crate::store::{FileId, FileStatus};
use crate::{Error, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Database connection manager with connection pooling
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database and bring the fixed schema up to date.
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Io(IoError::from_std(e).with_path(db_path)))?;
        }

        let connect_options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                Error::Store(StoreError::unavailable(format!(
                    "failed to connect to database: {e}"
                )))
            })?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(schema::SCHEMA_VERSION_TABLE)
            .execute(&self.pool)
            .await?;

        let current: Option<i32> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await?;

        if current.unwrap_or(0) < 1 {
            let mut tx = self.pool.begin().await?;
            for statement in schema::SCHEMA_V1 {
                sqlx::query(statement).execute(&mut *tx).await?;
            }
            sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (1, ?)")
                .bind(now_secs())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(())
    }

    /// Register a managed file, returning its id.
    pub async fn register_file(
        &self,
        uri: &str,
        mime_type: Option<&str>,
        status: FileStatus,
    ) -> Result<FileId> {
        let result = sqlx::query(
            "INSERT INTO files (uri, mime_type, status, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(uri)
        .bind(mime_type)
        .bind(status_str(status))
        .bind(now_secs())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Look up a managed file by its location.
    pub async fn find_by_uri(&self, uri: &str) -> Result<Option<FileId>> {
        let fid = sqlx::query_scalar("SELECT fid FROM files WHERE uri = ? LIMIT 1")
            .bind(uri)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fid)
    }

    /// Change a managed file's lifecycle status.
    pub async fn set_status(&self, file: FileId, status: FileStatus) -> Result<()> {
        sqlx::query("UPDATE files SET status = ? WHERE fid = ?")
            .bind(status_str(status))
            .bind(file)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Number of managed files.
    pub async fn file_count(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn status_str(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Permanent => "permanent",
        FileStatus::Temporary => "temporary",
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
