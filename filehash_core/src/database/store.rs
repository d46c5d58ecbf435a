//! SQLite implementations of the store contracts
//!
//! Column names come from the fixed algorithm catalog, never from user
//! input, so identifier interpolation below is safe.

use crate::Result;
use crate::algorithm::Algorithm;
use crate::settings::Settings;
use crate::store::{
    DigestStore, DuplicateIndex, FileId, LookupOptions, SchemaMaintainer,
};
use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

/// Digest store, duplicate index, and schema maintainer over one SQLite
/// database.
#[derive(Clone)]
pub struct SqliteDigestStore {
    pool: SqlitePool,
    columns: Vec<Algorithm>,
    original: bool,
}

impl SqliteDigestStore {
    /// Create a store managing columns for the settings' enabled set.
    pub fn new(pool: SqlitePool, settings: &Settings) -> Self {
        Self {
            pool,
            columns: settings.enabled_algorithms(),
            original: settings.original,
        }
    }

    async fn ensure_row(&self, file: FileId) -> Result<()> {
        sqlx::query("INSERT INTO filehash (fid) VALUES (?) ON CONFLICT (fid) DO NOTHING")
            .bind(file)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn column_exists(&self, column: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('filehash') WHERE name = ?",
        )
        .bind(column)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn add_column(&self, column: &str) -> Result<()> {
        if self.column_exists(column).await? {
            return Ok(());
        }
        debug!("adding digest column {column}");
        sqlx::query(&format!("ALTER TABLE filehash ADD COLUMN {column} TEXT"))
            .execute(&self.pool)
            .await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_filehash_{column} ON filehash ({column})"
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn drop_column(&self, column: &str) -> Result<()> {
        if !self.column_exists(column).await? {
            return Ok(());
        }
        debug!("dropping digest column {column}");
        sqlx::query(&format!("DROP INDEX IF EXISTS idx_filehash_{column}"))
            .execute(&self.pool)
            .await?;
        sqlx::query(&format!("ALTER TABLE filehash DROP COLUMN {column}"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete stored digests for algorithms that are no longer enabled.
    /// Used by cleanup tooling after configuration shrinks the enabled set.
    pub async fn purge_disabled_columns(&self) -> Result<Vec<Algorithm>> {
        let mut purged = Vec::new();
        for algo in Algorithm::ALL {
            if self.columns.contains(&algo) {
                continue;
            }
            let existed = self.column_exists(algo.id()).await?;
            self.drop_column(algo.id()).await?;
            self.drop_column(&format!("original_{}", algo.id())).await?;
            if existed {
                purged.push(algo);
            }
        }
        Ok(purged)
    }
}

#[async_trait]
impl DigestStore for SqliteDigestStore {
    async fn get(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>> {
        let value: Option<Option<String>> = sqlx::query_scalar(&format!(
            "SELECT {} FROM filehash WHERE fid = ?",
            algorithm.id()
        ))
        .bind(file)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value.flatten())
    }

    async fn set(&self, file: FileId, algorithm: Algorithm, digest: Option<&str>) -> Result<()> {
        self.ensure_row(file).await?;
        sqlx::query(&format!(
            "UPDATE filehash SET {} = ? WHERE fid = ?",
            algorithm.id()
        ))
        .bind(digest)
        .bind(file)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_original(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>> {
        let value: Option<Option<String>> = sqlx::query_scalar(&format!(
            "SELECT original_{} FROM filehash WHERE fid = ?",
            algorithm.id()
        ))
        .bind(file)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value.flatten())
    }

    async fn set_original(
        &self,
        file: FileId,
        algorithm: Algorithm,
        digest: Option<&str>,
    ) -> Result<()> {
        self.ensure_row(file).await?;
        // Write-once enforced in SQL: an existing value is left untouched.
        sqlx::query(&format!(
            "UPDATE filehash SET original_{col} = ? WHERE fid = ? AND original_{col} IS NULL",
            col = algorithm.id()
        ))
        .bind(digest)
        .bind(file)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DuplicateIndex for SqliteDigestStore {
    async fn query(
        &self,
        algorithm: Algorithm,
        digest: &str,
        options: LookupOptions,
    ) -> Result<Option<FileId>> {
        let column = algorithm.id();
        let digest_clause = if options.include_original {
            format!("(h.{column} = ?1 OR h.original_{column} = ?1)")
        } else {
            format!("h.{column} = ?1")
        };
        let status_clause = if options.include_temporary {
            ""
        } else {
            " AND f.status = 'permanent'"
        };
        // Equality lookup capped at one row; which duplicate wins among
        // several is unspecified.
        let sql = format!(
            "SELECT h.fid FROM filehash h \
             JOIN files f ON f.fid = h.fid \
             WHERE {digest_clause}{status_clause} LIMIT 1"
        );
        let fid = sqlx::query_scalar(&sql)
            .bind(digest)
            .fetch_optional(&self.pool)
            .await?;
        Ok(fid)
    }
}

#[async_trait]
impl SchemaMaintainer for SqliteDigestStore {
    async fn ensure_columns(&self) -> Result<()> {
        for algo in &self.columns {
            self.add_column(algo.id()).await?;
            if self.original {
                self.add_column(&format!("original_{}", algo.id())).await?;
            }
        }
        Ok(())
    }
}
