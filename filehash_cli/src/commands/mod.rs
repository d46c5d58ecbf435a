//! CLI subcommand implementations

pub mod algos;
pub mod check;
pub mod clean;
pub mod generate;

use anyhow::Result;
use filehash_core::database::{Database, SqliteDigestStore};
use filehash_core::store::SchemaMaintainer;
use filehash_core::{FileHashService, LocalFileSource, Settings};
use std::path::Path;
use std::sync::Arc;

/// Shared command context: the open database and the wired-up service.
pub struct App {
    pub db: Database,
    pub store: Arc<SqliteDigestStore>,
    pub service: FileHashService,
    pub settings: Settings,
}

impl App {
    /// Open the database and bring digest columns up to date with the
    /// enabled algorithm set before any command runs.
    pub async fn open(settings: Settings, db_path: &Path) -> Result<Self> {
        let db = Database::new(db_path).await?;
        let store = Arc::new(SqliteDigestStore::new(db.pool().clone(), &settings));
        store.ensure_columns().await?;

        let service = FileHashService::new(
            settings.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(LocalFileSource),
        );

        Ok(Self {
            db,
            store,
            service,
            settings,
        })
    }
}
