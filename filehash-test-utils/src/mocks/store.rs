//! Mock digest store, duplicate index, and schema maintainer

use async_trait::async_trait;
use filehash_core::algorithm::Algorithm;
use filehash_core::error::StoreError;
use filehash_core::store::{
    DigestStore, DuplicateIndex, FileId, FileStatus, LookupOptions, SchemaMaintainer,
};
use filehash_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory digest store with write-once original slots.
#[derive(Default)]
pub struct MockDigestStore {
    digests: Mutex<HashMap<(FileId, Algorithm), String>>,
    originals: Mutex<HashMap<(FileId, Algorithm), String>>,
}

impl MockDigestStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored digest without going through the trait
    pub fn seed(&self, file: FileId, algorithm: Algorithm, digest: &str) {
        self.digests
            .lock()
            .unwrap()
            .insert((file, algorithm), digest.to_string());
    }

    /// Synchronous view of a stored digest
    pub fn stored(&self, file: FileId, algorithm: Algorithm) -> Option<String> {
        self.digests.lock().unwrap().get(&(file, algorithm)).cloned()
    }

    /// Synchronous view of a stored original digest
    pub fn stored_original(&self, file: FileId, algorithm: Algorithm) -> Option<String> {
        self.originals
            .lock()
            .unwrap()
            .get(&(file, algorithm))
            .cloned()
    }
}

#[async_trait]
impl DigestStore for MockDigestStore {
    async fn get(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>> {
        Ok(self.stored(file, algorithm))
    }

    async fn set(&self, file: FileId, algorithm: Algorithm, digest: Option<&str>) -> Result<()> {
        let mut digests = self.digests.lock().unwrap();
        match digest {
            Some(value) => {
                digests.insert((file, algorithm), value.to_string());
            }
            None => {
                digests.remove(&(file, algorithm));
            }
        }
        Ok(())
    }

    async fn get_original(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>> {
        Ok(self.stored_original(file, algorithm))
    }

    async fn set_original(
        &self,
        file: FileId,
        algorithm: Algorithm,
        digest: Option<&str>,
    ) -> Result<()> {
        let mut originals = self.originals.lock().unwrap();
        // Write-once: an existing original digest is never overwritten.
        if originals.contains_key(&(file, algorithm)) {
            return Ok(());
        }
        if let Some(value) = digest {
            originals.insert((file, algorithm), value.to_string());
        }
        Ok(())
    }
}

/// One indexed digest row.
#[derive(Debug, Clone)]
pub struct IndexRow {
    pub file: FileId,
    pub algorithm: Algorithm,
    pub digest: String,
    /// True when this row models the write-once original column.
    pub original: bool,
    pub status: FileStatus,
}

/// In-memory duplicate index.
///
/// Rows are matched in insertion order and the first hit wins, modeling the
/// arbitrary tie-break of the real equality lookup. Can be primed to fail
/// the next N queries with a missing-column error to exercise the schema
/// maintenance retry.
#[derive(Default)]
pub struct MockDuplicateIndex {
    rows: Mutex<Vec<IndexRow>>,
    missing_column_failures: AtomicUsize,
    queries: AtomicUsize,
}

impl MockDuplicateIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a current-digest row for a permanent file
    pub fn add_permanent(&self, file: FileId, algorithm: Algorithm, digest: &str) {
        self.add_row(IndexRow {
            file,
            algorithm,
            digest: digest.to_string(),
            original: false,
            status: FileStatus::Permanent,
        });
    }

    /// Add a current-digest row for a temporary file
    pub fn add_temporary(&self, file: FileId, algorithm: Algorithm, digest: &str) {
        self.add_row(IndexRow {
            file,
            algorithm,
            digest: digest.to_string(),
            original: false,
            status: FileStatus::Temporary,
        });
    }

    /// Add an arbitrary row
    pub fn add_row(&self, row: IndexRow) {
        self.rows.lock().unwrap().push(row);
    }

    /// Fail the next `n` queries with a missing-column store error
    pub fn fail_with_missing_column(&self, n: usize) {
        self.missing_column_failures.store(n, Ordering::SeqCst);
    }

    /// Number of queries received so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DuplicateIndex for MockDuplicateIndex {
    async fn query(
        &self,
        algorithm: Algorithm,
        digest: &str,
        options: LookupOptions,
    ) -> Result<Option<FileId>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let pending = self.missing_column_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.missing_column_failures
                .store(pending - 1, Ordering::SeqCst);
            return Err(Error::Store(StoreError::missing_column(format!(
                "no such column: {algorithm}"
            ))));
        }

        let rows = self.rows.lock().unwrap();
        let hit = rows.iter().find(|row| {
            row.algorithm == algorithm
                && row.digest == digest
                && (options.include_original || !row.original)
                && (options.include_temporary || row.status == FileStatus::Permanent)
        });
        Ok(hit.map(|row| row.file))
    }
}

/// Schema maintainer that only counts invocations.
#[derive(Default)]
pub struct MockSchemaMaintainer {
    calls: AtomicUsize,
}

impl MockSchemaMaintainer {
    /// Create a maintainer with zero recorded calls
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `ensure_columns` invocations
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaMaintainer for MockSchemaMaintainer {
    async fn ensure_columns(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
