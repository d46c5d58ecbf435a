//! Collaborator contracts for the File Hash core library
//!
//! The core never owns persistence or file access. Hosts provide a digest
//! store (per file and algorithm), a duplicate index (equality lookup over
//! stored digests), a schema maintainer, and a byte-stream source; this
//! module defines those contracts plus the local-filesystem source.

use crate::Result;
use crate::algorithm::Algorithm;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

/// Host-side identifier of a managed file.
pub type FileId = i64;

/// Lifecycle status of a managed file.
///
/// Temporary files are in-progress uploads that may still be garbage
/// collected; only permanent files are visible to non-strict dedupe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Permanent,
    Temporary,
}

/// The slice of a managed file the core needs to see.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub id: FileId,
    /// Location the byte stream can be opened from. `None` means the file
    /// has no readable location and will never be hashed.
    pub uri: Option<PathBuf>,
    pub mime_type: Option<String>,
    pub status: FileStatus,
}

impl FileDescriptor {
    pub fn new(id: FileId, uri: impl Into<PathBuf>) -> Self {
        Self {
            id,
            uri: Some(uri.into()),
            mime_type: None,
            status: FileStatus::Temporary,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }
}

/// Options for a duplicate index lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Include files that are not yet permanent. Closes the race where two
    /// uploads of the same content land before either is finalized.
    pub include_temporary: bool,
    /// Match against the write-once original digest column as well as the
    /// current one.
    pub include_original: bool,
}

/// Keyed digest storage, one optional hex string per (file, algorithm).
#[async_trait]
pub trait DigestStore: Send + Sync {
    async fn get(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>>;

    /// Store or clear the current digest. `None` records "no digest", which
    /// is distinct from the empty string and is a normal outcome for
    /// unreadable or MIME-excluded files.
    async fn set(&self, file: FileId, algorithm: Algorithm, digest: Option<&str>) -> Result<()>;

    async fn get_original(&self, file: FileId, algorithm: Algorithm) -> Result<Option<String>>;

    /// Store the original digest. Implementations must treat the slot as
    /// write-once: a value that is already present is never overwritten.
    async fn set_original(
        &self,
        file: FileId,
        algorithm: Algorithm,
        digest: Option<&str>,
    ) -> Result<()>;
}

/// Equality lookup over stored digests, restricted to at most one result.
///
/// When several files share a digest the index may return any one of them;
/// callers only rely on "some matching file" semantics.
#[async_trait]
pub trait DuplicateIndex: Send + Sync {
    async fn query(
        &self,
        algorithm: Algorithm,
        digest: &str,
        options: LookupOptions,
    ) -> Result<Option<FileId>>;
}

/// Brings digest storage columns in line with the enabled algorithm set.
/// Must be idempotent; invoked at most once per failed lookup.
#[async_trait]
pub trait SchemaMaintainer: Send + Sync {
    async fn ensure_columns(&self) -> Result<()>;
}

/// Binary byte-stream access for file locations.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Open the location for sequential binary reading.
    async fn open(&self, uri: &Path) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>>;

    /// Read the entire content at once. Whole-file convenience used by the
    /// single-checksum fast path.
    async fn read_all(&self, uri: &Path) -> std::io::Result<Vec<u8>>;
}

/// `FileSource` over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSource;

#[async_trait]
impl FileSource for LocalFileSource {
    async fn open(&self, uri: &Path) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
        let file = tokio::fs::File::open(uri).await?;
        Ok(Box::new(file))
    }

    async fn read_all(&self, uri: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(uri).await
    }
}
