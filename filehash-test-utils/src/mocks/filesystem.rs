//! Mock byte-stream source for testing

use async_trait::async_trait;
use filehash_core::store::FileSource;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncRead;

/// In-memory file source.
///
/// Tracks every open and whole-file read so tests can assert that a code
/// path did (or did not) touch a file's bytes. Locations can be marked
/// unreadable to exercise the missing-digest paths.
#[derive(Default)]
pub struct MockFileSource {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    unreadable: Mutex<HashSet<PathBuf>>,
    open_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl MockFileSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content
    pub fn add_file(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_vec());
    }

    /// Replace a file's content
    pub fn set_content(&self, path: impl Into<PathBuf>, content: &[u8]) {
        self.add_file(path, content);
    }

    /// Mark a location as unreadable; opens and reads fail from now on
    pub fn mark_unreadable(&self, path: impl Into<PathBuf>) {
        self.unreadable.lock().unwrap().insert(path.into());
    }

    /// Number of `open` calls so far
    pub fn open_count(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Number of whole-file `read_all` calls so far
    pub fn read_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Total byte-stream acquisitions, whichever entry point was used
    pub fn access_count(&self) -> usize {
        self.open_count() + self.read_count()
    }

    fn content(&self, uri: &Path) -> std::io::Result<Vec<u8>> {
        if self.unreadable.lock().unwrap().contains(uri) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("unreadable location: {}", uri.display()),
            ));
        }
        self.files.lock().unwrap().get(uri).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {}", uri.display()),
            )
        })
    }
}

#[async_trait]
impl FileSource for MockFileSource {
    async fn open(&self, uri: &Path) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        let content = self.content(uri)?;
        Ok(Box::new(Cursor::new(content)))
    }

    async fn read_all(&self, uri: &Path) -> std::io::Result<Vec<u8>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        self.content(uri)
    }
}
