//! Hashing applicability and target selection
//!
//! Decides, per file, whether hashing should happen at all and which
//! algorithm columns need (re)computation. Also owns the per-run marker
//! that keeps auto-hash-on-load from looping through save and load forever.

use crate::Result;
use crate::algorithm::Algorithm;
use crate::settings::Settings;
use crate::store::{DigestStore, FileDescriptor, FileId};
use std::collections::HashSet;

/// Whether the file qualifies for hashing at all.
///
/// Files without a readable location never hash; a non-empty MIME
/// allow-list excludes files whose type is absent from it.
pub fn should_hash(file: &FileDescriptor, settings: &Settings) -> bool {
    if file.uri.is_none() {
        return false;
    }
    if settings.mime_types.is_empty() {
        return true;
    }
    match &file.mime_type {
        Some(mime) => settings.mime_types.iter().any(|allowed| allowed == mime),
        None => false,
    }
}

/// The algorithm columns a save must (re)compute for this file.
///
/// With rehash on, everything enabled is recomputed and prior digests are
/// overwritten. Otherwise only columns with no stored digest are selected,
/// which is the default path and skips I/O entirely for unchanged files.
pub async fn select_targets(
    file: &FileDescriptor,
    settings: &Settings,
    store: &dyn DigestStore,
) -> Result<Vec<Algorithm>> {
    let enabled = settings.enabled_algorithms();
    if settings.rehash {
        return Ok(enabled);
    }

    let mut targets = Vec::with_capacity(enabled.len());
    for algo in enabled {
        if store.get(file.id, algo).await?.is_none() {
            targets.push(algo);
        }
    }
    Ok(targets)
}

/// Per-run record of files already sent through auto-hash.
///
/// Saving a file re-triggers its load, so without this marker a file whose
/// digest cannot be computed would reload and re-save forever. The tracker
/// is process-local state for one execution context and must be reset at
/// run boundaries; it is not a cache.
#[derive(Debug, Default)]
pub struct AutohashTracker {
    attempted: HashSet<FileId>,
}

impl AutohashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt. Returns false if the file was already attempted
    /// this run.
    pub fn mark_attempted(&mut self, file: FileId) -> bool {
        self.attempted.insert(file)
    }

    pub fn attempted(&self, file: FileId) -> bool {
        self.attempted.contains(&file)
    }

    /// Reinitialize for a new execution context.
    pub fn reset(&mut self) {
        self.attempted.clear();
    }
}

/// Files from a loaded batch that the host should re-save to pick up
/// missing digests.
///
/// Every returned file is marked in the tracker before this returns, so a
/// save that re-enters load cannot select it twice.
pub async fn autohash_candidates(
    files: &[FileDescriptor],
    settings: &Settings,
    store: &dyn DigestStore,
    tracker: &mut AutohashTracker,
) -> Result<Vec<FileId>> {
    if !settings.autohash {
        return Ok(Vec::new());
    }

    let enabled = settings.enabled_algorithms();
    let mut candidates = Vec::new();
    for file in files {
        if tracker.attempted(file.id) || !should_hash(file, settings) {
            continue;
        }
        for &algo in &enabled {
            if store.get(file.id, algo).await?.is_none() {
                tracker.mark_attempted(file.id);
                candidates.push(file.id);
                break;
            }
        }
    }
    Ok(candidates)
}
