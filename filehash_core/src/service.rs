//! File hash service façade
//!
//! Wires policy, the streaming hasher, and the collaborator contracts into
//! the operations hosts call around their save and validation hooks.

use crate::algorithm::Algorithm;
use crate::dedupe::{self, DedupeViolation};
use crate::hasher::{DigestMap, MultiHasher};
use crate::policy::{self, AutohashTracker};
use crate::settings::{DedupeLevel, Settings};
use crate::store::{
    DigestStore, DuplicateIndex, FileDescriptor, FileId, FileSource, SchemaMaintainer,
};
use crate::Result;
use log::debug;
use std::sync::Arc;

/// The File Hash service.
pub struct FileHashService {
    settings: Settings,
    hasher: MultiHasher,
    store: Arc<dyn DigestStore>,
    index: Arc<dyn DuplicateIndex>,
    schema: Arc<dyn SchemaMaintainer>,
    source: Arc<dyn FileSource>,
}

impl FileHashService {
    pub fn new(
        settings: Settings,
        store: Arc<dyn DigestStore>,
        index: Arc<dyn DuplicateIndex>,
        schema: Arc<dyn SchemaMaintainer>,
        source: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            settings,
            hasher: MultiHasher::new(),
            store,
            index,
            schema,
            source,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Pre-save hook: bring the file's digest columns up to date.
    ///
    /// With rehash off only missing digests are computed, so saving an
    /// already-hashed file does not reopen its byte stream. `new` marks the
    /// creation event that qualifies for original-digest capture.
    pub async fn presave(&self, file: &FileDescriptor, new: bool) -> Result<()> {
        let targets = policy::select_targets(file, &self.settings, self.store.as_ref()).await?;
        if targets.is_empty() {
            debug!("file {} has no digest columns to compute", file.id);
            return Ok(());
        }
        self.hash_file(file, &targets, new && self.settings.original)
            .await
    }

    /// Compute the given columns and write them back to the store.
    ///
    /// When `original` is set, values also land in the original slot, but
    /// only where that slot is still empty; re-hashing never touches an
    /// existing original digest.
    pub async fn hash_file(
        &self,
        file: &FileDescriptor,
        targets: &[Algorithm],
        original: bool,
    ) -> Result<()> {
        if targets.is_empty() {
            return Ok(());
        }
        let digests = self.compute(file, targets).await;
        for (algo, digest) in &digests {
            self.store.set(file.id, *algo, digest.as_deref()).await?;
            if original && self.store.get_original(file.id, *algo).await?.is_none() {
                self.store
                    .set_original(file.id, *algo, digest.as_deref())
                    .await?;
            }
        }
        Ok(())
    }

    /// Compute digests for the given columns without writing anything.
    ///
    /// Files that do not qualify for hashing resolve every column to `None`.
    pub async fn compute(&self, file: &FileDescriptor, targets: &[Algorithm]) -> DigestMap {
        if !policy::should_hash(file, &self.settings) {
            return targets.iter().map(|&algo| (algo, None)).collect();
        }
        match &file.uri {
            Some(uri) => {
                self.hasher
                    .hash_source(self.source.as_ref(), uri, targets)
                    .await
            }
            // should_hash already rejected uri-less files; kept for safety.
            None => targets.iter().map(|&algo| (algo, None)).collect(),
        }
    }

    /// Upload-validation hook: report a duplicate of this file, if any.
    ///
    /// Stored digests are used where present; anything missing is computed
    /// on the fly so validation can run before the first write. Honors the
    /// configured dedupe level, returning nothing when it is off.
    pub async fn validate(&self, file: &FileDescriptor) -> Result<Vec<DedupeViolation>> {
        let strict = match self.settings.dedupe {
            DedupeLevel::Off => return Ok(Vec::new()),
            DedupeLevel::Enabled => false,
            DedupeLevel::Strict => true,
        };

        let digests = self.current_digests(file).await?;
        dedupe::check_duplicate(
            &digests,
            &self.settings,
            self.index.as_ref(),
            self.schema.as_ref(),
            strict,
        )
        .await
    }

    /// Load hook: files from this batch the host should re-save to pick up
    /// missing digests. Guarded per run by the tracker.
    pub async fn on_load(
        &self,
        files: &[FileDescriptor],
        tracker: &mut AutohashTracker,
    ) -> Result<Vec<FileId>> {
        policy::autohash_candidates(files, &self.settings, self.store.as_ref(), tracker).await
    }

    /// Stored digests for the enabled set, computing any that are absent.
    async fn current_digests(&self, file: &FileDescriptor) -> Result<DigestMap> {
        let mut digests = DigestMap::new();
        let mut missing = Vec::new();
        for algo in self.settings.enabled_algorithms() {
            match self.store.get(file.id, algo).await? {
                Some(digest) => {
                    digests.insert(algo, Some(digest));
                }
                None => missing.push(algo),
            }
        }
        if !missing.is_empty() {
            digests.extend(self.compute(file, &missing).await);
        }
        Ok(digests)
    }
}
