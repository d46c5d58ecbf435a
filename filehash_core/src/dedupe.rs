//! Duplicate detection over stored digests
//!
//! Looks up a candidate's digests in the duplicate index under the
//! configured strictness and reports at most one violation: algorithms are
//! checked in configured order and the first match wins. A lookup that hits
//! a not-yet-existing digest column triggers schema maintenance once and is
//! retried once; a second failure is fatal.

use crate::algorithm::Algorithm;
use crate::hasher::DigestMap;
use crate::settings::Settings;
use crate::store::{DuplicateIndex, FileId, LookupOptions, SchemaMaintainer};
use crate::Result;
use log::{debug, warn};

/// One reported duplicate, with the human-readable message the host can
/// surface as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeViolation {
    pub algorithm: Algorithm,
    pub duplicate_of: FileId,
    pub message: String,
}

impl DedupeViolation {
    fn new(algorithm: Algorithm, duplicate_of: FileId, expose: bool) -> Self {
        let message = if expose {
            format!("This file has already been uploaded as file {duplicate_of}.")
        } else {
            "Sorry, duplicate files are not permitted.".to_string()
        };
        Self {
            algorithm,
            duplicate_of,
            message,
        }
    }
}

impl std::fmt::Display for DedupeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Find some file already carrying this digest, if any.
///
/// `strict` widens the search to temporary files; `include_original`
/// matches the write-once original column as well as the current one.
pub async fn find_duplicate(
    index: &dyn DuplicateIndex,
    algorithm: Algorithm,
    digest: &str,
    strict: bool,
    include_original: bool,
) -> Result<Option<FileId>> {
    index
        .query(
            algorithm,
            digest,
            LookupOptions {
                include_temporary: strict,
                include_original,
            },
        )
        .await
}

/// Check a candidate's digests against the index.
///
/// Algorithms run in configured order; an algorithm whose digest is not
/// computed (unreadable file, disabled back-end) is skipped without
/// failing. At most one violation is returned.
pub async fn check_duplicate(
    digests: &DigestMap,
    settings: &Settings,
    index: &dyn DuplicateIndex,
    schema: &dyn SchemaMaintainer,
    strict: bool,
) -> Result<Vec<DedupeViolation>> {
    // Original-column matching only means something while original
    // tracking is on.
    let include_original = settings.dedupe_original && settings.original;
    let options = LookupOptions {
        include_temporary: strict,
        include_original,
    };

    let mut violations = Vec::new();
    for algo in settings.enabled_algorithms() {
        let Some(Some(digest)) = digests.get(&algo) else {
            debug!("skipping dedupe on {algo}: no digest computed");
            continue;
        };
        if let Some(fid) = lookup_with_schema_retry(index, schema, algo, digest, options).await? {
            violations.push(DedupeViolation::new(algo, fid, settings.expose_duplicate));
            break;
        }
    }
    Ok(violations)
}

/// One lookup, with a single schema-maintenance recovery.
///
/// Configuration can enable an algorithm before its storage column exists;
/// the first missing-column failure runs `ensure_columns` and retries that
/// lookup exactly once. Any error from the retry propagates.
async fn lookup_with_schema_retry(
    index: &dyn DuplicateIndex,
    schema: &dyn SchemaMaintainer,
    algorithm: Algorithm,
    digest: &str,
    options: LookupOptions,
) -> Result<Option<FileId>> {
    match index.query(algorithm, digest, options).await {
        Err(err) if err.is_missing_column() => {
            warn!("digest column for {algorithm} missing, running schema maintenance");
            schema.ensure_columns().await?;
            index.query(algorithm, digest, options).await
        }
        result => result,
    }
}
