//! File Hash Core Library
//!
//! Computes and maintains content hashes for managed files, stores them as
//! indexed lookup keys through host-provided collaborators, and detects
//! duplicate uploads against those stored digests.
//!
//! The two load-bearing pieces are the streaming multi-algorithm hasher
//! (one read of the byte stream, digests for every requested algorithm) and
//! the dedupe resolver (first-match-wins lookup under configurable
//! strictness). Storage, configuration resolution, and file access stay
//! outside the crate behind the traits in [`store`].

pub mod algorithm;
#[cfg(feature = "database")]
pub mod database;
pub mod dedupe;
pub mod error;
pub mod hasher;
pub mod policy;
pub mod service;
pub mod settings;
pub mod store;

// Re-export main types
pub use algorithm::{Algorithm, DigestState, Mechanism};
#[cfg(feature = "database")]
pub use database::{Database, SqliteDigestStore};
pub use dedupe::{DedupeViolation, check_duplicate, find_duplicate};
pub use error::{Error, Result};
pub use hasher::{CHUNK_SIZE, DigestMap, MultiHasher};
pub use policy::{AutohashTracker, autohash_candidates, select_targets, should_hash};
pub use service::FileHashService;
pub use settings::{DedupeLevel, Settings};
pub use store::{
    DigestStore, DuplicateIndex, FileDescriptor, FileId, FileSource, FileStatus, LocalFileSource,
    LookupOptions, SchemaMaintainer,
};
