//! Test utilities for the File Hash workspace
//!
//! In-memory implementations of the core's collaborator contracts, with
//! call counters so tests can assert on I/O behavior (for example, that a
//! re-save of an unchanged file never reopens its byte stream).

pub mod mocks;

pub use mocks::filesystem::MockFileSource;
pub use mocks::store::{IndexRow, MockDigestStore, MockDuplicateIndex, MockSchemaMaintainer};
