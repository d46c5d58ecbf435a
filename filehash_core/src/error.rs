//! Error types for the File Hash core library
//!
//! Errors are grouped into categories that mirror the collaborator
//! boundaries: file system I/O, the digest store, and configuration or
//! input validation. Note that an unreadable file is NOT an error anywhere
//! in this crate; it resolves to missing digests.

use thiserror::Error;

pub mod io;
pub mod store;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::store::{StoreError, StoreErrorKind};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the File Hash core library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Digest store and duplicate index errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Validation and configuration errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// True when the digest store reported a lookup against a column that
    /// does not exist yet. This is the only error the dedupe resolver
    /// recovers from (once, via schema maintenance).
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            Error::Store(StoreError {
                kind: StoreErrorKind::MissingColumn,
                ..
            })
        )
    }
}

// Conversions from external error types

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(StoreError::from_sqlx(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_display() {
        let error = Error::Io(IoError::file_not_found(Path::new("/test/upload.pdf")));
        let display = error.to_string();
        assert!(display.contains("File not found"));
        assert!(display.contains("/test/upload.pdf"));
    }

    #[test]
    fn test_missing_column_detection() {
        let missing = Error::Store(StoreError::missing_column("no such column: sha224"));
        assert!(missing.is_missing_column());

        let other = Error::Store(StoreError::other("connection reset"));
        assert!(!other.is_missing_column());

        let io: Error = std::io::Error::other("boom").into();
        assert!(!io.is_missing_column());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<()> {
            Err(Error::Validation(ValidationError::unknown_algorithm(
                "whirlpool",
            )))
        }

        assert!(returns_error().is_err());
    }
}
