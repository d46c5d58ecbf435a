//! Digest store and duplicate index error types

use thiserror::Error;

/// Error reported by a digest store collaborator
#[derive(Error, Debug)]
#[error("{}", format_store_error(self))]
pub struct StoreError {
    /// The kind of store failure
    pub kind: StoreErrorKind,
    /// Back-end specific detail
    pub message: String,
}

/// Kind of store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// A lookup referenced a digest column that does not exist yet, e.g.
    /// configuration enabled an algorithm before schema maintenance ran.
    /// Recoverable exactly once via `SchemaMaintainer::ensure_columns`.
    MissingColumn,
    /// The store is unreachable or the connection was lost.
    Unavailable,
    /// Any other back-end failure.
    Other,
}

impl StoreError {
    /// Create a missing column error
    pub fn missing_column(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::MissingColumn,
            message: message.into(),
        }
    }

    /// Create an unavailable store error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Unavailable,
            message: message.into(),
        }
    }

    /// Create a generic store error
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Other,
            message: message.into(),
        }
    }

    /// Map a sqlx error onto the store error taxonomy.
    ///
    /// SQLite reports a lookup against an absent column as a database error
    /// whose message names the column; that is the schema-mismatch case the
    /// dedupe resolver recovers from.
    #[cfg(feature = "database")]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.message().contains("no such column") => {
                Self::missing_column(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::unavailable(err.to_string())
            }
            _ => Self::other(err.to_string()),
        }
    }
}

fn format_store_error(error: &StoreError) -> String {
    match error.kind {
        StoreErrorKind::MissingColumn => {
            format!("Digest store schema mismatch: {}", error.message)
        }
        StoreErrorKind::Unavailable => format!("Digest store unavailable: {}", error.message),
        StoreErrorKind::Other => format!("Digest store error: {}", error.message),
    }
}
