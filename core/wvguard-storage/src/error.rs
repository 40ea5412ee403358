//! Error types for the options store.

use thiserror::Error;
use wvguard_license::LicenseError;

/// Result type for options store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the SQLite options store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("options store lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for LicenseError {
    fn from(err: StorageError) -> Self {
        LicenseError::Storage(err.to_string())
    }
}
