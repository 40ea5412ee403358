//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Transport failure talking to the licensing server.
    #[error("network error: {0}")]
    Network(String),

    /// The licensing server answered with a body that is not JSON.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The licensing server rejected the key.
    #[error("license rejected: {0}")]
    Validation(String),

    /// The host's option storage is unavailable.
    #[error("storage error: {0}")]
    Storage(String),

    /// Integration configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true for failures of the remote call itself (transport or body).
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Protocol(_))
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
