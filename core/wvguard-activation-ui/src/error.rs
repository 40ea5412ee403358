//! Error types for the activation form.

use thiserror::Error;

/// Result type for form operations.
pub type UiResult<T> = Result<T, UiError>;

#[derive(Debug, Error)]
pub enum UiError {
    /// A submission is already in flight; the controls are disabled.
    #[error("activation already in progress")]
    Busy,

    /// The request to the local action endpoint failed.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with something other than a JSON action response.
    #[error("unexpected response: {0}")]
    Protocol(String),
}
