//! Error types for the image vault workflow.
//!
//! [`VaultError`] is the taxonomy every controller operation reports. Client
//! failures from `github_client` are folded into it with a `From` conversion so
//! the controller can use `?` on remote calls.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type for image vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur while driving the gallery workflow.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Required input was missing. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    /// The token was rejected or the repository is not visible to it.
    #[error("{0}")]
    Auth(String),

    /// The remote folder or file does not exist.
    #[error("Resource not found")]
    NotFound,

    /// GitHub rejected the request; the server message is kept verbatim.
    ///
    /// A delete with a stale sha lands here too.
    #[error("{0}")]
    Api(String),

    /// No HTTP response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// GitHub's rate limit was hit. Nothing is retried.
    #[error("GitHub rate limit exceeded, try again later")]
    RateLimited,

    /// An operation that needs a session was called while logged out.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The local credential storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A local file could not be read for upload.
    #[error("Failed to read file '{path}': {reason}")]
    ReadFile { path: String, reason: String },
}

impl From<github_client::Error> for VaultError {
    fn from(value: github_client::Error) -> Self {
        match value {
            github_client::Error::AuthError(msg) => VaultError::Auth(msg),
            github_client::Error::NotFound => VaultError::NotFound,
            github_client::Error::ApiError(msg) => VaultError::Api(msg),
            github_client::Error::Network(msg) => VaultError::Network(msg),
            github_client::Error::RateLimitExceeded => VaultError::RateLimited,
            other @ github_client::Error::InvalidResponse => VaultError::Api(other.to_string()),
        }
    }
}
