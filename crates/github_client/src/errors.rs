//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the GitHub
//! contents API through the github_client crate. Each variant maps to one class of
//! failure the gallery needs to tell apart: bad credentials, a missing folder, a
//! server-side rejection, or a transport failure.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Message used for every failed access check.
///
/// GitHub answers both "bad token" and "no such repository" with a 401 or 404, so
/// the two cases are reported with the same text.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials or repository not found";

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_folder(&session, "images").await {
///     Ok(entries) => println!("{} entries", entries.len()),
///     Err(Error::NotFound) => println!("No images yet"),
///     Err(Error::ApiError(msg)) => eprintln!("GitHub rejected the request: {}", msg),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub rejected the request with a non-2xx status.
    ///
    /// The contained string is the `message` field of GitHub's error body, passed
    /// through unchanged. A delete with a stale sha ends up here as well.
    #[error("{0}")]
    ApiError(String),

    /// The token was rejected or the repository is not visible to it.
    #[error("{0}")]
    AuthError(String),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The requested resource was not found.
    ///
    /// For folder listings this means the folder has not been created yet.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// Requests are never retried; the caller reports this to the user.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Error {
    /// Returns the error for a failed access check.
    pub fn invalid_credentials() -> Self {
        Error::AuthError(INVALID_CREDENTIALS_MESSAGE.to_string())
    }
}
