//! Crate for interacting with the GitHub contents API.
//!
//! This crate provides the remote half of the image vault: checking that a
//! personal access token can see a repository, listing a folder, creating a file
//! and removing a file. Each operation is a single request with no retry and no
//! timeout.
//!
//! The [`ContentClient`] trait is the seam the rest of the workspace depends on;
//! [`GitHubClient`] is the octocrab-backed implementation.

use async_trait::async_trait;
use http::{header::ACCEPT, StatusCode};
use octocrab::{service::middleware::retry::RetryConfig, Octocrab, Result as OctocrabResult};
use secrecy::ExposeSecret;
use tracing::{debug, error, info, instrument};

pub mod contents;
pub use contents::{CommitSummary, DeleteFilePayload, EntryType, FileCommit, PutFilePayload, TreeEntry};

pub mod errors;
pub use errors::Error;

pub mod models;

pub mod session;
pub use session::{Session, DEFAULT_BRANCH};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Base URL of the public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Media type sent with every request.
pub const GITHUB_ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Trait for the repository contents operations the gallery is built on.
///
/// Every method takes the [`Session`] explicitly so implementations hold no
/// per-user state.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Checks that the session's token can read the session's repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthError` with a fixed message for any non-2xx response and
    /// `Error::Network` if no response was received.
    async fn verify_access(&self, session: &Session) -> Result<models::Repository, Error>;

    /// Lists the entries of a folder in the session's repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the folder does not exist and
    /// `Error::ApiError` with GitHub's message for other non-2xx responses.
    async fn list_folder(&self, session: &Session, folder: &str) -> Result<Vec<TreeEntry>, Error>;

    /// Creates a file at `path` on the session's branch.
    ///
    /// `content` must already be base64 encoded. No prior sha is sent, so writing
    /// to an existing path is rejected by GitHub.
    ///
    /// # Errors
    ///
    /// Returns `Error::ApiError` with GitHub's message for non-2xx responses.
    async fn put_file(
        &self,
        session: &Session,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<FileCommit, Error>;

    /// Removes the file at `path`, provided its current blob sha is `sha`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ApiError` with GitHub's message if the sha is stale or the
    /// path does not exist.
    async fn delete_file(
        &self,
        session: &Session,
        path: &str,
        sha: &str,
        message: &str,
    ) -> Result<FileCommit, Error>;
}

/// A client for the GitHub contents API, authenticated per session with a
/// personal access token.
#[derive(Debug, Clone, Default)]
pub struct GitHubClient {
    base_uri: Option<String>,
}

impl GitHubClient {
    /// Creates a client that talks to the public GitHub API.
    pub fn new() -> Self {
        Self { base_uri: None }
    }

    /// Creates a client that talks to a different API root, e.g. a GitHub
    /// Enterprise server or a mock server in tests.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: Some(base_uri.into()),
        }
    }

    /// Returns the API root requests are sent to.
    pub fn base_uri(&self) -> &str {
        self.base_uri.as_deref().unwrap_or(GITHUB_API_URL)
    }

    fn client_for(&self, session: &Session) -> Result<Octocrab, Error> {
        create_token_client(session.token.expose_secret(), self.base_uri.as_deref())
    }
}

#[async_trait]
impl ContentClient for GitHubClient {
    #[instrument(skip(self, session), fields(owner = %session.owner, repo = %session.repo))]
    async fn verify_access(&self, session: &Session) -> Result<models::Repository, Error> {
        let client = self.client_for(session)?;
        let route = format!("/repos/{}/{}", session.owner, session.repo);

        debug!("Making API call to: {}", route);
        let result: OctocrabResult<models::Repository> = client.get(route, None::<&()>).await;
        match result {
            Ok(repository) => {
                info!(
                    full_name = repository.full_name(),
                    "Verified access to repository"
                );
                Ok(repository)
            }
            Err(e) => match map_octocrab_error("Failed to verify repository access", e) {
                Error::Network(msg) => Err(Error::Network(msg)),
                _ => Err(Error::invalid_credentials()),
            },
        }
    }

    #[instrument(skip(self, session), fields(owner = %session.owner, repo = %session.repo))]
    async fn list_folder(&self, session: &Session, folder: &str) -> Result<Vec<TreeEntry>, Error> {
        let client = self.client_for(session)?;
        let route = contents_route(session, folder);

        debug!("Making API call to: {}", route);
        let result: OctocrabResult<Vec<TreeEntry>> = client.get(route, None::<&()>).await;
        match result {
            Ok(entries) => {
                info!(count = entries.len(), "Listed folder contents");
                Ok(entries)
            }
            Err(e) => Err(map_octocrab_error("Failed to list folder", e)),
        }
    }

    #[instrument(skip(self, session, content, message), fields(owner = %session.owner, repo = %session.repo, branch = %session.branch))]
    async fn put_file(
        &self,
        session: &Session,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<FileCommit, Error> {
        let client = self.client_for(session)?;
        let payload = PutFilePayload {
            message: message.to_string(),
            content: content.to_string(),
            branch: session.branch.clone(),
        };

        let result: OctocrabResult<FileCommit> = client
            .put(contents_route(session, path), Some(&payload))
            .await;
        match result {
            Ok(commit) => {
                info!(commit_sha = commit.commit.sha, "Created file");
                Ok(commit)
            }
            Err(e) => Err(map_octocrab_error("Failed to create file", e)),
        }
    }

    #[instrument(skip(self, session, message), fields(owner = %session.owner, repo = %session.repo, branch = %session.branch))]
    async fn delete_file(
        &self,
        session: &Session,
        path: &str,
        sha: &str,
        message: &str,
    ) -> Result<FileCommit, Error> {
        let client = self.client_for(session)?;
        let payload = DeleteFilePayload {
            message: message.to_string(),
            sha: sha.to_string(),
            branch: session.branch.clone(),
        };

        let result: OctocrabResult<FileCommit> = client
            .delete(contents_route(session, path), Some(&payload))
            .await;
        match result {
            Ok(commit) => {
                info!(commit_sha = commit.commit.sha, "Deleted file");
                Ok(commit)
            }
            Err(e) => Err(map_octocrab_error("Failed to delete file", e)),
        }
    }
}

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// The token is sent as a bearer token and every request carries an explicit
/// `Accept` header. When `base_uri` is `None` the public GitHub API is used.
///
/// Octocrab's retry layer is switched off: a failed request is sent exactly once.
///
/// # Errors
///
/// Returns `Error::AuthError` if the base URI cannot be parsed or the client cannot
/// be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder()
        .personal_token(token.to_string())
        .add_header(ACCEPT, GITHUB_ACCEPT_HEADER.to_string())
        .add_retry_config(RetryConfig::None);

    if let Some(uri) = base_uri {
        builder = builder.base_uri(uri).map_err(|e| {
            error!(base_uri = uri, error = %e, "Invalid GitHub API base URI");
            Error::AuthError(format!("Invalid GitHub API base URI '{}': {}", uri, e))
        })?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build Octocrab client with personal token");
        Error::AuthError("Failed to initialize the GitHub client.".to_string())
    })
}

fn contents_route(session: &Session, path: &str) -> String {
    format!(
        "/repos/{}/{}/contents/{}",
        session.owner,
        session.repo,
        path.trim_start_matches('/')
    )
}

/// Converts an octocrab failure into the client's error taxonomy.
///
/// 404 becomes `NotFound`, rate limiting becomes `RateLimitExceeded`, any other
/// GitHub error keeps its message, and failures without an HTTP response are
/// reported as `Network`.
fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    let mapped = match &e {
        octocrab::Error::GitHub { source, .. } => match source.status_code {
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
            StatusCode::FORBIDDEN if source.message.to_lowercase().contains("rate limit") => {
                Error::RateLimitExceeded
            }
            _ => Error::ApiError(source.message.clone()),
        },
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        other => Error::Network(other.to_string()),
    };
    log_octocrab_error(message, e);
    mapped
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let err = source;
            error!(
                status = err.status_code.as_u16(),
                error_message = err.message,
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, .. } => error!(
            error_message = source.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
