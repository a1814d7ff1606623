//! Session credentials for the GitHub contents API.
//!
//! A [`Session`] carries everything a contents API call needs: the repository
//! coordinates, the branch commits are written to, and the personal access token.
//! It is passed explicitly to every [`ContentClient`](crate::ContentClient)
//! operation.

use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Credentials and coordinates of the repository backing the gallery.
///
/// The token is kept in a [`SecretString`] so that it never shows up in `Debug`
/// output or tracing spans.
///
/// # Examples
///
/// ```rust
/// use github_client::Session;
///
/// let session = Session::new("octocat", "pictures", "ghp_example");
/// assert_eq!(session.branch, "main");
/// assert_eq!(session.full_name(), "octocat/pictures");
/// ```
#[derive(Debug)]
pub struct Session {
    /// Owner of the repository (user or organization login)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Personal access token
    pub token: SecretString,

    /// Branch that uploads and deletes are committed to
    pub branch: String,
}

impl Session {
    /// Creates a session on the default branch.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: SecretString::from(token.into()),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }

    /// Replaces the branch commits are written to.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Returns `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns true if owner, repo and token are all non-empty.
    pub fn is_complete(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty() && !self.token.expose_secret().is_empty()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            token: SecretString::from(self.token.expose_secret().to_string()),
            branch: self.branch.clone(),
        }
    }
}
