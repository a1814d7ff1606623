//! # Models
//!
//! Repository metadata returned by the access check. Only the fields the gallery
//! reports back to the user are kept; everything else in GitHub's response is
//! ignored during deserialization.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Represents a GitHub repository.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo = Repository::new(
///     "pictures".to_string(),
///     "octocat/pictures".to_string(),
///     "main".to_string(),
///     false
/// );
///
/// println!("Repository: {}", repo.full_name());
/// println!("Is private: {}", repo.is_private());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    /// The full name of the repository (owner/name)
    #[serde(default)]
    full_name: String,
    /// The name of the repository
    name: String,
    /// The branch GitHub shows by default
    #[serde(default)]
    default_branch: Option<String>,
    /// Whether the repository is private
    #[serde(default)]
    private: bool,
}

impl Repository {
    /// Creates a new Repository instance.
    pub fn new(name: String, full_name: String, default_branch: String, private: bool) -> Self {
        Self {
            full_name,
            name,
            default_branch: Some(default_branch),
            private,
        }
    }

    /// Returns the repository's default branch, if GitHub reported one.
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    /// Returns the full name including owner (owner/repo).
    ///
    /// Falls back to the bare name when GitHub did not send `full_name`.
    pub fn full_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    /// Returns whether the repository is private.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }
}
