//! Repository contents domain types.
//!
//! This module contains types for working with the GitHub contents API:
//! directory listing entries, the request bodies for creating and removing
//! files, and the commit summary GitHub returns for both writes.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// A single entry in a GitHub repository directory listing.
///
/// Represents files, directories, symlinks, and submodules returned by
/// the GitHub Contents API. The `sha` doubles as the version token that
/// GitHub requires to delete the file.
///
/// # Examples
///
/// ```rust
/// use github_client::{TreeEntry, EntryType};
///
/// let entry = TreeEntry {
///     name: "1700000000000_cat.png".to_string(),
///     path: "images/1700000000000_cat.png".to_string(),
///     entry_type: EntryType::File,
///     sha: "abc123".to_string(),
///     size: 2048,
///     download_url: Some("https://raw.githubusercontent.com/o/r/main/images/1700000000000_cat.png".to_string()),
/// };
///
/// assert!(entry.is_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry name (e.g., "1700000000000_cat.png")
    pub name: String,

    /// Full path within repository (e.g., "images/1700000000000_cat.png")
    pub path: String,

    /// Entry type (file, directory, symlink, submodule)
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Git SHA of the entry
    pub sha: String,

    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,

    /// Download URL for files (None for directories)
    #[serde(default)]
    pub download_url: Option<String>,
}

impl TreeEntry {
    /// Returns true for regular files.
    pub fn is_file(&self) -> bool {
        matches!(self.entry_type, EntryType::File)
    }
}

/// Type of entry in a repository directory.
///
/// Maps to GitHub's content type field in the Contents API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file
    File,

    /// Directory (can contain other entries)
    Dir,

    /// Symbolic link
    Symlink,

    /// Git submodule reference
    Submodule,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
///
/// No `sha` is sent, so the request only succeeds for paths that do not exist yet.
#[derive(Serialize, Debug, Clone)]
pub struct PutFilePayload {
    /// Commit message
    pub message: String,

    /// Base64 encoded file content
    pub content: String,

    /// Branch the commit is created on
    pub branch: String,
}

/// Body of `DELETE /repos/{owner}/{repo}/contents/{path}`.
#[derive(Serialize, Debug, Clone)]
pub struct DeleteFilePayload {
    /// Commit message
    pub message: String,

    /// Blob SHA of the file being removed
    pub sha: String,

    /// Branch the commit is created on
    pub branch: String,
}

/// Response of a contents API write.
///
/// `content` describes the file after the write and is `None` for deletes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileCommit {
    #[serde(default)]
    pub content: Option<TreeEntry>,

    pub commit: CommitSummary,
}

/// The commit created by a contents API write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitSummary {
    pub sha: String,

    #[serde(default)]
    pub message: Option<String>,
}
