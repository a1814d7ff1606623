//! Upload inputs, remote path rules and batch reporting.
//!
//! Uploaded images are stored as `{folder}/{epoch_ms}_{sanitized_name}`. The
//! timestamp prefix keeps names unique in practice and makes descending name
//! order match upload order. Nothing checks for an existing file at the
//! generated path, so two uploads of the same name within one millisecond
//! collide and the second is rejected by GitHub.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;

use crate::{VaultError, VaultResult};

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;

/// Source of the millisecond timestamp used in upload paths.
pub type Clock = fn() -> i64;

/// Wall-clock milliseconds since the Unix epoch.
pub fn system_clock() -> i64 {
    Utc::now().timestamp_millis()
}

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name, without directories.
    pub name: String,
    /// MIME type guessed from the extension.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::ReadFile` if the file cannot be read.
    pub async fn from_path(path: &Path) -> VaultResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| VaultError::ReadFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::new(file_name_of(path), bytes))
    }

    /// Returns true for `image/*` content types.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// The file content as standard base64, as the contents API expects.
    pub fn base64_content(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// The last component of `path`, or the whole path if it has none.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// True if the extension of `name` maps to an `image/*` type.
pub fn is_image_name(name: &str) -> bool {
    content_type_for(name).starts_with("image/")
}

/// Guesses a MIME type from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Replaces every character outside `[a-zA-Z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name and full repository path an upload is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub file_name: String,
    pub path: String,
}

impl UploadTarget {
    pub fn new(folder: &str, timestamp_ms: i64, original_name: &str) -> Self {
        let file_name = format!("{}_{}", timestamp_ms, sanitize_file_name(original_name));
        let path = format!("{}/{}", folder.trim_end_matches('/'), file_name);
        Self { file_name, path }
    }

    pub fn commit_message(&self) -> String {
        format!("Add image: {}", self.file_name)
    }
}

pub fn delete_commit_message(name: &str) -> String {
    format!("Delete image: {}", name)
}

/// An upload that was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

/// Aggregate outcome of an upload batch.
///
/// Only image files are counted; other files are dropped before the batch starts.
/// An image that could not be read from disk counts as a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.uploaded += 1;
    }

    pub fn record_failure(&mut self, file_name: &str, message: impl Into<String>) {
        self.failed += 1;
        self.failures.push(UploadFailure {
            file_name: file_name.to_string(),
            message: message.into(),
        });
    }

    /// True if no upload in the batch failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// `Uploaded N, failed M`
    pub fn summary(&self) -> String {
        format!("Uploaded {}, failed {}", self.uploaded, self.failed)
    }
}
