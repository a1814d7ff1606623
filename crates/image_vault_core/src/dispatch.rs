//! Maps user interface events to controller operations and status messages.
//!
//! Every outcome, success or failure, becomes a [`StatusMessage`]. Nothing is
//! propagated to the caller as an error.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    controller::{Confirmation, DeleteOutcome, LoginForm, SessionController},
    gallery::{GalleryItem, GalleryView, EMPTY_GALLERY_MESSAGE},
    upload::{UploadFile, UploadReport},
    VaultError, VaultResult,
};

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

/// A user action.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Login(LoginForm),
    AutoLogin,
    Logout,
    Refresh,
    FilesSelected(Vec<UploadFile>),
    /// Files picked by path; they are read from disk as part of the batch.
    PathsSelected(Vec<PathBuf>),
    DeleteRequested { item: GalleryItem },
    CopyUrlRequested { item: GalleryItem },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Text shown to the user after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Runs the operation for `event` and describes the result.
///
/// Returns `None` when there is nothing to show: a silent auto-login failure or
/// a delete the user cancelled.
pub async fn dispatch(
    controller: &mut SessionController,
    event: UiEvent,
    confirmation: &dyn Confirmation,
) -> Option<StatusMessage> {
    match event {
        UiEvent::Login(form) => Some(match controller.login(form).await {
            Ok(()) => StatusMessage::success("Login successful!"),
            Err(VaultError::Validation(msg)) => StatusMessage::error(msg),
            Err(e) => StatusMessage::error(format!("Error: {}", e)),
        }),
        UiEvent::AutoLogin => {
            if controller.auto_login().await {
                controller
                    .current_user()
                    .map(|user| StatusMessage::info(format!("Logged in as {}", user)))
            } else {
                None
            }
        }
        UiEvent::Logout => Some(match controller.logout() {
            Ok(()) => StatusMessage::info("Logged out"),
            Err(e) => StatusMessage::error(format!("Logged out, but {}", e)),
        }),
        UiEvent::Refresh => Some(match controller.refresh_gallery().await {
            Ok(view) => describe_view(&view),
            Err(e) => StatusMessage::error(format!("Error loading gallery: {}", e)),
        }),
        UiEvent::FilesSelected(files) => {
            Some(describe_upload(controller.upload_files(files).await))
        }
        UiEvent::PathsSelected(paths) => {
            Some(describe_upload(controller.upload_paths(&paths).await))
        }
        UiEvent::DeleteRequested { item } => {
            match controller.delete_item(&item, confirmation).await {
                Ok(DeleteOutcome::Deleted) => {
                    Some(StatusMessage::success("Image deleted successfully!"))
                }
                Ok(DeleteOutcome::Cancelled) => {
                    debug!(name = item.name, "Delete cancelled");
                    None
                }
                Err(e) => Some(StatusMessage::error(format!("Error deleting image: {}", e))),
            }
        }
        UiEvent::CopyUrlRequested { item } => Some(match item.download_url {
            Some(url) => StatusMessage::info(url),
            None => StatusMessage::error(format!("No download URL for {}", item.name)),
        }),
    }
}

fn describe_view(view: &GalleryView) -> StatusMessage {
    match view {
        GalleryView::Empty => StatusMessage::info(EMPTY_GALLERY_MESSAGE),
        GalleryView::Images(items) => {
            StatusMessage::info(format!("{} image(s) in gallery", items.len()))
        }
    }
}

fn describe_upload(result: VaultResult<UploadReport>) -> StatusMessage {
    match result {
        Ok(report) if report.is_success() => StatusMessage::success(format!(
            "Successfully uploaded {} image(s)!",
            report.uploaded
        )),
        Ok(report) => StatusMessage::error(report.summary()),
        Err(e) => StatusMessage::error(e.to_string()),
    }
}
