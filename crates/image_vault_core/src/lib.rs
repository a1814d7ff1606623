//! Core workflow for the image vault.
//!
//! An image vault is a folder of images inside a GitHub repository. This crate
//! drives the workflow on top of [`github_client::ContentClient`]:
//!
//! - [`credential_store`] persists the session between runs.
//! - [`gallery`] turns a folder listing into an ordered image view.
//! - [`upload`] holds the upload path rules and batch reporting.
//! - [`controller`] is the session state machine that sequences every remote call.
//! - [`dispatch`] maps user events to controller operations and status messages.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use github_client::GitHubClient;
//! use image_vault_core::{
//!     ControllerSettings, CredentialStore, LoginForm, MemoryKeyValueStore, SessionController,
//! };
//!
//! # async fn run() -> image_vault_core::VaultResult<()> {
//! let mut controller = SessionController::new(
//!     Arc::new(GitHubClient::new()),
//!     CredentialStore::new(Arc::new(MemoryKeyValueStore::new())),
//!     ControllerSettings::default(),
//! );
//!
//! controller
//!     .login(LoginForm::new("octocat", "pictures", "ghp_example"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod credential_store;
pub mod dispatch;
pub mod errors;
pub mod gallery;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use controller::{
    AlwaysConfirm, Confirmation, ControllerSettings, DeleteOutcome, LoginForm, SessionController,
    SessionState, DEFAULT_IMAGES_FOLDER, DEFAULT_SETTLE_DELAY,
};
pub use credential_store::{
    CredentialStore, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, STORAGE_KEY,
};
pub use dispatch::{dispatch, StatusKind, StatusMessage, UiEvent};
pub use errors::{VaultError, VaultResult};
pub use gallery::{GalleryItem, GalleryState, GalleryView, EMPTY_GALLERY_MESSAGE};
pub use upload::{UploadFailure, UploadFile, UploadReport};
