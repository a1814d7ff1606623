//! Session state machine and the mutation workflows.
//!
//! [`SessionController`] owns the session for the lifetime of the process and
//! sequences every remote call: login and auto-login, logout, upload followed by
//! a delayed refresh, and confirmed delete followed by an immediate refresh.
//!
//! Mutating operations take `&mut self`, so one controller never has two
//! operations in flight. Two separate processes working on the same repository
//! are not coordinated.

use std::{path::PathBuf, sync::Arc, time::Duration};

use github_client::{ContentClient, Session};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    credential_store::CredentialStore,
    gallery::{self, GalleryItem, GalleryState, GalleryView},
    upload::{
        delete_commit_message, file_name_of, is_image_name, system_clock, Clock, UploadFailure,
        UploadFile, UploadReport, UploadTarget,
    },
    VaultError, VaultResult,
};

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

/// Folder in the repository that holds the gallery.
pub const DEFAULT_IMAGES_FOLDER: &str = "images";

/// Pause between the end of an upload batch and the refresh that follows it,
/// giving the remote listing time to catch up.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Where the controller is in the login lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Authenticating,
    LoggedIn,
    /// The last interactive login was rejected with this message.
    AuthError(String),
}

/// Asks the user to approve a destructive action.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt. Used when the user confirmed up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

/// Values entered in the login form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub owner: String,
    pub repo: String,
    pub token: String,
    /// Branch to commit to. Defaults to the saved branch, then `main`.
    pub branch: Option<String>,
}

impl LoginForm {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            branch: None,
        }
    }
}

/// Tunables for the controller.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Repository folder the gallery lives in.
    pub folder: String,
    /// Delay before the refresh that follows an upload batch.
    pub settle_delay: Duration,
    /// Timestamp source for upload paths.
    pub clock: Clock,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            folder: DEFAULT_IMAGES_FOLDER.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            clock: system_clock,
        }
    }
}

/// Coordinates the session, the credential store and the gallery.
pub struct SessionController {
    client: Arc<dyn ContentClient>,
    credentials: CredentialStore,
    settings: ControllerSettings,
    state: SessionState,
    session: Option<Session>,
    gallery: GalleryState,
}

impl SessionController {
    pub fn new(
        client: Arc<dyn ContentClient>,
        credentials: CredentialStore,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            client,
            credentials,
            settings,
            state: SessionState::LoggedOut,
            session: None,
            gallery: GalleryState::NotLoaded,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::LoggedIn && self.session.is_some()
    }

    /// `owner/repo` of the active session.
    pub fn current_user(&self) -> Option<String> {
        self.session.as_ref().map(Session::full_name)
    }

    /// The persisted session, used to pre-fill the login form.
    pub fn saved_session(&self) -> Option<Session> {
        self.credentials.load()
    }

    /// Verifies the entered credentials and starts a session.
    ///
    /// # Errors
    ///
    /// - `VaultError::Validation` if owner, repo or token is blank. No request is
    ///   made and the state is unchanged.
    /// - The access check failure otherwise; the state becomes
    ///   [`SessionState::AuthError`].
    #[instrument(skip(self, form), fields(owner = %form.owner.trim(), repo = %form.repo.trim()))]
    pub async fn login(&mut self, form: LoginForm) -> VaultResult<()> {
        let owner = form.owner.trim();
        let repo = form.repo.trim();
        let token = form.token.trim();

        if owner.is_empty() || repo.is_empty() || token.is_empty() {
            return Err(VaultError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }

        let branch = form
            .branch
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .or_else(|| self.credentials.load().map(|saved| saved.branch))
            .unwrap_or_else(|| github_client::DEFAULT_BRANCH.to_string());
        let session = Session::new(owner, repo, token).with_branch(branch);

        self.state = SessionState::Authenticating;
        info!("Verifying credentials");

        if let Err(e) = self.client.verify_access(&session).await {
            let error = VaultError::from(e);
            warn!(error = %error, "Login failed");
            self.session = None;
            self.gallery = GalleryState::NotLoaded;
            self.state = SessionState::AuthError(error.to_string());
            return Err(error);
        }

        if let Err(e) = self.credentials.save(&session) {
            error!(error = %e, "Failed to persist session, continuing without it");
        }

        info!("Login successful");
        self.start_session(session).await;
        Ok(())
    }

    /// Silently resumes the persisted session.
    ///
    /// Returns true if the controller ended up logged in. Without a complete saved
    /// session no request is made. A failed access check is logged and leaves
    /// the controller logged out; it is never reported to the user.
    #[instrument(skip(self))]
    pub async fn auto_login(&mut self) -> bool {
        let session = match self.credentials.load() {
            Some(session) if session.is_complete() => session,
            _ => {
                debug!("No saved credentials, staying logged out");
                self.state = SessionState::LoggedOut;
                return false;
            }
        };

        self.state = SessionState::Authenticating;
        match self.client.verify_access(&session).await {
            Ok(_) => {
                info!(owner = session.owner, repo = session.repo, "Auto login succeeded");
                self.start_session(session).await;
                true
            }
            Err(e) => {
                warn!(error = %e, "Auto login failed");
                self.state = SessionState::LoggedOut;
                self.session = None;
                false
            }
        }
    }

    /// Ends the session and forgets the saved credentials.
    ///
    /// In-memory state is cleared even if the store cannot be cleared.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Storage` if the persisted session could not be removed.
    pub fn logout(&mut self) -> VaultResult<()> {
        self.session = None;
        self.gallery = GalleryState::NotLoaded;
        self.state = SessionState::LoggedOut;
        info!("Logged out");
        self.credentials.clear()
    }

    /// Re-lists the gallery folder and replaces the gallery state.
    ///
    /// # Errors
    ///
    /// `VaultError::NotLoggedIn` without a session, otherwise the listing failure.
    /// A missing folder is not an error.
    pub async fn refresh_gallery(&mut self) -> VaultResult<GalleryView> {
        let session = self.require_session()?.clone();

        match gallery::refresh(self.client.as_ref(), &session, &self.settings.folder).await {
            Ok(view) => {
                self.gallery = GalleryState::Loaded(view.clone());
                Ok(view)
            }
            Err(e) => {
                error!(error = %e, "Error loading gallery");
                self.gallery = GalleryState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Uploads the image files in `files`, one after the other.
    ///
    /// Files that are not images are dropped before the batch starts and do not
    /// count as failures. A failed upload does not stop the batch. After the last
    /// upload the controller waits for the settle delay and refreshes once.
    ///
    /// Uploads run strictly in sequence: total time grows with the number of
    /// files, and files land in the order given.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotLoggedIn` without a session.
    /// - `VaultError::Validation` if no image files were given.
    #[instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn upload_files(&mut self, files: Vec<UploadFile>) -> VaultResult<UploadReport> {
        let session = self.require_session()?.clone();

        let images: Vec<UploadFile> = files.into_iter().filter(UploadFile::is_image).collect();
        if images.is_empty() {
            return Err(VaultError::Validation(
                "Please select valid image files".to_string(),
            ));
        }

        self.upload_batch(&session, images.into_iter().map(Ok).collect()).await
    }

    /// Reads image files from disk and uploads them as one batch.
    ///
    /// Paths whose name is not an image are skipped without being read. A file
    /// that cannot be read is counted as a failed upload and the rest of the
    /// batch continues.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotLoggedIn` without a session.
    /// - `VaultError::Validation` if no path names an image file.
    #[instrument(skip(self, paths), fields(path_count = paths.len()))]
    pub async fn upload_paths(&mut self, paths: &[PathBuf]) -> VaultResult<UploadReport> {
        let session = self.require_session()?.clone();

        let images: Vec<&PathBuf> = paths
            .iter()
            .filter(|path| is_image_name(&file_name_of(path)))
            .collect();
        if images.is_empty() {
            return Err(VaultError::Validation(
                "Please select valid image files".to_string(),
            ));
        }

        let mut files = Vec::with_capacity(images.len());
        for path in images {
            match UploadFile::from_path(path).await {
                Ok(file) => files.push(Ok(file)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not read image");
                    files.push(Err(UploadFailure {
                        file_name: file_name_of(path),
                        message: e.to_string(),
                    }));
                }
            }
        }

        self.upload_batch(&session, files).await
    }

    async fn upload_batch(
        &mut self,
        session: &Session,
        files: Vec<Result<UploadFile, UploadFailure>>,
    ) -> VaultResult<UploadReport> {
        info!(count = files.len(), "Uploading images");
        let mut report = UploadReport::new();

        for file in files {
            let file = match file {
                Ok(file) => file,
                Err(failure) => {
                    report.record_failure(&failure.file_name, failure.message);
                    continue;
                }
            };

            let target = UploadTarget::new(&self.settings.folder, (self.settings.clock)(), &file.name);
            let result = self
                .client
                .put_file(
                    session,
                    &target.path,
                    &file.base64_content(),
                    &target.commit_message(),
                )
                .await;

            match result {
                Ok(_) => {
                    debug!(path = target.path, "Uploaded image");
                    report.record_success();
                }
                Err(e) => {
                    error!(file_name = file.name, error = %e, "Error uploading image");
                    report.record_failure(&file.name, e.to_string());
                }
            }
        }

        info!(
            uploaded = report.uploaded,
            failed = report.failed,
            "Upload batch finished"
        );

        if !self.settings.settle_delay.is_zero() {
            tokio::time::sleep(self.settings.settle_delay).await;
        }
        self.reload().await;

        Ok(report)
    }

    /// Deletes a gallery item after the user confirms.
    ///
    /// On success the gallery is refreshed immediately. On failure the gallery is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotLoggedIn` without a session.
    /// - The remote failure, e.g. `VaultError::Api` when the item's sha is stale.
    #[instrument(skip(self, item, confirmation), fields(path = %item.path))]
    pub async fn delete_item(
        &mut self,
        item: &GalleryItem,
        confirmation: &dyn Confirmation,
    ) -> VaultResult<DeleteOutcome> {
        let session = self.require_session()?.clone();

        let prompt = format!("Are you sure you want to delete {}?", item.name);
        if !confirmation.confirm(&prompt) {
            debug!("User cancelled deletion");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.client
            .delete_file(
                &session,
                &item.path,
                &item.sha,
                &delete_commit_message(&item.name),
            )
            .await
            .map_err(|e| {
                let error = VaultError::from(e);
                error!(error = %error, "Error deleting image");
                error
            })?;

        info!("Image deleted");
        self.reload().await;
        Ok(DeleteOutcome::Deleted)
    }

    async fn start_session(&mut self, session: Session) {
        self.session = Some(session);
        self.state = SessionState::LoggedIn;
        self.reload().await;
    }

    /// Refresh whose failure is already recorded in the gallery state.
    async fn reload(&mut self) {
        let _ = self.refresh_gallery().await;
    }

    fn require_session(&self) -> VaultResult<&Session> {
        match (&self.state, &self.session) {
            (SessionState::LoggedIn, Some(session)) => Ok(session),
            _ => Err(VaultError::NotLoggedIn),
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("gallery", &self.gallery)
            .finish()
    }
}
