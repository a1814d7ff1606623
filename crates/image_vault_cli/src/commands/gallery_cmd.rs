//! Gallery commands: list, upload, delete and url.
//!
//! Each command resumes the saved session first. Resuming already loads the
//! gallery, so commands work from that listing instead of fetching it again.

use std::path::PathBuf;

use image_vault_core::{
    dispatch, AlwaysConfirm, Confirmation, GalleryItem, GalleryState, GalleryView,
    SessionController, StatusMessage, UiEvent, EMPTY_GALLERY_MESSAGE,
};
use tracing::{info, instrument};

use crate::{commands::into_result, errors::Error};

#[cfg(test)]
#[path = "gallery_cmd_tests.rs"]
mod tests;

/// Resumes the saved session unless the controller is already logged in.
///
/// Auto-login itself is silent, so a saved session that could not be resumed
/// is reported separately from having no saved session at all.
pub async fn require_login(controller: &mut SessionController) -> Result<(), Error> {
    if controller.is_logged_in() || controller.auto_login().await {
        return Ok(());
    }

    match controller.saved_session() {
        Some(saved) if saved.is_complete() => Err(Error::SessionUnavailable(saved.full_name())),
        _ => Err(Error::NotLoggedIn),
    }
}

/// Renders the current gallery as text.
#[instrument(skip(controller))]
pub async fn list(controller: &mut SessionController) -> Result<String, Error> {
    require_login(controller).await?;

    let view = match controller.gallery() {
        GalleryState::Loaded(view) => view.clone(),
        GalleryState::Failed(msg) => {
            return Err(Error::Command(format!("Error loading gallery: {}", msg)))
        }
        GalleryState::NotLoaded => controller.refresh_gallery().await?,
    };

    Ok(render_gallery(&view))
}

/// One line per image: name, size in bytes and download URL.
pub fn render_gallery(view: &GalleryView) -> String {
    match view {
        GalleryView::Empty => EMPTY_GALLERY_MESSAGE.to_string(),
        GalleryView::Images(items) => {
            let mut lines: Vec<String> = items
                .iter()
                .map(|item| {
                    format!(
                        "{:<48} {:>10}  {}",
                        item.name,
                        item.size,
                        item.download_url.as_deref().unwrap_or("-")
                    )
                })
                .collect();
            lines.push(format!("{} image(s)", items.len()));
            lines.join("\n")
        }
    }
}

/// Reads the files and uploads the images among them.
///
/// Paths that do not name an image are skipped. A file that cannot be read
/// counts as one failed upload and the rest of the batch still goes through.
#[instrument(skip(controller), fields(file_count = paths.len()))]
pub async fn upload(
    controller: &mut SessionController,
    paths: &[PathBuf],
) -> Result<StatusMessage, Error> {
    if paths.is_empty() {
        return Err(Error::InvalidArguments(
            "at least one file is required".to_string(),
        ));
    }

    require_login(controller).await?;

    let event = UiEvent::PathsSelected(paths.to_vec());
    let status = dispatch(controller, event, &AlwaysConfirm).await;
    into_result(status)?.ok_or_else(|| Error::Command("Upload produced no result".to_string()))
}

/// Deletes the named image after confirmation.
///
/// Returns `None` if the user declined.
#[instrument(skip(controller, confirmation))]
pub async fn delete(
    controller: &mut SessionController,
    name: &str,
    confirmation: &dyn Confirmation,
) -> Result<Option<StatusMessage>, Error> {
    require_login(controller).await?;
    let item = find_item(controller, name)?;

    let status = dispatch(controller, UiEvent::DeleteRequested { item }, confirmation).await;
    let status = into_result(status)?;
    if status.is_none() {
        info!(name = name, "Delete cancelled by user");
    }
    Ok(status)
}

/// Returns the download URL of the named image.
pub async fn url(controller: &mut SessionController, name: &str) -> Result<String, Error> {
    require_login(controller).await?;
    let item = find_item(controller, name)?;

    let status = dispatch(controller, UiEvent::CopyUrlRequested { item }, &AlwaysConfirm).await;
    into_result(status)?
        .map(|status| status.text)
        .ok_or_else(|| Error::ImageNotFound(name.to_string()))
}

fn find_item(controller: &SessionController, name: &str) -> Result<GalleryItem, Error> {
    match controller.gallery() {
        GalleryState::Failed(msg) => Err(Error::Command(format!("Error loading gallery: {}", msg))),
        state => state
            .view()
            .and_then(|view| view.find(name))
            .cloned()
            .ok_or_else(|| Error::ImageNotFound(name.to_string())),
    }
}
