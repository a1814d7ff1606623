//! Gallery state derived from a remote folder listing.
//!
//! The gallery holds no state of its own between refreshes: every refresh lists
//! the folder again and replaces the view wholesale.

use github_client::{ContentClient, Session, TreeEntry};
use tracing::{debug, info};

use crate::{VaultError, VaultResult};

#[cfg(test)]
#[path = "gallery_tests.rs"]
mod tests;

/// File extensions shown in the gallery (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Text shown when the folder is missing or holds no images.
pub const EMPTY_GALLERY_MESSAGE: &str = "No images yet. Upload your first image!";

/// Returns true if the file name ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_image_file_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, extension)) => IMAGE_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known)),
        None => false,
    }
}

/// An image file in the gallery folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub name: String,
    pub path: String,
    /// Blob sha, required to delete the file.
    pub sha: String,
    pub size: u64,
    pub download_url: Option<String>,
}

impl GalleryItem {
    /// Converts a listing entry, returning `None` for anything that is not an
    /// image file.
    pub fn from_entry(entry: TreeEntry) -> Option<Self> {
        if !entry.is_file() || !is_image_file_name(&entry.name) {
            return None;
        }

        Some(Self {
            name: entry.name,
            path: entry.path,
            sha: entry.sha,
            size: entry.size,
            download_url: entry.download_url,
        })
    }
}

/// What the gallery shows after a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryView {
    /// The folder does not exist yet, or contains no images.
    #[default]
    Empty,

    /// Images ordered by file name, newest upload first.
    Images(Vec<GalleryItem>),
}

impl GalleryView {
    /// Builds a view from a folder listing: keeps image files and sorts them by
    /// name, descending.
    pub fn from_listing(entries: Vec<TreeEntry>) -> Self {
        let mut items: Vec<GalleryItem> = entries
            .into_iter()
            .filter_map(GalleryItem::from_entry)
            .collect();

        if items.is_empty() {
            return GalleryView::Empty;
        }

        // Names start with the upload timestamp, so descending name order is
        // newest first.
        items.sort_by(|a, b| b.name.cmp(&a.name));
        GalleryView::Images(items)
    }

    pub fn items(&self) -> &[GalleryItem] {
        match self {
            GalleryView::Empty => &[],
            GalleryView::Images(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GalleryView::Empty)
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Looks up an item by file name.
    pub fn find(&self, name: &str) -> Option<&GalleryItem> {
        self.items().iter().find(|item| item.name == name)
    }
}

/// The gallery as last shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryState {
    /// Logged out, or no refresh has run yet.
    #[default]
    NotLoaded,

    /// The latest refresh succeeded.
    Loaded(GalleryView),

    /// The latest refresh failed with this message.
    Failed(String),
}

impl GalleryState {
    /// Returns the view if the latest refresh succeeded.
    pub fn view(&self) -> Option<&GalleryView> {
        match self {
            GalleryState::Loaded(view) => Some(view),
            _ => None,
        }
    }
}

/// Lists `folder` and builds a fresh view from it.
///
/// A missing folder is not an error: it yields [`GalleryView::Empty`].
///
/// # Errors
///
/// Any other client failure is returned unchanged as a [`VaultError`].
pub async fn refresh(
    client: &dyn ContentClient,
    session: &Session,
    folder: &str,
) -> VaultResult<GalleryView> {
    debug!(folder = folder, "Refreshing gallery");

    match client.list_folder(session, folder).await {
        Ok(entries) => {
            let view = GalleryView::from_listing(entries);
            info!(folder = folder, count = view.len(), "Gallery refreshed");
            Ok(view)
        }
        Err(github_client::Error::NotFound) => {
            info!(folder = folder, "Gallery folder does not exist yet");
            Ok(GalleryView::Empty)
        }
        Err(e) => Err(VaultError::from(e)),
    }
}
