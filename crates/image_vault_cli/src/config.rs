//! Configuration management for the image vault CLI.
//!
//! The configuration lives in `config.toml` inside the application home, which
//! is `$IMAGE_VAULT_HOME` when set and `~/.image_vault` otherwise. Every field
//! has a default, so a missing file simply yields the default configuration.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! [github]
//! api_base_url = "https://api.github.com"
//!
//! [gallery]
//! folder = "images"
//! settle_delay_ms = 1000
//!
//! [storage]
//! backend = "keyring"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use image_vault_core::{ControllerSettings, DEFAULT_IMAGES_FOLDER, DEFAULT_SETTLE_DELAY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the application home directory.
pub const HOME_ENV_VAR: &str = "IMAGE_VAULT_HOME";

/// Directory under the user's home used when [`HOME_ENV_VAR`] is not set.
pub const DEFAULT_HOME_DIR_NAME: &str = ".image_vault";

/// File the `file` storage backend writes the session to.
pub const STORAGE_FILENAME: &str = "storage.json";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the image vault CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))?;

        Ok(config)
    }

    /// Loads the configuration, falling back to defaults when the file is missing.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Saves the configuration as pretty TOML, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Controller tunables derived from the `[gallery]` section.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            folder: self.gallery.folder.clone(),
            settle_delay: Duration::from_millis(self.gallery.settle_delay_ms),
            ..ControllerSettings::default()
        }
    }
}

/// `[github]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the GitHub REST API. Change it for GitHub Enterprise.
    #[serde(default = "GitHubConfig::default_api_base_url")]
    pub api_base_url: String,
}

impl GitHubConfig {
    fn default_api_base_url() -> String {
        github_client::GITHUB_API_URL.to_string()
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
        }
    }
}

/// `[gallery]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Repository folder holding the images.
    #[serde(default = "GalleryConfig::default_folder")]
    pub folder: String,

    /// Milliseconds to wait after an upload batch before re-listing the folder.
    #[serde(default = "GalleryConfig::default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl GalleryConfig {
    fn default_folder() -> String {
        DEFAULT_IMAGES_FOLDER.to_string()
    }

    fn default_settle_delay_ms() -> u64 {
        DEFAULT_SETTLE_DELAY.as_millis() as u64
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            folder: Self::default_folder(),
            settle_delay_ms: Self::default_settle_delay_ms(),
        }
    }
}

/// Where the session is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `storage.json` in the application home. The token is stored in clear text.
    #[default]
    File,
    /// The operating system keyring.
    Keyring,
}

/// `[storage]` section.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Returns the application home directory.
///
/// `$IMAGE_VAULT_HOME` wins when set and non-empty; otherwise `~/.image_vault`,
/// or `./.image_vault` if the home directory cannot be determined.
pub fn app_home() -> PathBuf {
    match std::env::var(HOME_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_HOME_DIR_NAME),
    }
}

/// Resolves the path to the configuration file.
///
/// An explicit path is used as given; otherwise `config.toml` in [`app_home`].
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    match config_path {
        Some(path) => PathBuf::from(path),
        None => app_home().join(DEFAULT_CONFIG_FILENAME),
    }
}
