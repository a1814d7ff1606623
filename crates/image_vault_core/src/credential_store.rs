//! Durable storage for the gallery session.
//!
//! The session is persisted as one JSON blob under [`STORAGE_KEY`] in a
//! [`KeyValueStore`]. Stores mirror the browser storage API (`get_item`,
//! `set_item`, `remove_item`) so the backend can be swapped: a JSON file on disk,
//! an in-memory map for tests, or the OS keyring in the CLI.
//!
//! Nothing here is encrypted. The token is written in clear text by the file
//! backend.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use github_client::{Session, DEFAULT_BRANCH};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{VaultError, VaultResult};

#[cfg(test)]
#[path = "credential_store_tests.rs"]
mod tests;

/// Key the session blob is stored under.
pub const STORAGE_KEY: &str = "imageVaultConfig";

/// A string key-value store with the semantics of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it was never set.
    fn get_item(&self, key: &str) -> VaultResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> VaultResult<()>;
}

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> VaultResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| VaultError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> VaultResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Each key maps to a string value. A missing file reads as an empty store and
/// parent directories are created on the first write.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> VaultResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            VaultError::Storage(format!("Failed to read {:?}: {}", self.path, e))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| VaultError::Storage(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> VaultResult<()> {
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| VaultError::Storage(format!("Failed to serialize store: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::Storage(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(&self.path, content).map_err(|e| {
            VaultError::Storage(format!("Failed to write {:?}: {}", self.path, e))
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> VaultResult<()> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// Shape of the persisted blob: `{owner, repo, token, branch}`.
///
/// Missing fields fall back to empty strings (and `main` for the branch) so a
/// partially filled blob still pre-populates what it can.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default)]
    owner: String,

    #[serde(default)]
    repo: String,

    #[serde(default)]
    token: String,

    #[serde(default = "PersistedSession::default_branch")]
    branch: String,
}

impl PersistedSession {
    fn default_branch() -> String {
        DEFAULT_BRANCH.to_string()
    }
}

impl From<&Session> for PersistedSession {
    fn from(value: &Session) -> Self {
        Self {
            owner: value.owner.clone(),
            repo: value.repo.clone(),
            token: value.token.expose_secret().to_string(),
            branch: value.branch.clone(),
        }
    }
}

impl From<PersistedSession> for Session {
    fn from(value: PersistedSession) -> Self {
        Session::new(value.owner, value.repo, value.token).with_branch(value.branch)
    }
}

/// Loads, saves and clears the persisted session.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the persisted session.
    ///
    /// Returns `None` when nothing is stored. A blob that cannot be read or parsed
    /// is logged and also treated as `None`.
    pub fn load(&self) -> Option<Session> {
        let raw = match self.store.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved session found");
                return None;
            }
            Err(e) => {
                error!(error = %e, "Error loading saved config");
                return None;
            }
        };

        match serde_json::from_str::<PersistedSession>(&raw) {
            Ok(persisted) => {
                debug!(owner = persisted.owner, repo = persisted.repo, "Loaded saved session");
                Some(Session::from(persisted))
            }
            Err(e) => {
                error!(error = %e, "Error loading saved config");
                None
            }
        }
    }

    /// Persists the session, overwriting any previous value.
    pub fn save(&self, session: &Session) -> VaultResult<()> {
        let content = serde_json::to_string(&PersistedSession::from(session))
            .map_err(|e| VaultError::Storage(format!("Failed to serialize session: {}", e)))?;

        self.store.set_item(STORAGE_KEY, &content)?;
        info!(owner = session.owner, repo = session.repo, "Saved session");
        Ok(())
    }

    /// Removes the persisted session.
    pub fn clear(&self) -> VaultResult<()> {
        self.store.remove_item(STORAGE_KEY)?;
        info!("Cleared saved session");
        Ok(())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("storage_key", &STORAGE_KEY)
            .finish()
    }
}
