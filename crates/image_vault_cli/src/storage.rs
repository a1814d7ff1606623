//! Session storage backends available to the CLI.

use std::{path::Path, sync::Arc};

use image_vault_core::{FileKeyValueStore, KeyValueStore, VaultError, VaultResult};
use keyring::Entry;
use tracing::debug;

use crate::config::{StorageBackend, STORAGE_FILENAME};

/// Keyring service the session is stored under.
pub const KEY_RING_SERVICE_NAME: &str = "image_vault";

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;

/// Stores each key as a password entry in the operating system keyring.
#[derive(Debug, Clone)]
pub struct KeyringKeyValueStore {
    service: String,
}

impl KeyringKeyValueStore {
    pub fn new() -> Self {
        Self::with_service(KEY_RING_SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> VaultResult<Entry> {
        Entry::new(&self.service, key).map_err(|e| {
            VaultError::Storage(format!("Failed to create an entry in the keyring: {}", e))
        })
    }
}

impl Default for KeyringKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringKeyValueStore {
    fn get_item(&self, key: &str) -> VaultResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::Storage(format!(
                "Failed to read from the keyring: {}",
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> VaultResult<()> {
        self.entry(key)?.set_password(value).map_err(|e| {
            VaultError::Storage(format!("Failed to save to the keyring: {}", e))
        })?;
        debug!(service = self.service, key = key, "Saved keyring entry");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> VaultResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::Storage(format!(
                "Failed to remove from the keyring: {}",
                e
            ))),
        }
    }
}

/// Opens the configured storage backend.
///
/// The file backend keeps `storage.json` in `home`.
pub fn open_store(backend: StorageBackend, home: &Path) -> Arc<dyn KeyValueStore> {
    match backend {
        StorageBackend::File => Arc::new(FileKeyValueStore::new(home.join(STORAGE_FILENAME))),
        StorageBackend::Keyring => Arc::new(KeyringKeyValueStore::new()),
    }
}
