//! Command modules for the image vault CLI.
//!
//! - `auth_cmd`: login, logout and status
//! - `gallery_cmd`: list, upload, delete and url
//! - `config_cmd`: inspect and initialise the configuration file
//!
//! This module also wires the real collaborators (GitHub client, storage
//! backend, stdin confirmation) into a [`SessionController`].

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use colored::Colorize;
use github_client::GitHubClient;
use image_vault_core::{
    Confirmation, CredentialStore, SessionController, StatusKind, StatusMessage,
};

use crate::{config::AppConfig, errors::Error, storage::open_store};

pub mod auth_cmd;
pub mod config_cmd;
pub mod gallery_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Builds a controller from the effective configuration.
pub fn build_controller(config: &AppConfig) -> SessionController {
    let home = crate::config::app_home();
    let client = GitHubClient::with_base_uri(config.github.api_base_url.clone());
    let credentials = CredentialStore::new(open_store(config.storage.backend, &home));

    SessionController::new(Arc::new(client), credentials, config.controller_settings())
}

/// Turns an error status into a command failure.
pub(crate) fn into_result(status: Option<StatusMessage>) -> Result<Option<StatusMessage>, Error> {
    match status {
        Some(status) if status.is_error() => Err(Error::Command(status.text)),
        other => Ok(other),
    }
}

/// Prints a status message, coloured by kind.
pub fn print_status(status: &StatusMessage) {
    match status.kind {
        StatusKind::Success => println!("{}", status.text.green()),
        StatusKind::Info => println!("{}", status.text),
        StatusKind::Error => eprintln!("{}", status.text.red()),
    }
}

/// Prints `request` and reads one trimmed line from stdin.
pub fn ask_user_for_value(request: &str) -> Result<String, Error> {
    print!("{}", request);
    io::stdout().flush().map_err(|_| Error::StdOutFlushFailed)?;

    let mut value = String::new();
    io::stdin()
        .lock()
        .read_line(&mut value)
        .map_err(|e| Error::StdInReadFailed(e.to_string()))?;
    Ok(value.trim().to_string())
}

/// Returns true for a `y`/`yes` answer, ignoring case.
pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on the terminal before destructive actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        match ask_user_for_value(&format!("{} [y/N] ", prompt)) {
            Ok(answer) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}
