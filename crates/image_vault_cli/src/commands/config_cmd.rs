use std::path::Path;

use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file with the default settings
    Init,

    /// Print the effective configuration
    Show,
}

/// Execute the config command against the file at `config_path`.
#[instrument]
pub fn execute(cmd: &ConfigCommands, config_path: &Path) -> Result<String, Error> {
    match cmd {
        ConfigCommands::Init => init_config(config_path),
        ConfigCommands::Show => show_config(config_path),
    }
}

fn init_config(config_path: &Path) -> Result<String, Error> {
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(config_path)?;

    info!(message = "Configuration initialized", path = ?config_path);
    Ok(format!("Configuration initialized at {:?}", config_path))
}

fn show_config(config_path: &Path) -> Result<String, Error> {
    let config = AppConfig::load_or_default(config_path)?;

    toml::to_string_pretty(&config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
}
