use image_vault_core::VaultError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the image vault CLI.
///
/// Command failures either come from the core workflow ([`VaultError`]), from
/// the local configuration, or from the terminal itself.
#[derive(Error, Debug)]
pub enum Error {
    /// A workflow operation failed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The workflow ran but reported an error status to the user.
    #[error("{0}")]
    Command(String),

    /// Configuration error occurred while loading or parsing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No gallery item has the requested name.
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// The command needs a saved session.
    #[error("Not logged in. Run `image-vault login` first.")]
    NotLoggedIn,

    /// Saved credentials exist but the session could not be resumed.
    #[error("Could not resume the saved session for {0}. Check your connection or run `image-vault login` again.")]
    SessionUnavailable(String),

    /// Reading from standard input failed.
    #[error("Failed to read from stdin: {0}")]
    StdInReadFailed(String),

    /// Failed to flush the standard output buffer.
    #[error("Failed to flush the std out buffer.")]
    StdOutFlushFailed,
}
