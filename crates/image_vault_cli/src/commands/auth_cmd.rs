//! Login, logout and status commands.
//!
//! A successful login saves the session through the configured storage
//! backend. With the default `file` backend the token is written to
//! `storage.json` in clear text; set `[storage] backend = "keyring"` to keep it
//! in the operating system keyring instead.

use clap::Args;
use image_vault_core::{dispatch, AlwaysConfirm, LoginForm, SessionController, StatusMessage, UiEvent};
use tracing::{debug, instrument};

use crate::{commands::into_result, errors::Error};

#[cfg(test)]
#[path = "auth_cmd_tests.rs"]
mod tests;

/// Arguments of `image-vault login`.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Repository owner (user or organisation)
    #[arg(long)]
    pub owner: String,

    /// Repository name
    #[arg(long)]
    pub repo: String,

    /// Personal access token. Prompted for when omitted.
    #[arg(long)]
    pub token: Option<String>,

    /// Branch to commit to. Defaults to the saved branch, then `main`.
    #[arg(long)]
    pub branch: Option<String>,
}

/// Verifies the credentials and saves the session.
///
/// `ask` is used to read the token when it was not given on the command line.
#[instrument(skip(controller, args, ask), fields(owner = %args.owner, repo = %args.repo))]
pub async fn login(
    controller: &mut SessionController,
    args: LoginArgs,
    ask: &dyn Fn(&str) -> Result<String, Error>,
) -> Result<StatusMessage, Error> {
    let token = match args.token {
        Some(token) => token,
        None => ask("GitHub personal access token: ")?,
    };

    let form = LoginForm {
        owner: args.owner,
        repo: args.repo,
        token,
        branch: args.branch,
    };

    let status = dispatch(controller, UiEvent::Login(form), &AlwaysConfirm).await;
    into_result(status)?.ok_or_else(|| Error::Command("Login produced no result".to_string()))
}

/// Forgets the saved session.
pub async fn logout(controller: &mut SessionController) -> Result<StatusMessage, Error> {
    let status = dispatch(controller, UiEvent::Logout, &AlwaysConfirm).await;
    into_result(status)?.ok_or_else(|| Error::Command("Logout produced no result".to_string()))
}

/// Resumes the saved session and describes who is logged in.
pub async fn status(controller: &mut SessionController) -> String {
    if controller.auto_login().await {
        if let Some(user) = controller.current_user() {
            let branch = controller
                .session()
                .map(|s| s.branch.clone())
                .unwrap_or_default();
            return format!("Logged in as {} (branch {})", user, branch);
        }
    }

    debug!("No active session");
    "Not logged in".to_string()
}
