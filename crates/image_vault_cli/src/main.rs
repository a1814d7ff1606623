use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use image_vault_cli::{
    commands::{
        ask_user_for_value,
        auth_cmd::{self, LoginArgs},
        build_controller,
        config_cmd::{self, ConfigCommands},
        gallery_cmd, print_status, StdinConfirmation,
    },
    config::{get_config_path, AppConfig},
    errors::Error,
};
use image_vault_core::{AlwaysConfirm, Confirmation};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Image Vault CLI: keep an image gallery in a GitHub repository
#[derive(Parser)]
#[command(name = "image-vault")]
#[command(about = "Keep an image gallery in a GitHub repository", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a token and remember the repository
    Login(LoginArgs),

    /// Forget the saved credentials
    Logout,

    /// Show who is logged in
    Status,

    /// List the images in the gallery
    List,

    /// Upload image files
    Upload {
        /// Files to upload. Files that are not images are skipped.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete an image from the gallery
    Delete {
        /// File name as shown by `list`
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the download URL of an image
    Url {
        /// File name as shown by `list`
        name: String,
    },

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config_path = get_config_path(cli.config.as_deref());

    let config = match &cli.command {
        Commands::Config(cmd) => {
            println!("{}", config_cmd::execute(cmd, &config_path)?);
            return Ok(());
        }
        Commands::Version => {
            println!(
                "image-vault version {}",
                option_env!("IMAGE_VAULT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            return Ok(());
        }
        _ => AppConfig::load_or_default(&config_path)?,
    };

    let mut controller = build_controller(&config);

    match cli.command {
        Commands::Login(args) => {
            let status = auth_cmd::login(&mut controller, args, &ask_user_for_value).await?;
            print_status(&status);
        }
        Commands::Logout => {
            let status = auth_cmd::logout(&mut controller).await?;
            print_status(&status);
        }
        Commands::Status => {
            println!("{}", auth_cmd::status(&mut controller).await);
        }
        Commands::List => {
            println!("{}", gallery_cmd::list(&mut controller).await?);
        }
        Commands::Upload { files } => {
            let status = gallery_cmd::upload(&mut controller, &files).await?;
            print_status(&status);
        }
        Commands::Delete { name, yes } => {
            let confirmation: &dyn Confirmation = if yes {
                &AlwaysConfirm
            } else {
                &StdinConfirmation
            };
            match gallery_cmd::delete(&mut controller, &name, confirmation).await? {
                Some(status) => print_status(&status),
                None => println!("Cancelled"),
            }
        }
        Commands::Url { name } => {
            println!("{}", gallery_cmd::url(&mut controller, &name).await?);
        }
        Commands::Config(_) | Commands::Version => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("IMAGE_VAULT_LOG"))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("Error: {e}");
        match &e {
            // Already phrased for the user by the dispatcher
            Error::Command(text) => eprintln!("{}", text.red()),
            _ => eprintln!("{} {}", "Error:".red(), e),
        }
        std::process::exit(1);
    }
}
