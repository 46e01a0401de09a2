//! CLI shell around the launch pipeline.
//!
//! The shell owns the I/O edges the resolver deliberately does not:
//! picking the game directory, logging in, remembering the account and
//! kicking off the process.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use glauncher::launch::platform::default_features;
use glauncher::{auth, HostDescriptor, LaunchCore};

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    // Rooted game directory the resolver works against
    #[arg(short, long)]
    game_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    // List versions available in the game directory
    List,
    // Log in and remember the account
    Login { email: String, password: String },
    // Resolve and start a version
    Launch { version: String },
}


#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let core = LaunchCore::new(&cli.game_dir);

    match cli.command {
        Commands::List => {
            for version in core.available_versions().context("cannot list versions")? {
                println!("{version}");
            }
        }
        Commands::Login { email, password } => {
            let account = auth::authenticate(&email, &password).await?;
            auth::save_account(&cli.game_dir, &account)?;
            println!("logged in as {}", account.user_name);
        }
        Commands::Launch { version } => {
            let account = match auth::load_account(&cli.game_dir) {
                Ok(Some(account)) => account,
                Ok(None) => bail!("no saved account; run `login` first"),
                Err(e) => {
                    // A corrupt record is the same as no account.
                    warn!("cannot read saved account: {e}");
                    bail!("no usable account; run `login` first");
                }
            };

            let host = HostDescriptor::current();
            let pid = core
                .launch(&version, &account, &host, &default_features())
                .await?;
            println!("started {version} (pid {pid})");
        }
    }

    Ok(())
}
