//! n8r - Injectionator CLI
//!
//! Signs a terminal session in to Injectionator with the OAuth device
//! authorization flow and keeps the resulting token under `~/.n8r` for
//! later invocations.

mod auth;
mod cli;
mod client;
mod config;
mod error;

use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

use crate::cli::commands::version_line;
use crate::cli::{Cli, Commands};
use crate::config::settings::env;
use crate::config::{load_config, AppPaths};
use crate::error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse_lenient(std::env::args_os()).unwrap_or_else(|e| e.exit());

    // Initialize logging
    let default_filter = if cli.verbose { "n8r=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(env::LOG_LEVEL)
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Run the command
    if let Err(e) = run(cli).await {
        if e.is_cli_misuse() {
            eprintln!("{e}");
        } else {
            eprintln!("Error: {e}");
        }
        if e.shows_usage() {
            eprintln!();
            eprint!("{}", Cli::command().render_help());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.version {
        println!("{}", version_line());
        return Ok(());
    }

    let Some(command) = cli.command else {
        print!("{}", Cli::command().render_help());
        return Ok(());
    };

    match command {
        Commands::Version { .. } => {
            println!("{}", version_line());
            Ok(())
        }
        Commands::Login { open, .. } => {
            let paths = AppPaths::from_home()?;
            let config = load_config(&paths)?;
            cli::commands::handle_login(&config, &paths, open).await
        }
        Commands::Logout { .. } => cli::commands::handle_logout(&AppPaths::from_home()?),
        Commands::Status { .. } => cli::commands::handle_status(&AppPaths::from_home()?),
        Commands::External(args) => {
            cli::commands::handle_external(&AppPaths::from_home()?, &args)
        }
    }
}
