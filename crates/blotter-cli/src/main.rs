//! Blotter CLI - operator front end for the offline sync queue
//!
//! Record mutations, inspect what is waiting, and push it to the REST backend.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands, QueueCommands};
use crate::commands::common::{resolve_db_path, resolve_settings};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::queue::{run_queue_add, run_queue_clear, run_queue_list};
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blotter=info")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Queue { command } => match command {
            QueueCommands::List { json } => run_queue_list(json, &db_path).await?,
            QueueCommands::Add {
                entity,
                action,
                file,
                deliver,
            } => {
                let settings = resolve_settings(cli.api_base_url, profile)?;
                run_queue_add(entity, action, file.as_deref(), deliver, &settings, &db_path)
                    .await?;
            }
            QueueCommands::Clear => run_queue_clear(&db_path).await?,
        },
        Commands::Sync => {
            let settings = resolve_settings(cli.api_base_url, profile)?;
            run_sync(&settings, &db_path).await?;
        }
        Commands::Watch { interval } => {
            let settings = resolve_settings(cli.api_base_url, profile)?;
            run_watch(&settings, interval, &db_path, async {
                if let Err(error) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {error}");
                }
            })
            .await?;
        }
        Commands::Config { command } => run_config(command, profile, cli.api_base_url)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
