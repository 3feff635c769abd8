//! vault-sync entry point.

use std::process::ExitCode;

use clap::Parser;
use vault_sync::cli::{Cli, Commands, commands};
use vault_sync::{Settings, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init();
            tracing::error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // CLI flag takes precedence over config file and environment
    if let Some(root) = cli.root.clone() {
        settings.sync.root = Some(root);
    }

    logging::init_with_config(&settings.logging);

    let result = match cli.resolved_command() {
        Commands::Watch => commands::watch::run(&settings).await,
        Commands::Index { json } => commands::index::run(&settings, json),
        Commands::Config => commands::config::run(&settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
