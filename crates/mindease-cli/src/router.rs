//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use crate::console::CliConsole;
use anyhow::{Context, Result};
use mindease_core::{AppConfig, ConfigLoader};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let console = CliConsole::new(cli.verbose);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Chat => commands::chat::run(&console, &config).await,
        Commands::Ask { message, no_stream } => {
            commands::ask::run(&console, &config, &message, !no_stream).await
        }
        Commands::Analyze { message } => commands::analyze::run(&console, &config, &message),
        Commands::Serve { .. } => commands::serve::run(&console, &config).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&console, &config),
        },
    }
}

/// Defaults, then the config file if present, then environment, then flags
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = cli.config_path();
    let mut loader = ConfigLoader::new().with_defaults();
    if path.exists() {
        loader = loader.with_file(&path);
    } else if cli.config_file.is_some() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    loader
        .with_env()
        .with_args(cli.overrides())
        .load()
        .with_context(|| format!("Failed to load configuration (file: {})", path.display()))
}
