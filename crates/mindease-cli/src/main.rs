//! MindEase command-line interface
//!
//! # Modes
//!
//! - `mindease chat` runs an interactive conversation in the terminal.
//! - `mindease ask "<message>"` answers a single message and exits.
//! - `mindease analyze "<message>"` shows the routing decision only.
//! - `mindease serve` runs the HTTP proxy that the web client talks to.
//! - `mindease config show` prints the effective configuration.
//!
//! Set `RUST_LOG=debug` for verbose logging.

// Allow common clippy lints that are stylistic preferences
#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

mod args;
mod commands;
mod console;
mod render;
mod router;
mod server;
mod session;

use clap::Parser;
use console::CliConsole;
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() {
    // Provider keys are commonly kept in a .env file next to the binary
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = router::route(cli).await {
        CliConsole::new(false).error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
