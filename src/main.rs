//! jobtrack: a terminal job-application tracker
//!
//! Keeps job applications in a local SQLite mirror and, when a GitHub token
//! is configured, merges them with a JSON file in a repository.

mod app;
mod cli;
mod commands;
mod data;
mod error;
mod sync;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(cli.data_dir, cli.verbose);

    init_tracing(&config, matches!(cli.command, Commands::Show));
    tracing::debug!(data_dir = %config.data_dir.display(), "starting jobtrack");

    commands::run(&config, cli.command)
}

fn init_tracing(config: &AppConfig, interactive: bool) {
    let filter = match config.verbose {
        0 => "warn,jobtrack=info",
        1 => "info,jobtrack=debug",
        2 => "debug,jobtrack=trace",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if !interactive {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return;
    }

    // The TUI owns the terminal, so log to a file in the data directory
    let log_path = config.log_path();
    let file = std::fs::create_dir_all(&config.data_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&log_path));
    match file {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        Err(e) => {
            eprintln!("Logging disabled, cannot open {log_path:?}: {e}");
        }
    }
}
