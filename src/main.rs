//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_heatmap` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//!
//! `ip_heatmap collect` and `ip_heatmap serve` are meant to run as two
//! separate processes against the same database file.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_heatmap::initialization::init_logger_with;
use ip_heatmap::{run_collector, run_web_server, Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the variables may come from the container
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match cli.command {
        Command::Collect(config) => run_collector(&cli.db_path, config).await,
        Command::Serve(config) => run_web_server(&cli.db_path, config).await,
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("ip_heatmap error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
