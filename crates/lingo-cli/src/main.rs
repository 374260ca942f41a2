//! Lingo - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use lingo_cli::{build_service, execute, load_config, Cli};
use lingo_common::{init_dev_logging, init_logging};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.verbose {
        init_dev_logging()
    } else {
        init_logging(&config.logging)
    }
    .context("Failed to initialize logging")?;
    debug!(locales = ?config.locales, "Starting lingo");

    let service = build_service(&config)?;
    debug!(available = ?service.locales(), "Translations loaded");

    let output = execute(&service, &cli.command)?;
    println!("{output}");

    service.dispose();
    Ok(())
}
