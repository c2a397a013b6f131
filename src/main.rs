//! Main entry point for the exchange-rate-downloader CLI

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use exchange_rate_downloader::cli::{Cli, RunOutcome};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr with optional JSON formatting
///
/// Stdout carries the prompts and the preview, so logs stay off it.
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("exchange_rate_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Bounds that depend on the configuration are reported like any other bad flag
    let config = match cli.to_config() {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    let result = cli
        .execute(&config)
        .await
        .context("exchange rate download failed");

    match result {
        Ok(RunOutcome::Completed { collected }) => debug!("Finished with {} snapshots", collected),
        Ok(outcome) => debug!("Finished: {:?}", outcome),
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
