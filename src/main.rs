//! Main entry point for the application.
//!
//! This module initializes logging, loads environment variables and the
//! configuration file, and dispatches to the selected pipeline.

mod analysis;
mod cli;
mod config;
mod constants;
mod core;
mod errors;
mod llm;
mod rag;
mod report;
mod utils;
mod workbook;

use clap::Parser;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    utils::init_logging(&cli.logging_level, true);

    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        cli::Command::Compare => core::compare::run(&config).await,
        cli::Command::Plan => core::plan::run(&config).await,
        cli::Command::Chat { document } => core::chat::run(&config, document.as_deref()).await,
    };

    if let Err(e) = outcome {
        error!("Operation failed: {e}");
        std::process::exit(1);
    }
}
