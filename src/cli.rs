use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for the application
#[derive(Parser)]
#[command(name = "regplan", about = "Regulatory comparison and compliance plan generator")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "regplan.toml")]
    pub config: PathBuf,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    #[arg(long, default_value_t = String::from("info"))]
    pub logging_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two countries' regulatory attributes and emit the Excel
    /// summary plus a two-country compliance plan document
    Compare,
    /// Build the multi-country compliance plan from every country column
    Plan,
    /// Chat about a generated compliance plan document
    Chat {
        /// Plan document to ground the session in; defaults to the
        /// multi-country plan in the output directory
        #[arg(short, long)]
        document: Option<PathBuf>,
    },
}
