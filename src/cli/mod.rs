//! CLI interface for notional-guard
//!
//! Provides subcommands for:
//! - `run`: Start the guard loop
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notional-guard")]
#[command(about = "Trims futures positions whose notional exceeds a ceiling")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the guard
    Run(RunArgs),
    /// Show the effective configuration
    Config,
}
