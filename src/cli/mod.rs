//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Radact using clap.
//!
//! Exit codes: `0` success, `1` usage or input error, `2` configuration
//! error, `5` fatal error.

pub mod commands;

use clap::{Parser, Subcommand};

/// Radact - PII detection and redaction
#[derive(Parser, Debug)]
#[command(name = "radact")]
#[command(version, about, long_about = None)]
#[command(author = "Radact Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "radact.toml", env = "RADACT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RADACT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and redact PII in a text file
    Redact(commands::redact::RedactArgs),

    /// Score the PII exposure of a text file without redacting it
    Assess(commands::assess::AssessArgs),

    /// Estimate provider cost for a text file
    Estimate(commands::estimate::EstimateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
