//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Report Exporter - Power BI report batch export tool
#[derive(Parser, Debug)]
#[command(name = "report-exporter")]
#[command(version, about, long_about = None)]
#[command(author = "Report Exporter Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to exporter.toml when present)
    #[arg(short, long, env = "EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EXPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute; runs the export batch when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a report file for every identifier in the batch
    Export(commands::export::ExportArgs),

    /// Validate configuration and input files
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
