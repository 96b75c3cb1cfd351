// Report Exporter - Power BI report batch export tool
// Copyright (c) 2025 Report Exporter Contributors
// Licensed under the MIT License

use clap::Parser;
use report_exporter::cli::commands::export::ExportArgs;
use report_exporter::cli::{Cli, Commands};
use report_exporter::config::load_config;
use report_exporter::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // The config file drives file logging and the default level. When
    // it cannot be loaded, fall back to console-only defaults here and
    // let the command report the error with a proper exit code.
    let config = load_config(cli.config.as_deref()).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config.map(|c| c.logging).unwrap_or_default();

    // The guard flushes buffered file logs when it drops at exit.
    let _logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Report Exporter - Power BI report batch export"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors, flush the file logger first
    drop(_logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command; a bare invocation runs the export batch.
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Some(Commands::Export(args)) => args.execute(cli.config.as_deref()).await,
        Some(Commands::ValidateConfig(args)) => args.execute(cli.config.as_deref()).await,
        Some(Commands::Init(args)) => args.execute().await,
        None => ExportArgs::default().execute(cli.config.as_deref()).await,
    }
}
