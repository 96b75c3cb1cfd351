//! Export command implementation
//!
//! This module implements the `export` command: one report file per
//! identifier, exported concurrently and collected into a summary.

use std::path::Path;

use clap::Args;

use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportOutcome};
use crate::domain::ExporterError;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the credential file path
    #[arg(long, value_name = "FILE")]
    pub credentials: Option<String>,

    /// Override the identifier file path
    #[arg(long, value_name = "FILE")]
    pub identifiers: Option<String>,

    /// Override the output directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Override the number of concurrent exports
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override the report locale
    #[arg(long)]
    pub locale: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(credentials) = &self.credentials {
            tracing::info!(file = %credentials, "Overriding credential file from CLI");
            config.files.credentials = credentials.clone();
        }

        if let Some(identifiers) = &self.identifiers {
            tracing::info!(file = %identifiers, "Overriding identifier file from CLI");
            config.files.identifiers = identifiers.clone();
        }

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(dir = %output_dir, "Overriding output directory from CLI");
            config.files.output_dir = output_dir.clone();
        }

        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding concurrency from CLI");
            config.export.concurrency = concurrency;
        }

        if let Some(locale) = &self.locale {
            tracing::info!(locale = %locale, "Overriding locale from CLI");
            config.export.locale = locale.clone();
        }

        // Validate configuration after overrides
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        println!("🚀 Starting export batch...");
        println!();

        let coordinator = ExportCoordinator::new(config);
        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export batch could not run");
                eprintln!("Export failed: {e}");
                return Ok(match e {
                    ExporterError::Configuration(_) => 2,
                    ExporterError::Authentication(_) => 3,
                    _ => 5, // Fatal error exit code
                });
            }
        };

        // Display summary
        println!();
        println!("📊 Export Summary:");
        println!("  Total identifiers: {}", summary.total);
        println!("  Succeeded: {}", summary.succeeded);
        println!("  Failed: {}", summary.failed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", summary.success_rate());
        println!();

        if summary.failed > 0 {
            println!("⚠️  Failed identifiers:");
            for outcome in summary.failures() {
                if let ExportOutcome::Failed { identifier, error } = outcome {
                    println!("  - {identifier}: {error}");
                }
            }
            println!();
            println!("⚠️  Export completed with failures");
        } else {
            println!("✅ Export completed successfully!");
        }

        // A finished batch exits cleanly even when identifiers failed;
        // the summary above carries the per-identifier outcomes.
        Ok(0)
    }
}
