//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which checks
//! the configuration file and both input files without touching the
//! export service.

use std::path::Path;

use clap::Args;

use crate::config::{load_config, load_credentials, load_identifiers};

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        tracing::info!("Validating configuration");

        println!("🔍 Validating configuration and input files");
        println!();

        // Load configuration (already validated by the loader)
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  API Base URL: {}", config.api.base_url);
        println!("  Authority URL: {}", config.api.authority_url);
        println!("  Format: {}", config.export.format);
        println!("  Locale: {}", config.export.locale);
        println!("  Concurrency: {}", config.export.concurrency);
        println!("  Poll Interval: {}ms", config.polling.interval_ms);
        println!("  Max Poll Attempts: {}", config.polling.max_attempts);
        println!("  Output Directory: {}", config.files.output_dir);
        println!();

        let mut failures = 0;

        match load_credentials(&config.files.credentials) {
            Ok(credentials) => {
                println!("✅ Credential file OK: {}", config.files.credentials);
                println!("   Workspace: {}", credentials.workspace_id);
                println!("   Report: {}", credentials.report_id);
                match &credentials.bearer {
                    Some(bearer) => {
                        println!("   Stored token expires at {}", bearer.expires_at)
                    }
                    None => println!("   No stored token, one will be requested"),
                }
            }
            Err(e) => {
                println!("❌ Credential file invalid");
                println!("   Error: {e}");
                failures += 1;
            }
        }

        match load_identifiers(&config.files.identifiers) {
            Ok(identifiers) => {
                let concerns = identifiers.iter().filter(|i| i.concern).count();
                println!(
                    "✅ Identifier file OK: {} ({} identifiers, {} marked as concern)",
                    config.files.identifiers,
                    identifiers.len(),
                    concerns
                );
            }
            Err(e) => {
                println!("❌ Identifier file invalid");
                println!("   Error: {e}");
                failures += 1;
            }
        }

        println!();
        if failures == 0 {
            println!("✅ All inputs are valid");
            Ok(0)
        } else {
            println!("❌ Validation failed");
            Ok(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_reports_missing_input_files() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("exporter.toml");
        std::fs::write(
            &config_path,
            format!(
                "[files]\ncredentials = \"{0}/no_ids.txt\"\nidentifiers = \"{0}/no_list.csv\"\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let args = ValidateArgs {};
        let code = args.execute(Some(&config_path)).await.unwrap();

        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_accepts_complete_inputs() {
        let dir = TempDir::new().unwrap();
        let credentials = dir.path().join("ids.txt");
        std::fs::write(
            &credentials,
            "client_id,cid\nclient_secret,secret\ntenant_id,tid\ngroup_id_dev,gid\nreport_id_pdf_dev,rid\n",
        )
        .unwrap();
        let identifiers = dir.path().join("business_ids.csv");
        std::fs::write(&identifiers, "1234567\n7654321k\n").unwrap();

        let config_path = dir.path().join("exporter.toml");
        std::fs::write(
            &config_path,
            format!(
                "[files]\ncredentials = \"{}\"\nidentifiers = \"{}\"\n",
                credentials.display(),
                identifiers.display()
            ),
        )
        .unwrap();

        let args = ValidateArgs {};
        let code = args.execute(Some(&config_path)).await.unwrap();

        assert_eq!(code, 0);
    }
}
