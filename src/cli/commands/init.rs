//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "exporter.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put the service principal entries into ids.txt:");
                println!("     client_id, client_secret, tenant_id,");
                println!("     group_id_dev and report_id_pdf_dev");
                println!("  3. List one business identifier per line in business_ids.csv");
                println!("  4. Validate the setup: report-exporter validate-config");
                println!("  5. Run the batch: report-exporter export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Report Exporter Configuration File

[application]
log_level = "info"

[files]
credentials = "ids.txt"
identifiers = "business_ids.csv"
output_dir = "downloaded_reports"

[api]
base_url = "https://api.powerbi.com"
authority_url = "https://login.microsoftonline.com"
timeout_seconds = 120

[export]
format = "PDF"
locale = "fi-FI"
concurrency = 25
filter_table = "CompanyBasicInfo"
filter_column = "business_id_k"

[polling]
interval_ms = 5000
max_attempts = 60

[retry]
max_retries = 2
initial_delay_ms = 500
max_delay_ms = 5000
backoff_multiplier = 2.0

[logging]
file_enabled = false
directory = "logs"
rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Report Exporter Configuration File
#
# This file contains all configuration options with examples and
# explanations. Every value shown is the built-in default, so entries
# can be deleted freely.
#
# Values of the form ${VAR} are substituted from the environment when
# the file is loaded. Any setting can also be overridden with an
# EXPORTER_SECTION_KEY environment variable, e.g.
# EXPORTER_EXPORT_CONCURRENCY=10.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Input and Output Files
# ============================================================================
[files]
# Credential file with one "name,value" entry per line. Required
# entries: client_id, client_secret, tenant_id, group_id_dev,
# report_id_pdf_dev. An optional "bearer,<token>,<expiry>" line seeds
# the token cache.
credentials = "ids.txt"

# Identifier file with one business identifier per line. A trailing
# 'k' marks the identifier as a concern and is stripped before use.
identifiers = "business_ids.csv"

# Directory the report files are written to, one file per identifier.
output_dir = "downloaded_reports"

# ============================================================================
# Service Endpoints
# ============================================================================
[api]
# Base URL of the report export REST API
base_url = "https://api.powerbi.com"

# Authority URL for token acquisition; the tenant id from the
# credential file is appended to it.
authority_url = "https://login.microsoftonline.com"

# OAuth2 scope requested with the client credentials grant
scope = "https://analysis.windows.net/powerbi/api/.default"

# HTTP request timeout in seconds (downloads included)
timeout_seconds = 120

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Output format: PDF, PPTX or PNG
format = "PDF"

# Locale the reports are rendered in
locale = "fi-FI"

# Number of identifiers exported concurrently (1-100)
concurrency = 25

# Report-level filter applied per identifier, rendered as
# "<filter_table>/<filter_column> eq '<identifier>'"
filter_table = "CompanyBasicInfo"
filter_column = "business_id_k"

# ============================================================================
# Status Polling
# ============================================================================
[polling]
# Delay between consecutive status checks in milliseconds
interval_ms = 5000

# Status checks per export job before it is declared timed out
max_attempts = 60

# ============================================================================
# Transient Failure Retries
# ============================================================================
# Applies to connect failures and timeouts only; HTTP error responses
# are never retried.
[retry]
# Retries after the initial attempt (0 disables retrying)
max_retries = 2

# Delay before the first retry in milliseconds
initial_delay_ms = 500

# Upper bound for the backoff delay in milliseconds
max_delay_ms = 5000

# Multiplier applied to the delay after each retry
backoff_multiplier = 2.0

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to console output
file_enabled = false

# Directory the rotated log files are written to
directory = "logs"

# Log rotation (daily, hourly or never)
rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "exporter.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "exporter.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config_parses() {
        let content = InitArgs::generate_minimal_config();
        let config: crate::config::ExporterConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_config_with_examples_parses() {
        let content = InitArgs::generate_config_with_examples();
        let config: crate::config::ExporterConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert!(content.contains("filter_table"));
        assert!(content.contains("max_attempts"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("exporter.toml");
        std::fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };

        let code = args.execute().await.unwrap();
        assert_eq!(code, 2);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# existing");
    }

    #[tokio::test]
    async fn test_init_writes_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("exporter.toml");

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: true,
            force: false,
        };

        let code = args.execute().await.unwrap();
        assert_eq!(code, 0);
        assert!(std::fs::read_to_string(&output)
            .unwrap()
            .contains("[polling]"));
    }
}
