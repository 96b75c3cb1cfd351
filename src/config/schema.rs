//! Configuration schema types
//!
//! This module defines the configuration structure for the exporter.
//! Every section has defaults so the tool runs with no config file at
//! all; a TOML file overrides only what it names.

use serde::{Deserialize, Serialize};
use url::Url;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Input/output file locations
    #[serde(default)]
    pub files: FilesConfig,

    /// Service endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// Export request settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Export job polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Transient-failure retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.files.validate()?;
        self.api.validate()?;
        self.export.validate()?;
        self.polling.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid application.log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Input/output file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Credential file path (flat `name,value` lines)
    #[serde(default = "default_credentials_path")]
    pub credentials: String,

    /// Identifier list file path (one business identifier per line)
    #[serde(default = "default_identifiers_path")]
    pub identifiers: String,

    /// Directory the exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl FilesConfig {
    fn validate(&self) -> Result<(), String> {
        if self.credentials.is_empty() {
            return Err("files.credentials cannot be empty".to_string());
        }
        if self.identifiers.is_empty() {
            return Err("files.identifiers cannot be empty".to_string());
        }
        if self.output_dir.is_empty() {
            return Err("files.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            credentials: default_credentials_path(),
            identifiers: default_identifiers_path(),
            output_dir: default_output_dir(),
        }
    }
}

/// Service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Power BI REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the identity authority the token is requested from
    #[serde(default = "default_authority_url")]
    pub authority_url: String,

    /// OAuth scope requested with the client-credentials grant
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Request timeout in seconds (downloads included, so generous)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("api.base_url", &self.base_url),
            ("api.authority_url", &self.authority_url),
        ] {
            if value.is_empty() {
                return Err(format!("{field} cannot be empty"));
            }
            let url = Url::parse(value).map_err(|e| format!("Invalid {field} '{value}': {e}"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(format!("{field} must start with http:// or https://"));
            }
        }

        if self.scope.is_empty() {
            return Err("api.scope cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            authority_url: default_authority_url(),
            scope: default_scope(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Export request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format requested from the service
    #[serde(default = "default_format")]
    pub format: String,

    /// Locale the report is rendered in
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Maximum number of exports running at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Table the report-level filter targets
    #[serde(default = "default_filter_table")]
    pub filter_table: String,

    /// Column the report-level filter targets
    #[serde(default = "default_filter_column")]
    pub filter_column: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_formats = ["PDF", "PPTX", "PNG"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid export.format '{}'. Must be one of: {}",
                self.format,
                valid_formats.join(", ")
            ));
        }

        if self.locale.is_empty() {
            return Err("export.locale cannot be empty".to_string());
        }

        if self.concurrency == 0 || self.concurrency > 100 {
            return Err(format!(
                "export.concurrency must be between 1 and 100, got {}",
                self.concurrency
            ));
        }

        if self.filter_table.is_empty() {
            return Err("export.filter_table cannot be empty".to_string());
        }

        if self.filter_column.is_empty() {
            return Err("export.filter_column cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            locale: default_locale(),
            concurrency: default_concurrency(),
            filter_table: default_filter_table(),
            filter_column: default_filter_column(),
        }
    }
}

/// Export job polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between consecutive status checks in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Number of status checks before an export is declared timed out
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Retry configuration
///
/// Applies to transport-level failures only; HTTP error statuses are
/// never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory the log files are written to
    #[serde(default = "default_log_directory")]
    pub directory: String,

    /// Log rotation strategy
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.rotation.as_str()) {
            return Err(format!(
                "Invalid logging.rotation '{}'. Must be one of: {}",
                self.rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.file_enabled && self.directory.is_empty() {
            return Err("logging.directory cannot be empty when file_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            directory: default_log_directory(),
            rotation: default_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_credentials_path() -> String {
    "ids.txt".to_string()
}

fn default_identifiers_path() -> String {
    "business_ids.csv".to_string()
}

fn default_output_dir() -> String {
    "downloaded_reports".to_string()
}

fn default_base_url() -> String {
    "https://api.powerbi.com".to_string()
}

fn default_authority_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_scope() -> String {
    "https://analysis.windows.net/powerbi/api/.default".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_format() -> String {
    "PDF".to_string()
}

fn default_locale() -> String {
    "fi-FI".to_string()
}

fn default_concurrency() -> usize {
    25
}

fn default_filter_table() -> String {
    "CompanyBasicInfo".to_string()
}

fn default_filter_column() -> String {
    "business_id_k".to_string()
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_max_attempts() -> u32 {
    60
}

fn default_max_retries() -> usize {
    2
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
