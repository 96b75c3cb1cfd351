//! Configuration management for the report exporter.
//!
//! Three inputs are loaded here at startup: the optional TOML settings
//! file, the credential file, and the identifier list.
//!
//! # Overview
//!
//! The TOML settings file supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting (the file itself is optional)
//! - `EXPORTER_*` environment variable overrides
//! - Comprehensive validation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use report_exporter::config::{load_config, load_credentials, load_identifiers};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (None probes ./exporter.toml, then defaults)
//! let config = load_config(None)?;
//!
//! // Load the credential and identifier files it points at
//! let credentials = load_credentials(&config.files.credentials)?;
//! let identifiers = load_identifiers(&config.files.identifiers)?;
//!
//! println!("API: {}", config.api.base_url);
//! println!("Exporting {} reports", identifiers.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [files]
//! credentials = "ids.txt"
//! identifiers = "business_ids.csv"
//! output_dir = "downloaded_reports"
//!
//! [export]
//! locale = "fi-FI"
//! concurrency = 25
//!
//! [polling]
//! interval_ms = 5000
//! max_attempts = 60
//! ```
//!
//! # Credential File
//!
//! The credential file is flat `name,value` lines; the optional `bearer`
//! entry has a third field holding the token expiry:
//!
//! ```text
//! client_id,11111111-aaaa-bbbb-cccc-222222222222
//! client_secret,...
//! tenant_id,...
//! group_id_dev,...
//! report_id_pdf_dev,...
//! bearer,eyJ0eXAi...,2024-05-02 15:33:12.123456
//! ```

pub mod credentials;
pub mod identifiers;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use credentials::{load_credentials, CredentialStore, StoredBearer};
pub use identifiers::load_identifiers;
pub use loader::{load_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, ExporterConfig, FilesConfig, LoggingConfig,
    PollingConfig, RetryConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
