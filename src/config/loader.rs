//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Config file probed when no `--config` flag is given
pub const DEFAULT_CONFIG_PATH: &str = "exporter.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file (or falls back to defaults, see below)
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (EXPORTER_* prefix)
/// 5. Validates the configuration
///
/// When `path` is `None` the default location [`DEFAULT_CONFIG_PATH`] is
/// probed; if no file is there the built-in defaults are used, so the
/// tool runs with no flags and no config file at all. An explicitly
/// given path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given file cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use report_exporter::config::loader::load_config;
/// use std::path::Path;
///
/// let config = load_config(Some(Path::new("exporter.toml"))).expect("Failed to load config");
/// ```
pub fn load_config(path: Option<&Path>) -> Result<ExporterConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ExporterError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            read_config_file(path)?
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                debug!("no configuration file found, using built-in defaults");
                ExporterConfig::default()
            }
        }
    };

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ExporterConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {}", e)))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        // Process non-comment lines for env var substitution
        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using EXPORTER_* prefix
///
/// Environment variables follow the pattern: EXPORTER_<SECTION>_<KEY>
/// For example: EXPORTER_API_BASE_URL, EXPORTER_EXPORT_CONCURRENCY
fn apply_env_overrides(config: &mut ExporterConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("EXPORTER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // File location overrides
    if let Ok(val) = std::env::var("EXPORTER_FILES_CREDENTIALS") {
        config.files.credentials = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_FILES_IDENTIFIERS") {
        config.files.identifiers = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_FILES_OUTPUT_DIR") {
        config.files.output_dir = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("EXPORTER_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_API_AUTHORITY_URL") {
        config.api.authority_url = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_API_SCOPE") {
        config.api.scope = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("EXPORTER_EXPORT_FORMAT") {
        config.export.format = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_EXPORT_LOCALE") {
        config.export.locale = val;
    }
    if let Ok(val) = std::env::var("EXPORTER_EXPORT_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.export.concurrency = concurrency;
        }
    }

    // Polling overrides
    if let Ok(val) = std::env::var("EXPORTER_POLLING_INTERVAL_MS") {
        if let Ok(interval) = val.parse() {
            config.polling.interval_ms = interval;
        }
    }
    if let Ok(val) = std::env::var("EXPORTER_POLLING_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.polling.max_attempts = attempts;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("EXPORTER_LOGGING_FILE_ENABLED") {
        config.logging.file_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("EXPORTER_LOGGING_DIRECTORY") {
        config.logging.directory = val;
    }
}
