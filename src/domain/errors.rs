//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types:
//! HTTP and I/O failures are converted to these variants at the adapter
//! boundary so callers match on export semantics, not transport details.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// Variants that concern a single report carry the business identifier
/// they belong to, so one failed export can be reported without
/// disturbing the rest of the batch.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors (config file, credential file, identifier file)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token acquisition failures
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The export job could not be started for an identifier
    #[error("Export request failed for '{identifier}': {message}")]
    ExportRequest { identifier: String, message: String },

    /// The service reported the export job as failed
    #[error("Export failed for '{identifier}': {reason}")]
    ExportFailed { identifier: String, reason: String },

    /// The export job did not reach a terminal state within the attempt budget
    #[error("Export timed out for '{identifier}' after {attempts} status checks")]
    ExportTimeout { identifier: String, attempts: u32 },

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// A response the service sent could not be interpreted
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ExporterError {
    /// The business identifier this error concerns, when it concerns one.
    ///
    /// Batch-level errors (configuration, authentication, connection)
    /// return `None`.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ExporterError::ExportRequest { identifier, .. }
            | ExporterError::ExportFailed { identifier, .. }
            | ExporterError::ExportTimeout { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Only transport-level failures qualify. An HTTP error status is
    /// a definitive answer from the service and is never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExporterError::Connection(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::InvalidResponse(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ExporterError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_export_timeout_display() {
        let err = ExporterError::ExportTimeout {
            identifier: "1234567".to_string(),
            attempts: 60,
        };
        assert_eq!(
            err.to_string(),
            "Export timed out for '1234567' after 60 status checks"
        );
    }

    #[test]
    fn test_export_failed_display() {
        let err = ExporterError::ExportFailed {
            identifier: "1234567".to_string(),
            reason: "ExportDataSourceError".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Export failed for '1234567': ExportDataSourceError"
        );
    }

    #[test]
    fn test_identifier_accessor() {
        let err = ExporterError::ExportRequest {
            identifier: "555".to_string(),
            message: "HTTP 400".to_string(),
        };
        assert_eq!(err.identifier(), Some("555"));

        let err = ExporterError::Authentication("bad secret".to_string());
        assert_eq!(err.identifier(), None);
    }

    #[test]
    fn test_only_connection_errors_are_transient() {
        assert!(ExporterError::Connection("reset".to_string()).is_transient());
        assert!(!ExporterError::Authentication("denied".to_string()).is_transient());
        assert!(!ExporterError::ExportRequest {
            identifier: "1".to_string(),
            message: "HTTP 429".to_string(),
        }
        .is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ExporterError = io_err.into();
        assert!(matches!(err, ExporterError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ExporterError = json_err.into();
        assert!(matches!(err, ExporterError::InvalidResponse(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ExporterError = toml_err.into();
        assert!(matches!(err, ExporterError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = ExporterError::Connection("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
