//! Logging and observability
//!
//! Structured logging with configurable levels, console output and
//! optional JSON file logging with rotation.
//!
//! # Example
//!
//! ```no_run
//! use report_exporter::logging::init_logging;
//! use report_exporter::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
