//! External system integrations.
//!
//! This module holds the adapters that talk to services outside the
//! process:
//!
//! - [`powerbi`] - the report export REST API (trigger, status, file)
//!
//! Adapters convert transport-level failures into domain errors at the
//! boundary, so the rest of the application matches on export semantics
//! instead of HTTP details.
//!
//! ```rust,no_run
//! use report_exporter::adapters::powerbi::PowerBiClient;
//! use report_exporter::config::{ApiConfig, RetryConfig};
//! use report_exporter::domain::{ReportId, WorkspaceId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PowerBiClient::new(
//!     &ApiConfig::default(),
//!     &RetryConfig::default(),
//!     WorkspaceId::new("3d9b93c6-7b6d-4801-a491-1738910904fd")?,
//!     ReportId::new("cfafbeb1-8037-4d0c-896e-a46fb27ff229")?,
//!     "access-token".to_string(),
//! )?;
//! // Use client to trigger and track exports
//! # Ok(())
//! # }
//! ```

pub mod powerbi;
