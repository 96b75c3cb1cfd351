//! Domain models and types for the report exporter.
//!
//! This module contains the core domain types and business rules: the
//! identifiers flowing through an export batch and the error type every
//! fallible operation returns.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`BusinessId`], [`WorkspaceId`], [`ReportId`], [`ExportId`])
//! - **Identifier-file entries** ([`BusinessIdentifier`] with its concern flag)
//! - **Error types** ([`ExporterError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! The newtype pattern prevents mixing different ID kinds:
//!
//! ```rust
//! use report_exporter::domain::{BusinessId, ExportId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let business_id = BusinessId::new("1234567-8")?;
//! let export_id = ExportId::new("ZXhwb3J0LTEyMw")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: BusinessId = export_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExporterError>`]:
//!
//! ```rust
//! use report_exporter::domain::{ExporterError, Result};
//!
//! fn example() -> Result<()> {
//!     let id = report_exporter::domain::BusinessId::new("321")
//!         .map_err(ExporterError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::ExporterError;
pub use ids::{BusinessId, BusinessIdentifier, ExportId, ReportId, WorkspaceId, CONCERN_MARKER};
pub use result::Result;
