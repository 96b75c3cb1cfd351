// Report Exporter - Power BI report batch export tool
// Copyright (c) 2025 Report Exporter Contributors
// Licensed under the MIT License

//! # Report Exporter
//!
//! Report Exporter is a batch CLI tool that renders one filtered report
//! file per business identifier from the Power BI REST API. For every
//! identifier it triggers an export job, polls the job until the service
//! has rendered it, downloads the file and writes it under the output
//! directory.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Authenticating** with an OAuth2 client credentials grant
//! - **Triggering** identifier-filtered export jobs over REST
//! - **Polling** each job against a strict attempt budget
//! - **Downloading** finished files concurrently, bounded by a
//!   configurable limit
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (polling, file output, batch fan-out)
//! - [`adapters`] - External integrations (report export REST API)
//! - [`auth`] - Token acquisition and caching
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration and input file management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use report_exporter::config::load_config;
//! use report_exporter::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config(None)?;
//!
//!     // Create export coordinator and run the batch
//!     let coordinator = ExportCoordinator::new(config);
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Exported {} of {} reports", summary.succeeded, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Input Files
//!
//! Two plain-text files drive a batch. The credential file holds
//! `name,value` entries for the service principal:
//!
//! ```text
//! client_id,00000000-0000-0000-0000-000000000000
//! client_secret,<secret>
//! tenant_id,11111111-1111-1111-1111-111111111111
//! group_id_dev,22222222-2222-2222-2222-222222222222
//! report_id_pdf_dev,33333333-3333-3333-3333-333333333333
//! ```
//!
//! The identifier file lists one business identifier per line. A
//! trailing `k` marks the identifier as a concern and is stripped:
//!
//! ```rust
//! use report_exporter::domain::BusinessIdentifier;
//!
//! let plain = BusinessIdentifier::parse("1234567").unwrap();
//! assert!(!plain.concern);
//!
//! let marked = BusinessIdentifier::parse("7654321k").unwrap();
//! assert!(marked.concern);
//! assert_eq!(marked.id.as_str(), "7654321");
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return the [`domain::ExporterError`] type.
//! Batch-level failures (configuration, authentication) abort the run;
//! per-identifier failures are collected into the batch summary without
//! disturbing the other identifiers.
//!
//! ```rust,no_run
//! use report_exporter::domain::Result;
//!
//! fn example() -> Result<()> {
//!     // Errors are converted automatically with the ? operator
//!     let config = report_exporter::config::load_config(None)?;
//!     println!("Rendering {} reports", config.export.format);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(identifier = "1234567", "Export still running");
//! ```

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
