//! Core business logic.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration: polling, file output, batch fan-out
//!
//! # Export Workflow
//!
//! The typical export workflow:
//!
//! 1. **Load Inputs**: Read credentials and the identifier list
//! 2. **Authenticate**: Obtain one access token for the batch
//! 3. **Fan Out**: Spawn one bounded task per identifier
//! 4. **Per Task**: Trigger the export, poll until done, download, write
//! 5. **Report**: Collect every outcome into a batch summary
//!
//! # Example
//!
//! ```rust,no_run
//! use report_exporter::config::load_config;
//! use report_exporter::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration
//! let config = load_config(None)?;
//!
//! // Create export coordinator and run the batch
//! let coordinator = ExportCoordinator::new(config);
//! let summary = coordinator.execute_export().await?;
//!
//! println!("Total: {}", summary.total);
//! println!("Succeeded: {}", summary.succeeded);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod export;
