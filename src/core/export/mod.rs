//! Export orchestration
//!
//! The core export logic: per-identifier pipelines, job polling,
//! file output and the coordinator that fans a batch out over them.

pub mod coordinator;
pub mod poller;
pub mod summary;
pub mod writer;

pub use coordinator::ExportCoordinator;
pub use poller::poll_until_done;
pub use summary::{BatchSummary, ExportOutcome};
pub use writer::write_report;
