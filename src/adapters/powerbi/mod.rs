//! Report export API adapter
//!
//! Client and wire models for the export REST API: submitting an
//! export job, polling its status and downloading the produced file.

pub mod client;
pub mod models;

pub use client::PowerBiClient;
pub use models::{
    ExportAccepted, ExportJobStatus, ExportRequest, ExportState, ReportLevelFilter, ServiceError,
};
