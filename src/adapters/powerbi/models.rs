//! Wire types for the report export API
//!
//! Serde models for the three calls a task makes: trigger an export,
//! poll the job, fetch the file. Field names follow the service's JSON,
//! including the irregular `powerBIReportConfiguration` key.

use serde::{Deserialize, Serialize};

/// Body of the export trigger request
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    /// Output format, e.g. `PDF`
    pub format: String,

    /// Report-level rendering configuration
    #[serde(rename = "powerBIReportConfiguration")]
    pub power_bi_report_configuration: ReportConfiguration,
}

impl ExportRequest {
    /// Builds the request for one identifier-scoped export.
    pub fn new(format: impl Into<String>, locale: impl Into<String>, filter: ReportLevelFilter) -> Self {
        Self {
            format: format.into(),
            power_bi_report_configuration: ReportConfiguration {
                report_level_filters: vec![filter],
                settings: ExportSettings {
                    locale: locale.into(),
                },
            },
        }
    }
}

/// `powerBIReportConfiguration` payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfiguration {
    /// Filters applied across every page of the report
    pub report_level_filters: Vec<ReportLevelFilter>,

    /// Rendering settings
    pub settings: ExportSettings,
}

/// One report-level filter in the service's filter expression syntax
#[derive(Debug, Clone, Serialize)]
pub struct ReportLevelFilter {
    /// Expression of the form `Table/Column eq 'value'`
    pub filter: String,
}

impl ReportLevelFilter {
    /// Builds an equality filter on one column.
    pub fn equals(table: &str, column: &str, value: &str) -> Self {
        Self {
            filter: format!("{table}/{column} eq '{value}'"),
        }
    }
}

/// Rendering settings
#[derive(Debug, Clone, Serialize)]
pub struct ExportSettings {
    /// Locale the report is rendered in, e.g. `fi-FI`
    pub locale: String,
}

/// Body of the 202 response accepting an export request
#[derive(Debug, Clone, Deserialize)]
pub struct ExportAccepted {
    /// The export job id, valid for roughly a day on the service side
    pub id: String,
}

/// Export job state reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExportState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Any state this client does not know; treated as still-running
    #[serde(other)]
    Unknown,
}

impl ExportState {
    /// Whether the job has finished, one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportState::Succeeded | ExportState::Failed)
    }
}

/// Body of the status endpoint response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJobStatus {
    /// The export job id
    pub id: String,

    /// Current state
    pub status: ExportState,

    /// Progress indication, when the service sends one
    #[serde(default)]
    pub percent_complete: Option<u32>,

    /// Where to fetch the file from once the job succeeded
    #[serde(default)]
    pub resource_location: Option<String>,

    /// Failure detail, present when `status` is `Failed`
    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// Error object the service attaches to failed jobs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceError {
    /// One-line rendering for error reporting.
    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unspecified service error".to_string(),
        }
    }
}
