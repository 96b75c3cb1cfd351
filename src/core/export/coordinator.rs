//! Export coordinator - main orchestrator for the export process
//!
//! Drives one batch end to end: credential and identifier loading,
//! token acquisition, then a bounded fan-out of per-identifier export
//! tasks. Tasks are isolated; one failed identifier never stops the
//! others, and every outcome lands in the batch summary.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::adapters::powerbi::{ExportRequest, PowerBiClient, ReportLevelFilter};
use crate::auth::TokenProvider;
use crate::config::{
    load_credentials, load_identifiers, ExportConfig, ExporterConfig, PollingConfig,
};
use crate::core::export::poller::poll_until_done;
use crate::core::export::summary::{BatchSummary, ExportOutcome};
use crate::core::export::writer::write_report;
use crate::domain::{BusinessIdentifier, ExporterError, Result};

/// Export coordinator
pub struct ExportCoordinator {
    config: ExporterConfig,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(config: ExporterConfig) -> Self {
        Self { config }
    }

    /// Execute the export batch
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Loads credentials and the identifier list
    /// 2. Acquires one access token for the whole batch
    /// 3. Spawns one export task per identifier, bounded by the
    ///    configured concurrency
    /// 4. Collects every task's outcome into a summary
    ///
    /// A returned error means the batch could not start at all;
    /// per-identifier failures are reported through the summary.
    pub async fn execute_export(&self) -> Result<BatchSummary> {
        let start_time = Instant::now();

        let credentials = load_credentials(&self.config.files.credentials)?;
        let identifiers = load_identifiers(&self.config.files.identifiers)?;

        if identifiers.is_empty() {
            tracing::warn!(
                file = %self.config.files.identifiers,
                "Identifier file is empty, nothing to export"
            );
            return Ok(BatchSummary::new().with_duration(start_time.elapsed()));
        }

        let mut token_provider = TokenProvider::new(&credentials, &self.config.api)?;
        let access_token = token_provider.get_token().await?;

        let client = Arc::new(PowerBiClient::new(
            &self.config.api,
            &self.config.retry,
            credentials.workspace_id.clone(),
            credentials.report_id.clone(),
            access_token,
        )?);

        tracing::info!(
            identifiers = identifiers.len(),
            concurrency = self.config.export.concurrency,
            format = %self.config.export.format,
            "Starting export batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.export.concurrency));
        let output_dir = PathBuf::from(&self.config.files.output_dir);
        let extension = self.config.export.format.to_lowercase();

        let mut summary = BatchSummary::new();
        summary.total = identifiers.len();

        let mut handles = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore closed");

            let client = Arc::clone(&client);
            let export = self.config.export.clone();
            let polling = self.config.polling.clone();
            let output_dir = output_dir.clone();
            let extension = extension.clone();
            let task_identifier = identifier.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                export_one(
                    &client,
                    &export,
                    &polling,
                    &output_dir,
                    &extension,
                    task_identifier,
                )
                .await
            });
            handles.push((identifier, handle));
        }

        let joined = futures::future::join_all(
            handles
                .into_iter()
                .map(|(identifier, handle)| async move { (identifier, handle.await) }),
        )
        .await;

        for (identifier, result) in joined {
            match result {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    let error = ExporterError::ExportFailed {
                        identifier: identifier.id.to_string(),
                        reason: format!("export task did not complete: {e}"),
                    };
                    summary.record(ExportOutcome::Failed { identifier, error });
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }
}

/// Runs one identifier's export and converts the result into an
/// outcome, so the task never propagates an error to its siblings.
async fn export_one(
    client: &PowerBiClient,
    export: &ExportConfig,
    polling: &PollingConfig,
    output_dir: &Path,
    extension: &str,
    identifier: BusinessIdentifier,
) -> ExportOutcome {
    tracing::debug!(
        identifier = %identifier,
        concern = identifier.concern,
        "Export task started"
    );

    match run_export(client, export, polling, output_dir, extension, &identifier).await {
        Ok((path, bytes)) => {
            tracing::info!(
                identifier = %identifier,
                path = %path.display(),
                bytes,
                "Export completed"
            );
            ExportOutcome::Written {
                identifier,
                path,
                bytes,
            }
        }
        Err(error) => {
            tracing::error!(identifier = %identifier, error = %error, "Export failed");
            ExportOutcome::Failed { identifier, error }
        }
    }
}

/// The trigger / poll / download / write pipeline for one identifier.
async fn run_export(
    client: &PowerBiClient,
    export: &ExportConfig,
    polling: &PollingConfig,
    output_dir: &Path,
    extension: &str,
    identifier: &BusinessIdentifier,
) -> Result<(PathBuf, usize)> {
    let filter = ReportLevelFilter::equals(
        &export.filter_table,
        &export.filter_column,
        identifier.id.as_str(),
    );
    let request = ExportRequest::new(export.format.clone(), export.locale.clone(), filter);

    let export_id = client.request_export(&identifier.id, &request).await?;
    let location = poll_until_done(client, &identifier.id, &export_id, polling).await?;
    let bytes = client
        .download(&identifier.id, &export_id, location.as_deref())
        .await?;
    let path = write_report(output_dir, &identifier.id, extension, &bytes).await?;

    Ok((path, bytes.len()))
}
