//! Export job polling
//!
//! Watches one export job until the service reports a terminal state.
//! The attempt budget is strict: exactly `max_attempts` status calls
//! are made before the job is declared timed out, with one interval
//! slept between consecutive calls and none before the first.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::adapters::powerbi::{ExportState, PowerBiClient};
use crate::config::PollingConfig;
use crate::domain::{BusinessId, ExportId, ExporterError, Result};

/// Polls an export job until it succeeds, fails or exhausts the budget.
///
/// On success returns the `resourceLocation` the service reported, if
/// any; the caller falls back to the job's `/file` route otherwise.
pub async fn poll_until_done(
    client: &PowerBiClient,
    identifier: &BusinessId,
    export_id: &ExportId,
    polling: &PollingConfig,
) -> Result<Option<String>> {
    let interval = Duration::from_millis(polling.interval_ms);
    let started = Instant::now();

    for attempt in 1..=polling.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(interval).await;
        }

        let status = client.export_status(identifier, export_id).await?;

        match status.status {
            ExportState::Succeeded => {
                info!(
                    identifier = %identifier,
                    export_id = %export_id,
                    attempts = attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "export ready"
                );
                return Ok(status.resource_location);
            }
            ExportState::Failed => {
                let reason = status
                    .error
                    .map(|e| e.describe())
                    .unwrap_or_else(|| "service reported failure without detail".to_string());
                return Err(ExporterError::ExportFailed {
                    identifier: identifier.to_string(),
                    reason,
                });
            }
            state => {
                debug!(
                    identifier = %identifier,
                    attempt,
                    max_attempts = polling.max_attempts,
                    status = ?state,
                    percent = status.percent_complete,
                    "export still running"
                );
            }
        }
    }

    Err(ExporterError::ExportTimeout {
        identifier: identifier.to_string(),
        attempts: polling.max_attempts,
    })
}
