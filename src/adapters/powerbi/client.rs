//! HTTP client for the report export service
//!
//! One client instance serves a whole batch: it holds the access token,
//! the workspace and report routing, and the retry policy. Only
//! transport-level failures (connect errors, timeouts) are retried;
//! HTTP error statuses are returned to the caller untouched so that a
//! rejected export is reported once, not hammered.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::adapters::powerbi::models::{ExportAccepted, ExportJobStatus, ExportRequest};
use crate::config::{ApiConfig, RetryConfig};
use crate::domain::{BusinessId, ExportId, ExporterError, ReportId, Result, WorkspaceId};

/// Client for triggering, tracking and downloading report exports.
pub struct PowerBiClient {
    http: Client,
    base_url: String,
    workspace_id: WorkspaceId,
    report_id: ReportId,
    access_token: String,
    retry: RetryConfig,
}

impl PowerBiClient {
    /// Creates a client bound to one workspace, report and access token.
    pub fn new(
        api: &ApiConfig,
        retry: &RetryConfig,
        workspace_id: WorkspaceId,
        report_id: ReportId,
        access_token: String,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| {
                ExporterError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            workspace_id,
            report_id,
            access_token,
            retry: retry.clone(),
        })
    }

    /// Submits an export job for one identifier.
    ///
    /// The service answers `202 Accepted` with a job id; any other
    /// status fails the identifier with the upstream response body.
    pub async fn request_export(
        &self,
        identifier: &BusinessId,
        request: &ExportRequest,
    ) -> Result<ExportId> {
        let url = format!(
            "{}/v1.0/myorg/groups/{}/reports/{}/exportTo",
            self.base_url, self.workspace_id, self.report_id
        );
        debug!(identifier = %identifier, url = %url, "requesting export");

        let accepted = self
            .retry_request(|| async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.access_token)
                    .json(request)
                    .send()
                    .await
                    .map_err(classify_transport)?;

                let status = response.status();
                if status != StatusCode::ACCEPTED {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ExporterError::ExportRequest {
                        identifier: identifier.to_string(),
                        message: format!("export request returned HTTP {status}: {body}"),
                    });
                }

                response.json::<ExportAccepted>().await.map_err(|e| {
                    ExporterError::InvalidResponse(format!(
                        "malformed export accept response: {e}"
                    ))
                })
            })
            .await?;

        info!(identifier = %identifier, export_id = %accepted.id, "export job accepted");
        ExportId::new(accepted.id).map_err(ExporterError::InvalidResponse)
    }

    /// Fetches the current state of an export job.
    pub async fn export_status(
        &self,
        identifier: &BusinessId,
        export_id: &ExportId,
    ) -> Result<ExportJobStatus> {
        let url = self.export_url(export_id);

        let status = self
            .retry_request(|| async {
                let response = self
                    .http
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .send()
                    .await
                    .map_err(classify_transport)?;

                let http_status = response.status();
                if !http_status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ExporterError::ExportFailed {
                        identifier: identifier.to_string(),
                        reason: format!("status check returned HTTP {http_status}: {body}"),
                    });
                }

                response.json::<ExportJobStatus>().await.map_err(|e| {
                    ExporterError::InvalidResponse(format!("malformed status response: {e}"))
                })
            })
            .await?;

        debug!(
            identifier = %identifier,
            export_id = %export_id,
            status = ?status.status,
            percent = status.percent_complete,
            "export status"
        );
        Ok(status)
    }

    /// Downloads the finished file.
    ///
    /// Uses the `resourceLocation` the status endpoint reported when
    /// present, otherwise falls back to the `/file` route of the job.
    pub async fn download(
        &self,
        identifier: &BusinessId,
        export_id: &ExportId,
        resource_location: Option<&str>,
    ) -> Result<Vec<u8>> {
        let url = match resource_location {
            Some(location) => location.to_string(),
            None => format!("{}/file", self.export_url(export_id)),
        };
        debug!(identifier = %identifier, url = %url, "downloading export file");

        let bytes = self
            .retry_request(|| async {
                let response = self
                    .http
                    .get(&url)
                    .bearer_auth(&self.access_token)
                    .send()
                    .await
                    .map_err(classify_transport)?;

                let http_status = response.status();
                if !http_status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ExporterError::ExportFailed {
                        identifier: identifier.to_string(),
                        reason: format!("download returned HTTP {http_status}: {body}"),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| ExporterError::Connection(format!("download interrupted: {e}")))
            })
            .await?;

        info!(identifier = %identifier, bytes = bytes.len(), "export file downloaded");
        Ok(bytes.to_vec())
    }

    fn export_url(&self, export_id: &ExportId) -> String {
        format!(
            "{}/v1.0/myorg/groups/{}/reports/{}/exports/{}",
            self.base_url, self.workspace_id, self.report_id, export_id
        )
    }

    /// Runs `operation`, retrying transient failures with exponential
    /// backoff up to the configured retry budget.
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: usize = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry_delay(attempt);
                    warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn retry_delay(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as f64;
        let scaled =
            self.retry.initial_delay_ms as f64 * self.retry.backoff_multiplier.powf(exponent);
        Duration::from_millis((scaled as u64).min(self.retry.max_delay_ms))
    }
}

/// Maps a send-level error to the retryable `Connection` kind when it
/// is a timeout or connect failure, anything else stays terminal.
fn classify_transport(error: reqwest::Error) -> ExporterError {
    if error.is_timeout() || error.is_connect() {
        ExporterError::Connection(error.to_string())
    } else {
        ExporterError::InvalidResponse(format!("request failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::powerbi::models::{ExportState, ReportLevelFilter};
    use mockito::Matcher;
    use serde_json::json;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        }
    }

    fn client(base_url: &str) -> PowerBiClient {
        PowerBiClient::new(
            &api_config(base_url),
            &fast_retry(),
            WorkspaceId::new("group-1").unwrap(),
            ReportId::new("report-1").unwrap(),
            "test-token".to_string(),
        )
        .unwrap()
    }

    fn identifier() -> BusinessId {
        BusinessId::new("1234567").unwrap()
    }

    #[tokio::test]
    async fn test_request_export_accepted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/myorg/groups/group-1/reports/report-1/exportTo")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({
                "format": "PDF",
                "powerBIReportConfiguration": {
                    "reportLevelFilters": [
                        {"filter": "CompanyBasicInfo/business_id_k eq '1234567'"}
                    ],
                    "settings": {"locale": "fi-FI"}
                }
            })))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "export-123"}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let request = ExportRequest::new(
            "PDF",
            "fi-FI",
            ReportLevelFilter::equals("CompanyBasicInfo", "business_id_k", "1234567"),
        );

        let export_id = client
            .request_export(&identifier(), &request)
            .await
            .unwrap();

        assert_eq!(export_id.as_str(), "export-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_export_rejected_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/myorg/groups/group-1/reports/report-1/exportTo")
            .with_status(400)
            .with_body(r#"{"error": {"code": "InvalidRequest"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client(&server.url());
        let request = ExportRequest::new(
            "PDF",
            "fi-FI",
            ReportLevelFilter::equals("CompanyBasicInfo", "business_id_k", "1234567"),
        );

        let error = client
            .request_export(&identifier(), &request)
            .await
            .unwrap_err();

        match error {
            ExporterError::ExportRequest {
                identifier,
                message,
            } => {
                assert_eq!(identifier, "1234567");
                assert!(message.contains("400"));
                assert!(message.contains("InvalidRequest"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_export_status_running() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/v1.0/myorg/groups/group-1/reports/report-1/exports/export-123",
            )
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "export-123", "status": "Running", "percentComplete": 35}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let status = client
            .export_status(&identifier(), &ExportId::new("export-123").unwrap())
            .await
            .unwrap();

        assert_eq!(status.status, ExportState::Running);
        assert_eq!(status.percent_complete, Some(35));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_export_status_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/v1.0/myorg/groups/group-1/reports/report-1/exports/export-123",
            )
            .with_status(500)
            .with_body("backend down")
            .create_async()
            .await;

        let client = client(&server.url());
        let error = client
            .export_status(&identifier(), &ExportId::new("export-123").unwrap())
            .await
            .unwrap_err();

        match error {
            ExporterError::ExportFailed { identifier, reason } => {
                assert_eq!(identifier, "1234567");
                assert!(reason.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_via_file_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/v1.0/myorg/groups/group-1/reports/report-1/exports/export-123/file",
            )
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.7 fake".as_slice())
            .create_async()
            .await;

        let client = client(&server.url());
        let bytes = client
            .download(&identifier(), &ExportId::new("export-123").unwrap(), None)
            .await
            .unwrap();

        assert_eq!(bytes, b"%PDF-1.7 fake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_prefers_resource_location() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/custom/location")
            .with_status(200)
            .with_body(b"%PDF-1.7 located".as_slice())
            .create_async()
            .await;

        let client = client(&server.url());
        let location = format!("{}/custom/location", server.url());
        let bytes = client
            .download(
                &identifier(),
                &ExportId::new("export-123").unwrap(),
                Some(&location),
            )
            .await
            .unwrap();

        assert_eq!(bytes, b"%PDF-1.7 located");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_failure_surfaces_as_connection() {
        // Nothing listens on port 1, so every attempt fails at connect.
        let client = client("http://127.0.0.1:1");
        let error = client
            .export_status(&identifier(), &ExportId::new("export-123").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(error, ExporterError::Connection(_)));
    }

    #[test]
    fn test_retry_delay_backoff_and_cap() {
        let client = PowerBiClient::new(
            &api_config("http://localhost"),
            &RetryConfig {
                max_retries: 5,
                initial_delay_ms: 500,
                max_delay_ms: 5000,
                backoff_multiplier: 2.0,
            },
            WorkspaceId::new("group-1").unwrap(),
            ReportId::new("report-1").unwrap(),
            "token".to_string(),
        )
        .unwrap();

        assert_eq!(client.retry_delay(1), Duration::from_millis(500));
        assert_eq!(client.retry_delay(2), Duration::from_millis(1000));
        assert_eq!(client.retry_delay(3), Duration::from_millis(2000));
        assert_eq!(client.retry_delay(4), Duration::from_millis(4000));
        // 8000ms uncapped, clamped to the configured ceiling.
        assert_eq!(client.retry_delay(5), Duration::from_millis(5000));
    }
}
