//! Integration tests for the full export flow
//!
//! Each test drives the coordinator against a mock HTTP server that
//! plays the token endpoint and the report export API, and a temp
//! directory that receives the report files.

use mockito::{Matcher, Server};
use report_exporter::config::ExporterConfig;
use report_exporter::core::export::{ExportCoordinator, ExportOutcome};
use report_exporter::domain::ExporterError;
use tempfile::TempDir;

const TOKEN_PATH: &str = "/tid/oauth2/v2.0/token";
const EXPORT_TO_PATH: &str = "/v1.0/myorg/groups/gid/reports/rid/exportTo";

fn exports_path(export_id: &str) -> String {
    format!("/v1.0/myorg/groups/gid/reports/rid/exports/{export_id}")
}

fn file_path(export_id: &str) -> String {
    format!("{}/file", exports_path(export_id))
}

fn accepted_body(export_id: &str) -> String {
    format!(r#"{{"id": "{export_id}"}}"#)
}

fn succeeded_body(export_id: &str) -> String {
    format!(r#"{{"id": "{export_id}", "status": "Succeeded", "percentComplete": 100}}"#)
}

/// Config wired to the mock server, with input files in the temp dir.
fn test_config(server_url: &str, dir: &TempDir, identifiers: &str) -> ExporterConfig {
    let credentials_path = dir.path().join("ids.txt");
    std::fs::write(
        &credentials_path,
        "client_id,cid\nclient_secret,secret\ntenant_id,tid\ngroup_id_dev,gid\nreport_id_pdf_dev,rid\n",
    )
    .unwrap();

    let identifiers_path = dir.path().join("business_ids.csv");
    std::fs::write(&identifiers_path, identifiers).unwrap();

    let mut config = ExporterConfig::default();
    config.files.credentials = credentials_path.to_string_lossy().into_owned();
    config.files.identifiers = identifiers_path.to_string_lossy().into_owned();
    config.files.output_dir = dir.path().join("out").to_string_lossy().into_owned();
    config.api.base_url = server_url.to_string();
    config.api.authority_url = server_url.to_string();
    config.export.concurrency = 4;
    config.polling.interval_ms = 1;
    config.polling.max_attempts = 10;
    config.retry.max_retries = 0;
    config
}

#[tokio::test]
async fn test_full_batch_exports_every_identifier() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    // One token request serves the whole batch.
    let token_mock = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "batch-token", "expires_in": 3600}"#)
        .expect(1)
        .create_async()
        .await;

    for (identifier, content) in [("1111111", "%PDF-1.7 one"), ("2222222", "%PDF-1.7 two")] {
        let export_id = format!("exp-{identifier}");
        server
            .mock("POST", EXPORT_TO_PATH)
            .match_header("authorization", "Bearer batch-token")
            .match_body(Matcher::Regex(identifier.to_string()))
            .with_status(202)
            .with_body(accepted_body(&export_id))
            .create_async()
            .await;
        server
            .mock("GET", exports_path(&export_id).as_str())
            .with_status(200)
            .with_body(succeeded_body(&export_id))
            .create_async()
            .await;
        server
            .mock("GET", file_path(&export_id).as_str())
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(content)
            .create_async()
            .await;
    }

    // The second identifier carries the concern marker; the exported
    // file must use the stripped form.
    let config = test_config(&server.url(), &dir, "1111111\n2222222k\n");
    let output_dir = dir.path().join("out");

    let summary = ExportCoordinator::new(config)
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert!(summary.is_successful());

    assert_eq!(
        std::fs::read(output_dir.join("1111111.pdf")).unwrap(),
        b"%PDF-1.7 one"
    );
    assert_eq!(
        std::fs::read(output_dir.join("2222222.pdf")).unwrap(),
        b"%PDF-1.7 two"
    );

    token_mock.assert_async().await;
}

#[tokio::test]
async fn test_one_rejected_identifier_does_not_stop_the_batch() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"access_token": "batch-token", "expires_in": 3600}"#)
        .create_async()
        .await;

    for identifier in ["1111111", "2222222"] {
        let export_id = format!("exp-{identifier}");
        server
            .mock("POST", EXPORT_TO_PATH)
            .match_body(Matcher::Regex(identifier.to_string()))
            .with_status(202)
            .with_body(accepted_body(&export_id))
            .create_async()
            .await;
        server
            .mock("GET", exports_path(&export_id).as_str())
            .with_status(200)
            .with_body(succeeded_body(&export_id))
            .create_async()
            .await;
        server
            .mock("GET", file_path(&export_id).as_str())
            .with_status(200)
            .with_body("%PDF-1.7 ok")
            .create_async()
            .await;
    }

    // The middle identifier is rejected outright by the service.
    server
        .mock("POST", EXPORT_TO_PATH)
        .match_body(Matcher::Regex("8888888".to_string()))
        .with_status(400)
        .with_body(r#"{"error": {"code": "InvalidRequest"}}"#)
        .create_async()
        .await;

    let config = test_config(&server.url(), &dir, "1111111\n8888888\n2222222\n");
    let output_dir = dir.path().join("out");

    let summary = ExportCoordinator::new(config)
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_successful());

    let failure = summary.failures().next().expect("one failure");
    match failure {
        ExportOutcome::Failed { identifier, error } => {
            assert_eq!(identifier.id.as_str(), "8888888");
            assert!(matches!(error, ExporterError::ExportRequest { .. }));
            assert!(error.to_string().contains("InvalidRequest"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // The healthy identifiers still produced their files.
    assert!(output_dir.join("1111111.pdf").exists());
    assert!(output_dir.join("2222222.pdf").exists());
    assert!(!output_dir.join("8888888.pdf").exists());
}

#[tokio::test]
async fn test_job_that_never_finishes_times_out_with_attempt_count() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();

    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"access_token": "batch-token", "expires_in": 3600}"#)
        .create_async()
        .await;

    server
        .mock("POST", EXPORT_TO_PATH)
        .with_status(202)
        .with_body(accepted_body("exp-stuck"))
        .create_async()
        .await;

    let status_mock = server
        .mock("GET", exports_path("exp-stuck").as_str())
        .with_status(200)
        .with_body(r#"{"id": "exp-stuck", "status": "Running", "percentComplete": 10}"#)
        .expect(3)
        .create_async()
        .await;

    let mut config = test_config(&server.url(), &dir, "1111111\n");
    config.polling.max_attempts = 3;

    let summary = ExportCoordinator::new(config)
        .execute_export()
        .await
        .unwrap();

    assert_eq!(summary.failed, 1);
    let failure = summary.failures().next().expect("one failure");
    match failure {
        ExportOutcome::Failed { identifier, error } => {
            assert_eq!(identifier.id.as_str(), "1111111");
            match error {
                ExporterError::ExportTimeout { attempts, .. } => assert_eq!(*attempts, 3),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Exactly the budgeted number of status checks went out.
    status_mock.assert_async().await;
}
