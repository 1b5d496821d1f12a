//! HTTP client behaviour against a stub parsing service.

mod common;

use common::{closed_port_url, Received, StubServer, UploadedPart};
use parse_uploader::api::{OperationId, ParseApiClient, ParseBackend, ParsedField};
use parse_uploader::config::Config;
use parse_uploader::error::ApiError;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

const PARSED: &str = r#"{
    "message": "Arquivo processado com sucesso!",
    "operation_id": 12,
    "parsed_data": [
        {"field_name": "invoice_no", "parsed_value": "123", "confidence_score": 0.9},
        {"field_name": "total", "parsed_value": "45.00", "confidence_score": 0.9}
    ]
}"#;

fn write_document(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("invoice.pdf");
    std::fs::write(&path, b"%PDF-1.4 fake invoice body").unwrap();
    path
}

#[tokio::test]
async fn upload_sends_multipart_file_and_decodes_fields() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond(201, PARSED).await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let response = client.upload_and_parse(&document).await.unwrap();

    assert_eq!(response.operation_id, Some(OperationId::new("12")));
    assert_eq!(response.parsed_data.len(), 2);
    assert_eq!(response.parsed_data[1].field_name, "total");
    assert_eq!(response.parsed_data[1].parsed_value, "45.00");

    assert_eq!(
        server.received(),
        vec![Received::Upload(vec![UploadedPart {
            name: "file".to_string(),
            file_name: Some("invoice.pdf".to_string()),
            content: b"%PDF-1.4 fake invoice body".to_vec(),
        }])]
    );
}

#[tokio::test]
async fn structured_detail_becomes_service_error() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond(
        500,
        r#"{"detail": "Erro ao processar arquivo: PDF corrompido"}"#,
    )
    .await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();

    match err {
        ApiError::Service { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Erro ao processar arquivo: PDF corrompido");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn validation_errors_join_messages() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond(
        422,
        r#"{"detail": [{"loc": ["body", "file"], "msg": "Field required", "type": "missing"}]}"#,
    )
    .await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();
    assert_eq!(err.detail(), "Field required");
}

#[tokio::test]
async fn error_without_detail_reports_status() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond(502, "<html>bad gateway</html>").await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(502)));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond(201, r#"{"parsed": []}"#).await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let config = Config {
        base_url: closed_port_url().await,
        timeout_seconds: 5,
    };
    let client = ParseApiClient::new(&config).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.detail().is_empty());
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let dir = tempdir().unwrap();
    let config = Config {
        base_url: closed_port_url().await,
        timeout_seconds: 5,
    };
    let client = ParseApiClient::new(&config).unwrap();

    let err = client
        .upload_and_parse(&dir.path().join("missing.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Io { .. }));
}

#[tokio::test]
async fn slow_service_hits_the_timeout() {
    let dir = tempdir().unwrap();
    let document = write_document(dir.path());
    let server = StubServer::respond_after(201, PARSED, Duration::from_secs(3)).await;
    let client = ParseApiClient::new(&server.config(1)).unwrap();

    let err = client.upload_and_parse(&document).await.unwrap_err();
    match err {
        ApiError::Transport(message) => assert_eq!(message, "Request timed out after 1s"),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn staging_fetch_uses_operation_path() {
    let server = StubServer::respond(
        200,
        r#"{"parsed_data": [{"field_name": "invoice_no", "parsed_value": "123"}]}"#,
    )
    .await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let response = client
        .get_staging_data(&OperationId::new("42"))
        .await
        .unwrap();
    assert_eq!(
        response.parsed_data,
        vec![ParsedField::new("invoice_no", "123")]
    );

    assert_eq!(server.received(), vec![Received::Staging("42".to_string())]);
}

#[tokio::test]
async fn staging_not_found_is_a_service_error() {
    let server = StubServer::respond(404, r#"{"detail": "Not Found"}"#).await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let err = client
        .get_staging_data(&OperationId::new("999"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Service { status: 404, .. }));
}

#[tokio::test]
async fn staging_id_travels_as_one_segment() {
    let server = StubServer::respond(200, r#"{"parsed_data": []}"#).await;
    let client = ParseApiClient::new(&server.config(5)).unwrap();

    let response = client
        .get_staging_data(&OperationId::new("op/2024 07"))
        .await
        .unwrap();

    assert!(response.parsed_data.is_empty());
    assert_eq!(
        server.received(),
        vec![Received::Staging("op/2024 07".to_string())]
    );
}
