// [libs/infra/aggregator-client/tests/download_diff.rs]
use atous_infra_aggregator_client::{AggregatorClient, ClientError};
use sha2::{Digest, Sha256};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn model_version_parses_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model-version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 7,
            "size": 1024,
            "checksum": "abc123"
        })))
        .mount(&server)
        .await;

    let client = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let info = client.model_version().await.unwrap();

    assert_eq!(info.version, 7);
    assert_eq!(info.size, 1024);
    assert_eq!(info.checksum.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn download_diff_streams_body_to_file() {
    let server = MockServer::start().await;
    let body = vec![0xAB; 20_000];
    Mock::given(method("GET"))
        .and(path("/model-diff/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let client = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let dest = tempfile::tempdir().unwrap();
    let path = client.download_diff(1, 2, dest.path()).await.unwrap();

    let downloaded = std::fs::read(&path).unwrap();
    assert_eq!(downloaded, body);
}

#[tokio::test]
async fn download_diff_rejects_checksum_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model-diff/1/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"payload".to_vec())
                .insert_header("checksum", "0000000000000000000000000000000000000000000000000000000000000000"),
        )
        .mount(&server)
        .await;

    let client = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let dest = tempfile::tempdir().unwrap();
    let err = client.download_diff(1, 2, dest.path()).await.unwrap_err();

    assert!(matches!(err, ClientError::ChecksumMismatch { .. }));
}

#[tokio::test]
async fn download_diff_accepts_matching_checksum() {
    let server = MockServer::start().await;
    let body = b"payload-bytes".to_vec();
    let mut hasher = Sha256::new();
    hasher.update(&body);
    let checksum = hex::encode(hasher.finalize());

    Mock::given(method("GET"))
        .and(path("/model-diff/1/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.clone())
                .insert_header("checksum", checksum.as_str()),
        )
        .mount(&server)
        .await;

    let client = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let dest = tempfile::tempdir().unwrap();
    let path = client.download_diff(1, 2, dest.path()).await.unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), body);
}
