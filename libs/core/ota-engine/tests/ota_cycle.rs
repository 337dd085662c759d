// [libs/core/ota-engine/tests/ota_cycle.rs]
use atous_core_ota::OtaEngine;
use atous_domain_models::NodeConfig;
use atous_infra_aggregator_client::AggregatorClient;
use qbsdiff::Bsdiff;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_patch(source: &[u8], target: &[u8]) -> Vec<u8> {
    let mut patch = Vec::new();
    Bsdiff::new(source, target)
        .compare(&mut patch)
        .expect("bsdiff compare over in-memory buffers cannot fail");
    patch
}

#[tokio::test]
async fn check_for_updates_applies_available_diff() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");
    let backup_dir = dir.path().join("backups");

    let old_model = b"MODLv1-source-bytes-for-testing".to_vec();
    let new_model = b"MODLv2-target-bytes-for-testing".to_vec();
    std::fs::write(&model_path, &old_model).unwrap();

    let patch = make_patch(&old_model, &new_model);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model-version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 2,
            "size": new_model.len(),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/model-diff/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(patch))
        .mount(&server)
        .await;

    let config = NodeConfig {
        node_id: "node-a".to_string(),
        current_version: 1,
        model_path: model_path.to_string_lossy().to_string(),
        backup_dir: backup_dir.to_string_lossy().to_string(),
        ..Default::default()
    };

    let aggregator = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let engine = OtaEngine::new(&config, aggregator).unwrap();

    let applied = engine.check_for_updates().await;
    assert!(applied);
    assert_eq!(engine.current_version().await, 2);
    assert_eq!(std::fs::read(&model_path).unwrap(), new_model);
}

#[tokio::test]
async fn check_for_updates_returns_false_when_already_current() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");
    std::fs::write(&model_path, b"MODLcurrent").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/model-version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": 1,
            "size": 16,
        })))
        .mount(&server)
        .await;

    let config = NodeConfig {
        node_id: "node-a".to_string(),
        current_version: 1,
        model_path: model_path.to_string_lossy().to_string(),
        backup_dir: dir.path().join("backups").to_string_lossy().to_string(),
        ..Default::default()
    };

    let aggregator = AggregatorClient::new(server.uri(), Duration::from_secs(5));
    let engine = OtaEngine::new(&config, aggregator).unwrap();

    assert!(!engine.check_for_updates().await);
    assert_eq!(engine.current_version().await, 1);
}
