// [libs/infra/aggregator-client/src/types.rs]
use serde::{Deserialize, Serialize};

/// Body of `GET {base}/model-version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersionInfo {
    pub version: u64,
    pub size: u64,
    #[serde(default)]
    pub checksum: Option<String>,
}
