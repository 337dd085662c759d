// [libs/infra/oracle-client/src/types.rs]
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct OracleRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub context: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OracleResponse {
    pub analysis: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub model_updates: Value,
}
