// [libs/infra/oracle-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: CLIENTE DEL ORÁCULO LLM (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CONSULTA HTTP AL ORÁCULO OPCIONAL CONSULTADO POR
 * EL DETECTOR DE AMENAZAS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * El oráculo es un colaborador fuera del núcleo del nodo: cualquier
 * error aquí debe tratarse como "oráculo no disponible" por el
 * llamador, que entonces recurre a la puntuación basada solo en
 * patrones en vez de propagar la falla hacia arriba.
 * =================================================================
 */
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::OracleError;
use crate::types::{OracleRequest, OracleResponse};

const DEFAULT_MAX_TOKENS: u32 = 512;
const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Thin client for the LLM oracle consulted by the threat-detection
/// engine. The oracle is an out-of-scope collaborator: callers are
/// expected to treat any error here as "no oracle available" and fall
/// back to pattern-only scoring rather than propagate it up.
pub struct OracleClient {
    http: Client,
    endpoint: String,
}

impl OracleClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build oracle HTTP client");
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    #[instrument(skip(self, context), fields(endpoint = %self.endpoint))]
    pub async fn consult(&self, prompt: String, context: Value) -> Result<OracleResponse, OracleError> {
        let body = OracleRequest {
            prompt,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            context,
        };

        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "oracle responded with non-success status");
            return Err(OracleError::UnexpectedStatus(response.status()));
        }

        let parsed = response.json::<OracleResponse>().await?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn consult_parses_successful_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oracle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "analysis": "THREAT_SCORE: 0.82\nTHREAT_TYPE: ddos_attack",
                "recommendations": ["block_ip"],
                "confidence": 0.82,
                "model_updates": {}
            })))
            .mount(&server)
            .await;

        let client = OracleClient::new(format!("{}/oracle", server.uri()), Duration::from_secs(5));
        let response = client
            .consult("summarize telemetry".to_string(), serde_json::json!({}))
            .await
            .expect("oracle call should succeed");

        assert!(response.analysis.contains("THREAT_SCORE: 0.82"));
        assert_eq!(response.recommendations, vec!["block_ip".to_string()]);
    }

    #[tokio::test]
    async fn consult_surfaces_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oracle"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = OracleClient::new(format!("{}/oracle", server.uri()), Duration::from_secs(5));
        let err = client
            .consult("prompt".to_string(), serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, OracleError::UnexpectedStatus(_)));
    }
}
