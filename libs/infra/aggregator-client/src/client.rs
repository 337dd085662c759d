// [libs/infra/aggregator-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: CLIENTE DEL AGREGADOR DE MODELOS (V1.0 - CHUNKED STREAM)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: CONSULTA DE VERSIÓN Y DESCARGA EN STREAM DE DIFFS
 * BINARIOS DESDE EL AGREGADOR REMOTO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * Consulta la versión publicada actual y transmite diffs binarios a
 * un archivo temporal local en trozos acotados, de modo que un diff
 * lento o enorme nunca dispara el consumo de memoria del proceso. Una
 * lectura fallida a mitad de stream se reintenta dentro de un
 * presupuesto configurable antes de propagar el error al llamador.
 * =================================================================
 */

use crate::error::ClientError;
use crate::types::ModelVersionInfo;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

/// Default flush-to-disk chunk size, overridable via `with_chunk_size`
/// (`NodeConfig::chunk_size`, §6).
const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Default chunked-download retry budget, overridable via
/// `with_max_retries` (`NodeConfig::max_retries`, §6).
const DEFAULT_MAX_RETRIES: u32 = 3;

pub struct AggregatorClient {
    http: Client,
    base_url: String,
    chunk_size: usize,
    max_retries: u32,
}

impl AggregatorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is static and always valid");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// `GET {base}/model-version`.
    #[instrument(skip(self))]
    pub async fn model_version(&self) -> Result<ModelVersionInfo, ClientError> {
        let url = format!("{}/model-version", self.base_url);
        let response = self.http.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `GET {base}/model-diff/{from_v}/{to_v}`, streamed to a file
    /// named `model_<from_v>_to_<to_v>.diff` under `dest_dir`.
    #[instrument(skip(self))]
    pub async fn download_diff(
        &self,
        from_v: u64,
        to_v: u64,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let url = format!("{}/model-diff/{}/{}", self.base_url, from_v, to_v);
        let response = self.http.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        let declared_checksum = response
            .headers()
            .get("checksum")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let is_gzip = response
            .headers()
            .get("content-encoding")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.eq_ignore_ascii_case("gzip"))
            .unwrap_or(false);

        tokio::fs::create_dir_all(dest_dir).await?;
        let raw_path = dest_dir.join(format!("model_{from_v}_to_{to_v}.diff.raw"));
        let mut file = File::create(&raw_path).await?;

        let mut hasher = Sha256::new();
        let mut buffer: Vec<u8> = Vec::with_capacity(self.chunk_size * 2);
        let mut stream = response.bytes_stream();
        let mut retries_remaining = self.max_retries;

        loop {
            match stream.next().await {
                None => break,
                Some(Ok(chunk)) => {
                    buffer.extend_from_slice(&chunk);
                    while buffer.len() >= self.chunk_size {
                        let piece: Vec<u8> = buffer.drain(0..self.chunk_size).collect();
                        hasher.update(&piece);
                        file.write_all(&piece).await?;
                    }
                }
                Some(Err(err)) => {
                    if retries_remaining == 0 {
                        return Err(ClientError::Network(err));
                    }
                    retries_remaining -= 1;
                    warn!(
                        error = %err,
                        retries_remaining,
                        "chunk read failed, retrying before exhausting the retry budget"
                    );
                }
            }
        }
        if !buffer.is_empty() {
            hasher.update(&buffer);
            file.write_all(&buffer).await?;
        }
        file.flush().await?;
        drop(file);

        if let Some(expected) = declared_checksum {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(&expected) {
                let _ = tokio::fs::remove_file(&raw_path).await;
                return Err(ClientError::ChecksumMismatch { expected, actual });
            }
            debug!("diff checksum verified");
        }

        let final_path = dest_dir.join(format!("model_{from_v}_to_{to_v}.diff"));
        if is_gzip {
            decode_gzip(&raw_path, &final_path)?;
            tokio::fs::remove_file(&raw_path).await?;
        } else {
            tokio::fs::rename(&raw_path, &final_path).await?;
        }

        Ok(final_path)
    }
}

fn decode_gzip(raw_path: &Path, final_path: &Path) -> Result<(), ClientError> {
    let raw_file = std::fs::File::open(raw_path)?;
    let mut decoder = flate2::read::GzDecoder::new(raw_file);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).map_err(|e| {
        warn!(error = %e, "failed to inflate gzip diff body");
        ClientError::Io(e)
    })?;
    std::fs::write(final_path, decoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_node_config_defaults() {
        let client = AggregatorClient::new("http://aggregator.local", Duration::from_secs(5));
        assert_eq!(client.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn builders_override_chunk_size_and_retry_budget() {
        let client = AggregatorClient::new("http://aggregator.local", Duration::from_secs(5))
            .with_chunk_size(4096)
            .with_max_retries(5);
        assert_eq!(client.chunk_size, 4096);
        assert_eq!(client.max_retries, 5);
    }
}
