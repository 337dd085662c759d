// [libs/infra/aggregator-client/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DEL CLIENTE DEL AGREGADOR (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE RED Y DE VERIFICACIÓN
//! DE CHECKSUM DURANTE LA DESCARGA DE DIFFS
//! =================================================================
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to aggregator failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("aggregator returned unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("failed to decode aggregator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("local I/O failed while staging a downloaded diff: {0}")]
    Io(#[from] std::io::Error),

    #[error("diff body checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("declared checksum header was not valid hex: {0}")]
    MalformedChecksumHeader(String),
}
