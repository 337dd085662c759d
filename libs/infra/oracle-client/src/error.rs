// [libs/infra/oracle-client/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DEL CLIENTE DEL ORÁCULO (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE RED Y DE RESPUESTA DEL
//! ORÁCULO LLM
//! =================================================================
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("oracle responded with unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
