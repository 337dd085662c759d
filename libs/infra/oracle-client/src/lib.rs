// [libs/infra/oracle-client/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL CLIENTE DEL ORÁCULO (V1.0)
//! RESPONSABILIDAD: CLIENTE HTTP PARA EL ORÁCULO LLM OPCIONAL
//! CONSULTADO POR EL DETECTOR DE AMENAZAS
//! =================================================================

pub mod client;
pub mod error;
pub mod types;

pub use client::OracleClient;
pub use error::OracleError;
pub use types::{OracleRequest, OracleResponse};
