// [libs/infra/aggregator-client/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL CLIENTE DEL AGREGADOR (V1.0)
//! RESPONSABILIDAD: ADAPTADOR HTTP AL AGREGADOR DE MODELOS CONSUMIDO
//! POR EL MOTOR OTA
//! =================================================================

pub mod client;
pub mod error;
pub mod types;

pub use client::AggregatorClient;
pub use error::ClientError;
pub use types::ModelVersionInfo;
