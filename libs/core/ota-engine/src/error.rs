// [libs/core/ota-engine/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DEL MOTOR OTA (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE RED, INTEGRIDAD, PARCHEO
//! Y RECURSOS DURANTE EL CICLO DE ACTUALIZACIÓN
//! =================================================================
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OtaError {
    #[error("aggregator request failed: {0}")]
    Network(#[from] atous_infra_aggregator_client::ClientError),

    #[error("backup/history store failed: {0}")]
    Integrity(#[from] atous_core_integrity::IntegrityError),

    #[error("patch application failed: {0}")]
    Patch(String),

    #[error("insufficient resources for a {declared_size}-byte update: {reason}")]
    Resource { declared_size: u64, reason: String },

    #[error("state machine violation: {0}")]
    State(String),

    #[error("local I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
