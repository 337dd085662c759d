// [libs/core/integrity-store/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DEL ALMACÉN DE INTEGRIDAD (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE E/S Y (DE)SERIALIZACIÓN
//! =================================================================
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("backup/model I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("version history (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backup filename does not match `model_v<version>_<unix_seconds>.bak`: {0}")]
    MalformedBackupName(String),

    #[error("no backup found for version {0}")]
    BackupNotFound(u64),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("content failed validation: missing magic prefix or too short")]
    InvalidContent,
}
