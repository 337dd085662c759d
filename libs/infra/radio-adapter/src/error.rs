// [libs/infra/radio-adapter/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DEL ADAPTADOR DE RADIO (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE PUERTO SERIAL
//! =================================================================
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadioError {
    #[error("serial port I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial port unavailable: {0}")]
    PortUnavailable(#[from] serialport::Error),

    #[error("radio did not acknowledge command, expected OK, got {0:?}")]
    NotAcknowledged(String),
}
