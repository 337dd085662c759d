// [libs/domain/models/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DE VALIDACIÓN DE DOMINIO (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE CONFIGURACIÓN Y DTOS
//! COMPARTIDOS
//! =================================================================

use thiserror::Error;

/// Fatal at construction time: invalid region, out-of-bound initial
/// radio parameters, or a malformed option in `NodeConfig`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported LoRa region: {0}")]
    UnsupportedRegion(String),

    #[error("tx_power {tx_power} dBm exceeds physical bound [{min}, {max}]")]
    TxPowerOutOfBounds { tx_power: i32, min: i32, max: i32 },

    #[error("spreading_factor {0} out of bounds [7, 12]")]
    SpreadingFactorOutOfBounds(u8),

    #[error("bandwidth {0} Hz out of bounds [125000, 500000]")]
    BandwidthOutOfBounds(u32),

    #[error("invalid coding rate: {0}")]
    InvalidCodingRate(String),

    #[error("invalid optimization mode: {0} (expected balanced|energy|reliability)")]
    InvalidOptimizationMode(String),

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),
}
