// [libs/core/ota-engine/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL MOTOR OTA (V1.0 - COMPONENTE C2)
//! RESPONSABILIDAD: ENSAMBLAJE DEL CICLO DE ACTUALIZACIÓN DE MODELO
//! Y SU MÁQUINA DE ESTADOS
//! =================================================================

pub mod engine;
pub mod error;
pub mod resource;
pub mod state;

pub use engine::{is_version_compatible, OtaEngine};
pub use error::OtaError;
pub use state::OtaState;
