// [libs/infra/radio-adapter/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL ADAPTADOR DE RADIO (V1.0)
//! RESPONSABILIDAD: ADAPTADOR DE HARDWARE OPCIONAL PARA EL
//! CONTROLADOR LORA
//! =================================================================

pub mod adapter;
pub mod error;

pub use adapter::{NullRadioAdapter, RadioAdapter, SerialRadioAdapter};
pub use error::RadioError;
