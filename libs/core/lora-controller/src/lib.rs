// [libs/core/lora-controller/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL CONTROLADOR LORA (V1.0 - COMPONENTE C3)
//! RESPONSABILIDAD: ENSAMBLAJE DEL CONTROLADOR ADAPTATIVO Y SU
//! RESUMEN DE DESEMPEÑO
//! =================================================================

pub mod controller;
pub mod summary;

pub use controller::LoraController;
pub use summary::PerformanceSummary;
