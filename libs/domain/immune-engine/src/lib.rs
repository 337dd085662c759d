// [libs/domain/immune-engine/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL MOTOR INMUNE (V1.0 - COMPONENTE C7)
//! RESPONSABILIDAD: DETECCIÓN DE ANTÍGENOS POR POBLACIÓN DE CÉLULAS,
//! ACTIVACIÓN Y CONSOLIDACIÓN DE MEMORIA
//! =================================================================

pub mod engine;
pub mod specializations;
pub mod stimulus;

pub use engine::{activate, learn, Activation, ImmuneEngine};
pub use specializations::{threshold_for, SPECIALIZATIONS};
