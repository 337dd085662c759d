// [libs/domain/response-engine/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL MOTOR DE RESPUESTA (V1.0 - COMPONENTE C8)
//! RESPONSABILIDAD: GENERACIÓN DE RESPUESTAS GRADUADAS, EJECUCIÓN
//! STUB Y APRENDIZAJE GUIADO POR RESULTADOS
//! =================================================================

pub mod engine;
pub mod types;

pub use engine::{evaluate_effectiveness, execute, generate, ResponseEngine};
pub use types::{ActionStats, ExecutionResult, ResponseOutcome};
