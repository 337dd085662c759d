// [libs/domain/threat-detection/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DEL DETECTOR DE AMENAZAS (V1.0 - COMPONENTE C6)
//! RESPONSABILIDAD: PUNTUACIÓN FUSIONADA PATRÓN+ORÁCULO, CORRELACIÓN
//! Y ADAPTACIÓN DE UMBRAL
//! =================================================================

pub mod engine;
pub mod patterns;
pub mod types;

pub use engine::{correlate, ThreatDetector};
pub use patterns::known_patterns;
pub use types::{Correlation, ScoredThreat, ThreatAssessment, ThreatLandscape, KNOWN_CHAINS};
