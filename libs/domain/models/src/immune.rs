// [libs/domain/models/src/immune.rs]
//! =================================================================
//! APARATO: DTOS DEL NÚCLEO INMUNE (V1.0)
//! RESPONSABILIDAD: TIPOS DE CÉLULA INMUNE Y ANTÍGENO PARA EL
//! NÚCLEO DE SEGURIDAD ADAPTATIVA
//! =================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    Detector,
    Memory,
    Effector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImmuneCell {
    pub cell_id: String,
    pub cell_type: CellType,
    pub specialization: String,
    pub activation_threshold: f64,
    pub memory_strength: f64,
    pub created_at: u64,
    pub last_activated: Option<u64>,
}

/// A structured description of a detected threat, matchable against
/// immune cells and other antigens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Antigen {
    pub antigen_id: String,
    pub threat_type: String,
    pub confidence: f64,
    pub source: String,
    pub timestamp: u64,
}

impl Antigen {
    /// Similarity = 0.5*(type match) + 0.3*(source match) +
    /// 0.2*(1 - |delta confidence|).
    pub fn similarity(&self, other: &Antigen) -> f64 {
        let type_match = if self.threat_type == other.threat_type {
            1.0
        } else {
            0.0
        };
        let source_match = if self.source == other.source { 1.0 } else { 0.0 };
        let confidence_term = 1.0 - (self.confidence - other.confidence).abs();

        0.5 * type_match + 0.3 * source_match + 0.2 * confidence_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn antigen(threat_type: &str, source: &str, confidence: f64) -> Antigen {
        Antigen {
            antigen_id: "a1".to_string(),
            threat_type: threat_type.to_string(),
            confidence,
            source: source.to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn identical_antigens_are_fully_similar() {
        let a = antigen("ddos", "10.0.0.1", 0.8);
        assert_eq!(a.similarity(&a), 1.0);
    }

    #[test]
    fn disjoint_antigens_use_only_confidence_term() {
        let a = antigen("ddos", "10.0.0.1", 0.8);
        let b = antigen("malware", "10.0.0.2", 0.3);
        let expected = 0.2 * (1.0 - (0.8_f64 - 0.3).abs());
        assert!((a.similarity(&b) - expected).abs() < 1e-9);
    }

    #[test]
    fn same_type_different_source_is_partial() {
        let a = antigen("ddos", "10.0.0.1", 0.5);
        let b = antigen("ddos", "10.0.0.2", 0.5);
        assert!((a.similarity(&b) - 0.5).abs() < 1e-9);
    }
}
