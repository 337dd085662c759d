// [libs/domain/models/src/threat.rs]
//! =================================================================
//! APARATO: DTO DE PATRONES DE AMENAZA (V1.0)
//! RESPONSABILIDAD: DEFINICIÓN DE FIRMAS DE AMENAZA EVALUADAS CONTRA
//! TELEMETRÍA LIBRE
//! =================================================================

use crate::telemetry::Telemetry;
use serde::{Deserialize, Serialize};

/// A known threat signature. `match_score` is the fraction of
/// `indicators` that appear literally in the stringified telemetry
/// values (or as a key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatPattern {
    pub pattern_id: String,
    pub pattern_type: String,
    pub indicators: Vec<String>,
    pub severity: f64,
    pub frequency: f64,
    pub description: String,
    pub created_at: u64,
}

impl ThreatPattern {
    /// Match score = (indicators appearing in the telemetry) / (total
    /// indicators).
    pub fn match_score(&self, telemetry: &Telemetry) -> f64 {
        if self.indicators.is_empty() {
            return 0.0;
        }

        let matched = self
            .indicators
            .iter()
            .filter(|indicator| telemetry.contains_indicator(indicator))
            .count();

        matched as f64 / self.indicators.len() as f64
    }
}
