// [libs/domain/models/src/telemetry.rs]
//! =================================================================
//! APARATO: DTO DE TELEMETRÍA LIBRE (V1.0)
//! RESPONSABILIDAD: BOLSA SEMI-ESTRUCTURADA DE TELEMETRÍA CONSUMIDA
//! POR LOS MOTORES DE AMENAZA E INMUNE
//! =================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Telemetry {
    pub packet_count: u64,
    pub connection_attempts: u64,
    pub unique_sources: u64,
    pub transfer_rate_mb_per_s: f64,
    pub destination_ports: Vec<u16>,
    pub source: Option<String>,
    /// Free-text evidence strings (e.g. `"suspicious_process"`,
    /// `"file_creation"`) scanned for substring indicators.
    pub evidence: Vec<String>,
    pub extra: HashMap<String, String>,
}

impl Telemetry {
    /// Stringified representation of every field, used by pattern and
    /// stimulus matching to do simple substring/key lookups.
    pub fn stringified(&self) -> String {
        let mut parts = vec![
            self.packet_count.to_string(),
            self.connection_attempts.to_string(),
            self.unique_sources.to_string(),
            self.transfer_rate_mb_per_s.to_string(),
        ];
        parts.extend(self.destination_ports.iter().map(|p| p.to_string()));
        if let Some(source) = &self.source {
            parts.push(source.clone());
        }
        parts.extend(self.evidence.iter().cloned());
        for (k, v) in &self.extra {
            parts.push(k.clone());
            parts.push(v.clone());
        }
        parts.join(" ")
    }

    /// True if `indicator` appears as an extra key, an evidence entry,
    /// or a substring of the stringified representation.
    pub fn contains_indicator(&self, indicator: &str) -> bool {
        self.extra.contains_key(indicator)
            || self.evidence.iter().any(|e| e.contains(indicator))
            || self.stringified().contains(indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_indicator_matches_evidence_substring() {
        let t = Telemetry {
            evidence: vec!["suspicious_process_spawned".to_string()],
            ..Default::default()
        };
        assert!(t.contains_indicator("suspicious_process"));
        assert!(!t.contains_indicator("port_scan"));
    }

    #[test]
    fn contains_indicator_matches_extra_key() {
        let mut extra = HashMap::new();
        extra.insert("port_scan".to_string(), "true".to_string());
        let t = Telemetry {
            extra,
            ..Default::default()
        };
        assert!(t.contains_indicator("port_scan"));
    }

    #[test]
    fn contains_indicator_matches_stringified_numeric_field() {
        let t = Telemetry {
            packet_count: 9001,
            ..Default::default()
        };
        assert!(t.contains_indicator("9001"));
    }
}
