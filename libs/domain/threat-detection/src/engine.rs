// [libs/domain/threat-detection/src/engine.rs]
/*!
 * =================================================================
 * APARATO: DETECTOR DE AMENAZAS HÍBRIDO (V1.0 - PATTERN + ORACLE FUSION)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: PUNTUACIÓN FUSIONADA DE AMENAZAS Y CORRELACIÓN DE
 * CAMPAÑAS SOBRE TELEMETRÍA LIBRE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DUAL SIGNAL: La mejor coincidencia de patrón conocido se promedia
 *    con la evaluación del oráculo LLM; sin oráculo disponible, cae a
 *    una puntuación simulada determinista (con semilla) o aleatoria.
 * 2. THRESHOLD DRIFT: El umbral sube en paisajes de baja amenaza o
 *    alta tasa de falsos positivos, y baja en el caso contrario.
 * 3. CHAIN CORRELATION: Un conjunto de amenazas observadas que cubre
 *    una cadena de ataque conocida se reporta sin importar el orden.
 *
 * # Mathematical Proof (Fused Score Boundedness):
 * Tanto la puntuación de patrón (`match_score * severity`, ambos en
 * `[0, 1]`) como la del oráculo están acotadas en `[0, 1]`; su
 * promedio aritmético simple es por tanto también un valor en
 * `[0, 1]`, preservando el dominio esperado por el motor de respuesta.
 * =================================================================
 */
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use atous_domain_models::{Telemetry, ThreatPattern};
use atous_infra_oracle_client::OracleClient;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::patterns::known_patterns;
use crate::types::{Correlation, ScoredThreat, ThreatAssessment, ThreatLandscape, KNOWN_CHAINS};

const PATTERN_MATCH_THRESHOLD: f64 = 0.5;
const THRESHOLD_MIN: f64 = 0.5;
const THRESHOLD_MAX: f64 = 0.9;
const THRESHOLD_STEP: f64 = 0.05;
const FALSE_POSITIVE_RATE_HIGH: f64 = 0.15;
const FALSE_POSITIVE_RATE_LOW: f64 = 0.05;

/// Pattern and oracle-fused threat scoring (component C6).
pub struct ThreatDetector {
    patterns: Vec<ThreatPattern>,
    oracle: Option<Arc<OracleClient>>,
    threshold: RwLock<f64>,
    rng_seed: Option<u64>,
}

impl ThreatDetector {
    pub fn new(patterns: Vec<ThreatPattern>, oracle: Option<Arc<OracleClient>>, initial_threshold: f64) -> Self {
        Self {
            patterns,
            oracle,
            threshold: RwLock::new(initial_threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX)),
            rng_seed: None,
        }
    }

    pub fn with_known_patterns(oracle: Option<Arc<OracleClient>>, initial_threshold: f64, seeded_at: u64) -> Self {
        Self::new(known_patterns(seeded_at), oracle, initial_threshold)
    }

    /// Deterministic simulated-oracle fallback for tests; production
    /// detectors leave this unset and use `rand::thread_rng`.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn threshold(&self) -> f64 {
        *self.threshold.read().expect("threshold lock poisoned")
    }

    pub async fn detect(&self, telemetry: &Telemetry) -> ThreatAssessment {
        let best_pattern = self
            .patterns
            .iter()
            .filter_map(|pattern| {
                let match_score = pattern.match_score(telemetry);
                if match_score > PATTERN_MATCH_THRESHOLD {
                    Some((match_score * pattern.severity, pattern.pattern_type.clone()))
                } else {
                    None
                }
            })
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let (oracle_score, oracle_type) = self.oracle_score(telemetry).await;

        match best_pattern {
            Some((pattern_score, pattern_type)) => {
                let combined = (pattern_score + oracle_score) / 2.0;
                let threat_type = if pattern_score >= oracle_score { pattern_type } else { oracle_type };
                ThreatAssessment {
                    score: combined,
                    threat_type,
                }
            }
            None => ThreatAssessment {
                score: oracle_score,
                threat_type: oracle_type,
            },
        }
    }

    async fn oracle_score(&self, telemetry: &Telemetry) -> (f64, String) {
        let Some(oracle) = &self.oracle else {
            return self.simulated_score();
        };

        let prompt = format!(
            "Assess the following telemetry for threat indicators: {}",
            telemetry.stringified()
        );
        let context = serde_json::json!({
            "packet_count": telemetry.packet_count,
            "connection_attempts": telemetry.connection_attempts,
            "unique_sources": telemetry.unique_sources,
            "transfer_rate_mb_per_s": telemetry.transfer_rate_mb_per_s,
            "destination_ports": telemetry.destination_ports,
            "evidence": telemetry.evidence,
        });

        match oracle.consult(prompt, context).await {
            Ok(response) => parse_oracle_analysis(&response.analysis).unwrap_or_else(|| {
                warn!("oracle response had no parseable THREAT_SCORE/THREAT_TYPE lines");
                self.simulated_score()
            }),
            Err(err) => {
                debug!(error = %err, "oracle unavailable, falling back to simulated score");
                self.simulated_score()
            }
        }
    }

    fn simulated_score(&self) -> (f64, String) {
        let score = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed).gen_range(0.0..=1.0),
            None => rand::thread_rng().gen_range(0.0..=1.0),
        };
        (score, "simulated_threat".to_string())
    }

    pub fn adjust_threshold(&self, landscape: ThreatLandscape, false_positive_rate: f64) {
        let mut threshold = self.threshold.write().expect("threshold lock poisoned");
        let raise = landscape == ThreatLandscape::Low || false_positive_rate > FALSE_POSITIVE_RATE_HIGH;
        let lower = landscape == ThreatLandscape::High || false_positive_rate < FALSE_POSITIVE_RATE_LOW;

        if raise && !lower {
            *threshold = (*threshold + THRESHOLD_STEP).min(THRESHOLD_MAX);
        } else if lower && !raise {
            *threshold = (*threshold - THRESHOLD_STEP).max(THRESHOLD_MIN);
        }
    }
}

fn parse_oracle_analysis(analysis: &str) -> Option<(f64, String)> {
    let mut score = None;
    let mut threat_type = None;

    for line in analysis.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("THREAT_SCORE:") {
            score = rest.trim().parse::<f64>().ok();
        } else if let Some(rest) = line.strip_prefix("THREAT_TYPE:") {
            threat_type = Some(rest.trim().to_string());
        }
    }

    match (score, threat_type) {
        (Some(score), Some(threat_type)) => Some((score, threat_type)),
        _ => None,
    }
}

/// Groups scored threats by source, flagging a campaign when a source
/// produced at least two, and a known chain when the observed type set
/// contains every step of a predefined ordered chain.
pub fn correlate(threats: &[ScoredThreat]) -> Correlation {
    if threats.is_empty() {
        return Correlation::default();
    }

    let mut by_source: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for threat in threats {
        *by_source.entry(threat.source.as_str()).or_insert(0) += 1;
    }

    let campaigns: Vec<String> = by_source
        .iter()
        .filter(|(_, count)| **count >= 2)
        .map(|(source, _)| source.to_string())
        .collect();

    let observed_types: HashSet<&str> = threats.iter().map(|t| t.threat_type.as_str()).collect();
    let threat_chain = KNOWN_CHAINS
        .iter()
        .find(|chain| chain.iter().all(|step| observed_types.contains(step)))
        .map(|chain| chain.iter().map(|s| s.to_string()).collect());

    let overall_severity = threats.iter().map(|t| t.score).sum::<f64>() / threats.len() as f64;

    Correlation {
        campaign_detected: !campaigns.is_empty(),
        campaigns,
        threat_chain,
        overall_severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry_with_evidence(evidence: &[&str]) -> Telemetry {
        Telemetry {
            evidence: evidence.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn detect_uses_pattern_and_simulated_oracle_fusion() {
        let detector = ThreatDetector::with_known_patterns(None, 0.7, 0).with_rng_seed(42);
        let telemetry = telemetry_with_evidence(&["high_packet_rate"]);
        let assessment = detector.detect(&telemetry).await;
        assert!(assessment.score > 0.0);
    }

    #[tokio::test]
    async fn detect_falls_back_to_oracle_only_when_no_pattern_matches() {
        let detector = ThreatDetector::with_known_patterns(None, 0.7, 0).with_rng_seed(7);
        let telemetry = Telemetry::default();
        let assessment = detector.detect(&telemetry).await;
        assert_eq!(assessment.threat_type, "simulated_threat");
    }

    #[test]
    fn parse_oracle_analysis_reads_both_fields() {
        let parsed = parse_oracle_analysis("THREAT_SCORE: 0.83\nTHREAT_TYPE: ddos_attack").unwrap();
        assert_eq!(parsed.0, 0.83);
        assert_eq!(parsed.1, "ddos_attack");
    }

    #[test]
    fn parse_oracle_analysis_returns_none_when_incomplete() {
        assert!(parse_oracle_analysis("no structured fields here").is_none());
    }

    #[test]
    fn correlate_flags_campaign_for_repeated_source() {
        let threats = vec![
            ScoredThreat {
                source: "10.0.0.1".to_string(),
                threat_type: "port_scan".to_string(),
                score: 0.6,
            },
            ScoredThreat {
                source: "10.0.0.1".to_string(),
                threat_type: "brute_force".to_string(),
                score: 0.7,
            },
        ];
        let correlation = correlate(&threats);
        assert!(correlation.campaign_detected);
        assert_eq!(correlation.campaigns, vec!["10.0.0.1".to_string()]);
    }

    #[test]
    fn correlate_detects_known_chain_regardless_of_order() {
        let threats = vec![
            ScoredThreat {
                source: "a".to_string(),
                threat_type: "data_exfiltration".to_string(),
                score: 0.9,
            },
            ScoredThreat {
                source: "b".to_string(),
                threat_type: "port_scan".to_string(),
                score: 0.3,
            },
            ScoredThreat {
                source: "c".to_string(),
                threat_type: "brute_force".to_string(),
                score: 0.5,
            },
        ];
        let correlation = correlate(&threats);
        assert_eq!(
            correlation.threat_chain,
            Some(vec![
                "port_scan".to_string(),
                "brute_force".to_string(),
                "data_exfiltration".to_string()
            ])
        );
    }

    #[test]
    fn adjust_threshold_raises_on_low_landscape() {
        let detector = ThreatDetector::new(vec![], None, 0.7);
        detector.adjust_threshold(ThreatLandscape::Low, 0.0);
        assert!((detector.threshold() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn adjust_threshold_lowers_on_high_landscape() {
        let detector = ThreatDetector::new(vec![], None, 0.7);
        detector.adjust_threshold(ThreatLandscape::High, 0.0);
        assert!((detector.threshold() - 0.65).abs() < f64::EPSILON);
    }

    #[test]
    fn adjust_threshold_clamps_to_bounds() {
        let detector = ThreatDetector::new(vec![], None, 0.89);
        detector.adjust_threshold(ThreatLandscape::Low, 0.0);
        assert_eq!(detector.threshold(), THRESHOLD_MAX);

        let detector = ThreatDetector::new(vec![], None, 0.51);
        detector.adjust_threshold(ThreatLandscape::High, 0.0);
        assert_eq!(detector.threshold(), THRESHOLD_MIN);
    }
}
