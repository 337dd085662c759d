// [libs/domain/immune-engine/src/engine.rs]
/*!
 * =================================================================
 * APARATO: MOTOR INMUNE ADAPTATIVO (V1.0 - CLONAL SELECTION)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: ACTIVACIÓN DE CÉLULAS, APRENDIZAJE POR REFUERZO Y
 * FORMACIÓN DE MEMORIA INMUNOLÓGICA ANTE ANTÍGENOS DETECTADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DUAL POPULATION: Células detectoras cubren especializaciones fijas;
 *    las de memoria aplican un descuento de confianza proporcional a su
 *    fuerza, imitando la respuesta secundaria de un sistema inmune real.
 * 2. CLONAL LEARNING: Un éxito refuerza la memoria y relaja el umbral
 *    de activación; un fallo hace lo inverso, dentro de cotas fijas.
 * 3. CONSOLIDATION: Solo las células de memoria más fuertes por
 *    especialización sobreviven a una consolidación.
 *
 * # Mathematical Proof (Threshold Boundedness):
 * `activation_threshold` solo se actualiza mediante pasos acotados
 * (`LEARN_*_THRESHOLD_*`, `ADAPT_THRESHOLD_STEP`) seguidos de un
 * `clamp` explícito a `[THRESHOLD_FLOOR, THRESHOLD_CEIL]`; por
 * inducción sobre el número de llamadas a `learn`/`adapt`, el umbral
 * permanece dentro de ese intervalo para toda célula, siempre.
 * =================================================================
 */
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use atous_domain_models::{Antigen, CellType, ImmuneCell, ResponseAction, Telemetry};
use atous_infra_oracle_client::OracleClient;
use tracing::warn;

use crate::specializations::{threshold_for, SPECIALIZATIONS};
use crate::stimulus::stimulus_for;

const MEMORY_CONFIDENCE_DISCOUNT: f64 = 0.3;
const LEARN_SUCCESS_STRENGTH_GAIN: f64 = 0.1;
const LEARN_SUCCESS_THRESHOLD_DROP: f64 = 0.05;
const LEARN_FAILURE_STRENGTH_LOSS: f64 = 0.05;
const LEARN_FAILURE_THRESHOLD_GAIN: f64 = 0.02;
const THRESHOLD_FLOOR: f64 = 0.1;
const THRESHOLD_CEIL: f64 = 1.0;
const STRENGTH_FLOOR: f64 = 0.0;
const STRENGTH_CEIL: f64 = 1.0;
const MEMORY_CELLS_RETAINED_PER_SPECIALIZATION: usize = 2;
const CONSOLIDATION_STRENGTH_FLOOR: f64 = 0.3;
const CONSOLIDATION_RESTORE_STRENGTH: f64 = 0.5;
const NEW_MEMORY_CELL_STRENGTH: f64 = 0.8;
const ADAPT_THRESHOLD_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy)]
pub struct Activation {
    pub activated: bool,
    pub response_strength: f64,
}

fn effective_threshold(cell: &ImmuneCell) -> f64 {
    match cell.cell_type {
        CellType::Memory => cell.activation_threshold * (1.0 - MEMORY_CONFIDENCE_DISCOUNT * cell.memory_strength),
        _ => cell.activation_threshold,
    }
}

pub fn activate(cell: &ImmuneCell, stimulus: f64) -> Activation {
    let activated = stimulus >= effective_threshold(cell);
    Activation {
        activated,
        response_strength: if activated { stimulus } else { 0.0 },
    }
}

pub fn learn(cell: &mut ImmuneCell, success: bool) {
    if success {
        cell.memory_strength = (cell.memory_strength + LEARN_SUCCESS_STRENGTH_GAIN).min(STRENGTH_CEIL);
        cell.activation_threshold = (cell.activation_threshold - LEARN_SUCCESS_THRESHOLD_DROP).max(THRESHOLD_FLOOR);
    } else {
        cell.memory_strength = (cell.memory_strength - LEARN_FAILURE_STRENGTH_LOSS).max(STRENGTH_FLOOR);
        cell.activation_threshold = (cell.activation_threshold + LEARN_FAILURE_THRESHOLD_GAIN).min(THRESHOLD_CEIL);
    }
}

fn specialization_for_action(action: &ResponseAction) -> &'static str {
    match action {
        ResponseAction::BlockIp => "network_anomaly",
        ResponseAction::IsolateHost => "malware_detection",
        ResponseAction::RateLimit => "ddos_attack",
        ResponseAction::EncryptSensitiveData => "data_exfiltration",
        _ => "network_anomaly",
    }
}

/// Cell-pool antigen detection and memory/adaptation (component C7).
pub struct ImmuneEngine {
    cells: RwLock<Vec<ImmuneCell>>,
    oracle: Option<Arc<OracleClient>>,
    next_seq: std::sync::atomic::AtomicU64,
}

impl ImmuneEngine {
    pub fn new(immune_cells_count: usize, memory_cells_count: usize, oracle: Option<Arc<OracleClient>>, created_at: u64) -> Self {
        let mut cells = Vec::with_capacity(immune_cells_count + memory_cells_count);

        for i in 0..immune_cells_count {
            let specialization = SPECIALIZATIONS[i % SPECIALIZATIONS.len()];
            cells.push(ImmuneCell {
                cell_id: format!("detector-{i}"),
                cell_type: CellType::Detector,
                specialization: specialization.to_string(),
                activation_threshold: threshold_for(specialization),
                memory_strength: 0.3,
                created_at,
                last_activated: None,
            });
        }

        for i in 0..memory_cells_count {
            let specialization = SPECIALIZATIONS[i % SPECIALIZATIONS.len()];
            cells.push(ImmuneCell {
                cell_id: format!("memory-{i}"),
                cell_type: CellType::Memory,
                specialization: specialization.to_string(),
                activation_threshold: threshold_for(specialization),
                memory_strength: 0.5,
                created_at,
                last_activated: None,
            });
        }

        Self {
            cells: RwLock::new(cells),
            oracle,
            next_seq: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.read().expect("cells lock poisoned").len()
    }

    pub fn cells_snapshot(&self) -> Vec<ImmuneCell> {
        self.cells.read().expect("cells lock poisoned").clone()
    }

    /// Activates every cell whose stimulus meets its (possibly
    /// memory-discounted) threshold, deduplicated by threat type keeping
    /// the highest confidence, sorted descending.
    pub async fn detect_antigens(&self, telemetry: &Telemetry, now: u64) -> Vec<Antigen> {
        let source = telemetry.source.clone().unwrap_or_default();
        let mut by_type: HashMap<String, Antigen> = HashMap::new();

        {
            let cells = self.cells.read().expect("cells lock poisoned");
            for cell in cells.iter() {
                let stimulus = stimulus_for(&cell.specialization, telemetry);
                let activation = activate(cell, stimulus);
                if !activation.activated {
                    continue;
                }

                let antigen = Antigen {
                    antigen_id: self.next_antigen_id(),
                    threat_type: cell.specialization.clone(),
                    confidence: activation.response_strength,
                    source: source.clone(),
                    timestamp: now,
                };

                by_type
                    .entry(antigen.threat_type.clone())
                    .and_modify(|existing| {
                        if antigen.confidence > existing.confidence {
                            *existing = antigen.clone();
                        }
                    })
                    .or_insert(antigen);
            }
        }

        if let Some(oracle_antigen) = self.oracle_antigen(telemetry, &source, now).await {
            by_type
                .entry(oracle_antigen.threat_type.clone())
                .and_modify(|existing| {
                    if oracle_antigen.confidence > existing.confidence {
                        *existing = oracle_antigen.clone();
                    }
                })
                .or_insert(oracle_antigen);
        }

        let mut antigens: Vec<Antigen> = by_type.into_values().collect();
        antigens.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
        antigens
    }

    async fn oracle_antigen(&self, telemetry: &Telemetry, source: &str, now: u64) -> Option<Antigen> {
        let oracle = self.oracle.as_ref()?;
        let prompt = format!("Identify an antigen signature for telemetry: {}", telemetry.stringified());
        let context = serde_json::json!({ "source": source });

        match oracle.consult(prompt, context).await {
            Ok(response) => {
                let (threat_type, confidence) = parse_antigen_hint(&response.analysis)?;
                Some(Antigen {
                    antigen_id: self.next_antigen_id(),
                    threat_type,
                    confidence,
                    source: source.to_string(),
                    timestamp: now,
                })
            }
            Err(err) => {
                warn!(error = %err, "oracle unavailable for antigen merge");
                None
            }
        }
    }

    fn next_antigen_id(&self) -> String {
        let seq = self.next_seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("antigen-{seq}")
    }

    pub fn learn_by_id(&self, cell_id: &str, success: bool) {
        let mut cells = self.cells.write().expect("cells lock poisoned");
        if let Some(cell) = cells.iter_mut().find(|c| c.cell_id == cell_id) {
            learn(cell, success);
        }
    }

    /// Builds a new memory cell from a response's primary action, only
    /// when the response succeeded.
    pub fn form_memory(&self, primary_action: &ResponseAction, success: bool, now: u64) -> Option<ImmuneCell> {
        if !success {
            return None;
        }
        let specialization = specialization_for_action(primary_action);
        let seq = self.next_seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let cell = ImmuneCell {
            cell_id: format!("memory-learned-{seq}"),
            cell_type: CellType::Memory,
            specialization: specialization.to_string(),
            activation_threshold: threshold_for(specialization),
            memory_strength: NEW_MEMORY_CELL_STRENGTH,
            created_at: now,
            last_activated: None,
        };
        self.cells.write().expect("cells lock poisoned").push(cell.clone());
        Some(cell)
    }

    /// Retains at most two memory cells per specialization (the
    /// strongest), and raises any surviving weak cell back to 0.5.
    pub fn consolidate(&self) {
        let mut cells = self.cells.write().expect("cells lock poisoned");

        let mut by_specialization: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, cell) in cells.iter().enumerate() {
            if cell.cell_type == CellType::Memory {
                by_specialization.entry(cell.specialization.clone()).or_default().push(idx);
            }
        }

        let mut drop_indices: Vec<usize> = Vec::new();
        for indices in by_specialization.values() {
            let mut sorted = indices.clone();
            sorted.sort_by(|a, b| {
                cells[*b]
                    .memory_strength
                    .partial_cmp(&cells[*a].memory_strength)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for idx in sorted.into_iter().skip(MEMORY_CELLS_RETAINED_PER_SPECIALIZATION) {
                drop_indices.push(idx);
            }
        }
        drop_indices.sort_unstable();
        for idx in drop_indices.into_iter().rev() {
            cells.remove(idx);
        }

        for cell in cells.iter_mut() {
            if cell.cell_type == CellType::Memory && cell.memory_strength < CONSOLIDATION_STRENGTH_FLOOR {
                cell.memory_strength = CONSOLIDATION_RESTORE_STRENGTH;
            }
        }
    }

    /// Adds a detector for each genuinely new threat type and, if the
    /// environment's complexity is increasing, lowers every detector's
    /// threshold so the pool reacts faster to noisier signal.
    pub fn adapt(&self, new_threat_types: &[String], complexity_increasing: bool, now: u64) {
        let mut cells = self.cells.write().expect("cells lock poisoned");

        for threat_type in new_threat_types {
            let already_covered = cells.iter().any(|c| &c.specialization == threat_type);
            if already_covered {
                continue;
            }
            let seq = self.next_seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            cells.push(ImmuneCell {
                cell_id: format!("detector-adapted-{seq}"),
                cell_type: CellType::Detector,
                specialization: threat_type.clone(),
                activation_threshold: threshold_for(threat_type),
                memory_strength: 0.3,
                created_at: now,
                last_activated: None,
            });
        }

        if complexity_increasing {
            for cell in cells.iter_mut() {
                if cell.cell_type == CellType::Detector {
                    cell.activation_threshold = (cell.activation_threshold - ADAPT_THRESHOLD_STEP).max(THRESHOLD_FLOOR);
                }
            }
        }
    }
}

fn parse_antigen_hint(analysis: &str) -> Option<(String, f64)> {
    let mut threat_type = None;
    let mut confidence = None;
    for line in analysis.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("THREAT_TYPE:") {
            threat_type = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("THREAT_SCORE:") {
            confidence = rest.trim().parse::<f64>().ok();
        }
    }
    match (threat_type, confidence) {
        (Some(t), Some(c)) => Some((t, c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_distributes_cells_round_robin_across_specializations() {
        let engine = ImmuneEngine::new(10, 5, None, 0);
        let cells = engine.cells_snapshot();
        assert_eq!(cells.iter().filter(|c| c.cell_type == CellType::Detector).count(), 10);
        assert_eq!(cells.iter().filter(|c| c.cell_type == CellType::Memory).count(), 5);
        assert_eq!(cells.iter().filter(|c| c.cell_type == CellType::Detector).next().unwrap().memory_strength, 0.3);
        assert_eq!(cells.iter().filter(|c| c.cell_type == CellType::Memory).next().unwrap().memory_strength, 0.5);
    }

    #[tokio::test]
    async fn detect_antigens_dedupes_by_type_keeping_highest_confidence() {
        let engine = ImmuneEngine::new(10, 10, None, 0);
        let telemetry = Telemetry {
            packet_count: 60_000,
            connection_attempts: 60,
            ..Default::default()
        };
        let antigens = engine.detect_antigens(&telemetry, 100).await;
        let network_anomaly_hits: Vec<_> = antigens.iter().filter(|a| a.threat_type == "network_anomaly").collect();
        assert_eq!(network_anomaly_hits.len(), 1);
    }

    #[tokio::test]
    async fn detect_antigens_sorts_descending_by_confidence() {
        let engine = ImmuneEngine::new(10, 10, None, 0);
        let telemetry = Telemetry {
            packet_count: 150_000,
            unique_sources: 200,
            transfer_rate_mb_per_s: 20.0,
            ..Default::default()
        };
        let antigens = engine.detect_antigens(&telemetry, 0).await;
        for pair in antigens.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn learn_success_strengthens_memory_and_lowers_threshold() {
        let mut cell = ImmuneCell {
            cell_id: "c1".into(),
            cell_type: CellType::Memory,
            specialization: "ddos_attack".into(),
            activation_threshold: 0.8,
            memory_strength: 0.5,
            created_at: 0,
            last_activated: None,
        };
        learn(&mut cell, true);
        assert!((cell.memory_strength - 0.6).abs() < 1e-9);
        assert!((cell.activation_threshold - 0.75).abs() < 1e-9);
    }

    #[test]
    fn learn_failure_weakens_memory_and_raises_threshold() {
        let mut cell = ImmuneCell {
            cell_id: "c1".into(),
            cell_type: CellType::Memory,
            specialization: "ddos_attack".into(),
            activation_threshold: 0.8,
            memory_strength: 0.02,
            created_at: 0,
            last_activated: None,
        };
        learn(&mut cell, false);
        assert_eq!(cell.memory_strength, 0.0);
        assert!((cell.activation_threshold - 0.82).abs() < 1e-9);
    }

    #[test]
    fn form_memory_maps_primary_action_and_requires_success() {
        let engine = ImmuneEngine::new(0, 0, None, 0);
        assert!(engine.form_memory(&ResponseAction::BlockIp, false, 0).is_none());
        let cell = engine.form_memory(&ResponseAction::RateLimit, true, 0).unwrap();
        assert_eq!(cell.specialization, "ddos_attack");
        assert_eq!(cell.memory_strength, NEW_MEMORY_CELL_STRENGTH);
    }

    #[test]
    fn consolidate_keeps_top_two_memory_cells_and_raises_weak_survivors() {
        let engine = ImmuneEngine::new(0, 0, None, 0);
        let strengths = [0.05, 0.1, 0.2, 0.9];
        for (i, strength) in strengths.iter().enumerate() {
            engine.cells.write().unwrap().push(ImmuneCell {
                cell_id: format!("m{i}"),
                cell_type: CellType::Memory,
                specialization: "ddos_attack".into(),
                activation_threshold: 0.8,
                memory_strength: *strength,
                created_at: 0,
                last_activated: None,
            });
        }
        engine.consolidate();
        let cells = engine.cells_snapshot();
        let remaining: Vec<_> = cells.iter().filter(|c| c.specialization == "ddos_attack").collect();
        // strongest two survive: 0.9 and 0.2; the weak survivor (0.2) gets raised to 0.5.
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().any(|c| (c.memory_strength - 0.9).abs() < 1e-9));
        assert!(remaining.iter().any(|c| (c.memory_strength - 0.5).abs() < 1e-9));
    }

    #[test]
    fn adapt_adds_detector_for_new_threat_type_and_lowers_thresholds_on_complexity() {
        let engine = ImmuneEngine::new(2, 0, None, 0);
        let before: Vec<f64> = engine.cells_snapshot().iter().map(|c| c.activation_threshold).collect();

        engine.adapt(&["novel_exploit".to_string()], true, 10);

        let cells = engine.cells_snapshot();
        assert!(cells.iter().any(|c| c.specialization == "novel_exploit"));
        let after: Vec<f64> = cells
            .iter()
            .filter(|c| c.cell_type == CellType::Detector && c.specialization != "novel_exploit")
            .map(|c| c.activation_threshold)
            .collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((b - a - ADAPT_THRESHOLD_STEP).abs() < 1e-9);
        }
    }
}
