// [libs/domain/response-engine/src/engine.rs]
/*!
 * =================================================================
 * APARATO: MOTOR DE RESPUESTA GRADUADA (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: GENERACIÓN, EJECUCIÓN Y APRENDIZAJE DE RESPUESTAS
 * PROPORCIONALES A LA SEVERIDAD DE UNA AMENAZA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * Una puntuación de amenaza se traduce en una acción primaria por
 * banda de severidad, opcionalmente aumentada con acciones propias de
 * la familia de amenaza cuando el antígeno proviene del motor inmune.
 * El umbral de disparo se autoajusta hacia arriba cuando la
 * efectividad reciente cae por debajo de un piso fijo, sin jamás
 * bajarlo por sí solo.
 *
 * # Mathematical Proof (Threshold Monotonic Floor):
 * `maybe_raise_threshold` solo incrementa `threat_threshold` en pasos
 * de `THRESHOLD_RAISE_STEP`, acotado por `min(..., THRESHOLD_CEIL)`;
 * ninguna otra ruta del motor lo disminuye. Por lo tanto la secuencia
 * de valores de `threat_threshold` a lo largo de la vida del motor es
 * no decreciente y permanece acotada por `THRESHOLD_CEIL`.
 * =================================================================
 */
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Instant;

use atous_domain_models::{AdaptiveResponse, LearningEntry, ResponseAction};
use tracing::info;

use crate::types::{ActionStats, ExecutionResult, ResponseOutcome};

const BLOCK_IP_DURATION_SECS: &str = "86400";
const RATE_LIMIT_RATE: &str = "10";
const RATE_LIMIT_WINDOW: &str = "60";
const MONITOR_DURATION_SECS: &str = "3600";

const RECENT_EFFECTIVENESS_WINDOW: usize = 10;
const RECENT_EFFECTIVENESS_FLOOR: f64 = 0.5;
const THRESHOLD_RAISE_STEP: f64 = 0.05;
const THRESHOLD_CEIL: f64 = 0.9;

/// Maps a score band to its primary action, priority, and parameters.
pub fn generate(score: f64, threat_type: Option<&str>, immune_generated: bool, now: u64, seq: u64) -> AdaptiveResponse {
    let (action, priority, parameters) = if score > 0.9 {
        (ResponseAction::BlockIp, 1, [("duration".to_string(), BLOCK_IP_DURATION_SECS.to_string())].into())
    } else if score > 0.7 {
        (
            ResponseAction::RateLimit,
            2,
            [
                ("rate".to_string(), RATE_LIMIT_RATE.to_string()),
                ("window".to_string(), RATE_LIMIT_WINDOW.to_string()),
            ]
            .into(),
        )
    } else if score > 0.5 {
        (
            ResponseAction::AlertAdmin,
            3,
            [("message".to_string(), format!("threat score {score:.2} requires operator review"))].into(),
        )
    } else {
        (
            ResponseAction::Monitor,
            4,
            [("duration".to_string(), MONITOR_DURATION_SECS.to_string())].into(),
        )
    };

    let additional_actions = if immune_generated {
        threat_type.map(augmenting_actions).unwrap_or_default()
    } else {
        Vec::new()
    };

    AdaptiveResponse {
        response_id: format!("response-{seq}"),
        action,
        additional_actions,
        priority,
        parameters,
        timestamp: now,
    }
}

fn augmenting_actions(threat_type: &str) -> Vec<ResponseAction> {
    if threat_type.contains("ddos") {
        vec![ResponseAction::EnableDdosProtection, ResponseAction::ScaleResources]
    } else if threat_type.contains("malware") {
        vec![ResponseAction::ScanSystem, ResponseAction::QuarantineSuspicious]
    } else if threat_type.contains("exfiltration") {
        vec![ResponseAction::EncryptSensitiveData, ResponseAction::AuditAccess]
    } else {
        Vec::new()
    }
}

/// Stub execution: no real side effects, but every action (primary plus
/// any immune-augmented ones) is reported as individually executed.
pub fn execute(response: &AdaptiveResponse) -> ExecutionResult {
    let started = Instant::now();
    let mut actions_executed = vec![response.action.as_str().to_string()];
    actions_executed.extend(response.additional_actions.iter().map(|a| a.as_str().to_string()));

    info!(response_id = %response.response_id, actions = ?actions_executed, "executing response");

    ExecutionResult {
        success: true,
        execution_time_ms: started.elapsed().as_millis() as u64,
        actions_executed,
    }
}

pub fn evaluate_effectiveness(outcome: &ResponseOutcome) -> f64 {
    let mut score = 0.0;

    if outcome.threat_stopped && !outcome.false_positive {
        score += 0.6;
    } else if outcome.threat_stopped {
        score += 0.4;
    }

    if outcome.false_positive {
        score -= 0.3;
    }

    if outcome.response_time_secs < 1.0 {
        score += 0.2;
    } else if outcome.response_time_secs < 5.0 {
        score += 0.1;
    }

    score -= outcome.collateral_damage;

    score.clamp(0.0, 1.0)
}

/// Response generation, execution, and outcome-driven learning (C8).
pub struct ResponseEngine {
    threat_threshold: RwLock<f64>,
    history: Mutex<VecDeque<(AdaptiveResponse, f64)>>,
    memory_size: usize,
    next_seq: AtomicU64,
}

impl ResponseEngine {
    pub fn new(initial_threshold: f64, memory_size: usize) -> Self {
        Self {
            threat_threshold: RwLock::new(initial_threshold),
            history: Mutex::new(VecDeque::with_capacity(memory_size)),
            memory_size,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn threat_threshold(&self) -> f64 {
        *self.threat_threshold.read().expect("threshold lock poisoned")
    }

    pub fn generate(&self, score: f64, threat_type: Option<&str>, immune_generated: bool, now: u64) -> AdaptiveResponse {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        generate(score, threat_type, immune_generated, now, seq)
    }

    pub fn learn_from_outcome(&self, response: &AdaptiveResponse, outcome: &ResponseOutcome, now: u64) -> LearningEntry {
        let effectiveness = evaluate_effectiveness(outcome);

        {
            let mut history = self.history.lock().expect("history lock poisoned");
            if history.len() == self.memory_size && self.memory_size > 0 {
                history.pop_front();
            }
            if self.memory_size > 0 {
                history.push_back((response.clone(), effectiveness));
            }
        }

        self.maybe_raise_threshold();

        LearningEntry {
            response_id: response.response_id.clone(),
            response_type: response.action.as_str().to_string(),
            effectiveness,
            outcome_summary: format!(
                "stopped={} false_positive={} collateral={:.2}",
                outcome.threat_stopped, outcome.false_positive, outcome.collateral_damage
            ),
            timestamp: now,
        }
    }

    fn maybe_raise_threshold(&self) {
        let history = self.history.lock().expect("history lock poisoned");
        let recent: Vec<f64> = history
            .iter()
            .rev()
            .take(RECENT_EFFECTIVENESS_WINDOW)
            .map(|(_, effectiveness)| *effectiveness)
            .collect();
        drop(history);

        if recent.is_empty() {
            return;
        }

        let mean = recent.iter().sum::<f64>() / recent.len() as f64;
        if mean < RECENT_EFFECTIVENESS_FLOOR {
            let mut threshold = self.threat_threshold.write().expect("threshold lock poisoned");
            *threshold = (*threshold + THRESHOLD_RAISE_STEP).min(THRESHOLD_CEIL);
        }
    }

    pub fn optimize(&self) -> HashMap<String, ActionStats> {
        let history = self.history.lock().expect("history lock poisoned");
        let mut by_action: HashMap<String, Vec<(&AdaptiveResponse, f64)>> = HashMap::new();
        for (response, effectiveness) in history.iter() {
            by_action
                .entry(response.action.as_str().to_string())
                .or_default()
                .push((response, *effectiveness));
        }

        by_action
            .into_iter()
            .map(|(action, entries)| {
                let mean_effectiveness = entries.iter().map(|(_, e)| *e).sum::<f64>() / entries.len() as f64;
                let mut suggested_parameters = HashMap::new();
                if let Some(median) = median_duration(&entries) {
                    suggested_parameters.insert("duration".to_string(), median.to_string());
                }
                (
                    action,
                    ActionStats {
                        mean_effectiveness,
                        sample_count: entries.len(),
                        suggested_parameters,
                    },
                )
            })
            .collect()
    }
}

fn median_duration(entries: &[(&AdaptiveResponse, f64)]) -> Option<u64> {
    let mut durations: Vec<u64> = entries
        .iter()
        .filter_map(|(response, _)| response.parameters.get("duration").and_then(|d| d.parse::<u64>().ok()))
        .collect();
    if durations.is_empty() {
        return None;
    }
    durations.sort_unstable();
    Some(durations[durations.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_maps_score_bands_to_actions() {
        assert_eq!(generate(0.95, None, false, 0, 0).action, ResponseAction::BlockIp);
        assert_eq!(generate(0.8, None, false, 0, 0).action, ResponseAction::RateLimit);
        assert_eq!(generate(0.6, None, false, 0, 0).action, ResponseAction::AlertAdmin);
        assert_eq!(generate(0.2, None, false, 0, 0).action, ResponseAction::Monitor);
    }

    #[test]
    fn generate_augments_immune_responses_by_threat_family() {
        let response = generate(0.95, Some("ddos_attack"), true, 0, 0);
        assert_eq!(
            response.additional_actions,
            vec![ResponseAction::EnableDdosProtection, ResponseAction::ScaleResources]
        );
    }

    #[test]
    fn generate_does_not_augment_non_immune_responses() {
        let response = generate(0.95, Some("ddos_attack"), false, 0, 0);
        assert!(response.additional_actions.is_empty());
    }

    #[test]
    fn evaluate_effectiveness_rewards_clean_stop() {
        let outcome = ResponseOutcome {
            threat_stopped: true,
            false_positive: false,
            response_time_secs: 0.5,
            collateral_damage: 0.0,
        };
        assert!((evaluate_effectiveness(&outcome) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn evaluate_effectiveness_penalizes_false_positive() {
        let outcome = ResponseOutcome {
            threat_stopped: true,
            false_positive: true,
            response_time_secs: 2.0,
            collateral_damage: 0.1,
        };
        // +0.4 (stopped-only) - 0.3 (false positive) + 0.1 (<5s) - 0.1 (collateral) = 0.1
        assert!((evaluate_effectiveness(&outcome) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn evaluate_effectiveness_clamps_to_unit_interval() {
        let outcome = ResponseOutcome {
            threat_stopped: false,
            false_positive: true,
            response_time_secs: 10.0,
            collateral_damage: 1.0,
        };
        assert_eq!(evaluate_effectiveness(&outcome), 0.0);
    }

    #[test]
    fn learn_from_outcome_raises_threshold_after_poor_recent_mean() {
        let engine = ResponseEngine::new(0.7, 20);
        let bad_outcome = ResponseOutcome {
            threat_stopped: false,
            false_positive: true,
            response_time_secs: 10.0,
            collateral_damage: 0.5,
        };
        let response = engine.generate(0.95, None, false, 0);
        for _ in 0..3 {
            engine.learn_from_outcome(&response, &bad_outcome, 0);
        }
        assert!((engine.threat_threshold() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn learn_from_outcome_does_not_raise_threshold_with_good_outcomes() {
        let engine = ResponseEngine::new(0.7, 20);
        let good_outcome = ResponseOutcome {
            threat_stopped: true,
            false_positive: false,
            response_time_secs: 0.2,
            collateral_damage: 0.0,
        };
        let response = engine.generate(0.95, None, false, 0);
        engine.learn_from_outcome(&response, &good_outcome, 0);
        assert_eq!(engine.threat_threshold(), 0.7);
    }

    #[test]
    fn history_ring_is_bounded_by_memory_size() {
        let engine = ResponseEngine::new(0.7, 2);
        let outcome = ResponseOutcome {
            threat_stopped: true,
            false_positive: false,
            response_time_secs: 0.1,
            collateral_damage: 0.0,
        };
        for _ in 0..5 {
            let response = engine.generate(0.95, None, false, 0);
            engine.learn_from_outcome(&response, &outcome, 0);
        }
        assert_eq!(engine.history.lock().unwrap().len(), 2);
    }

    #[test]
    fn optimize_reports_mean_effectiveness_and_median_duration_per_action() {
        let engine = ResponseEngine::new(0.7, 10);
        let outcome = ResponseOutcome {
            threat_stopped: true,
            false_positive: false,
            response_time_secs: 0.1,
            collateral_damage: 0.0,
        };
        for _ in 0..3 {
            let response = engine.generate(0.95, None, false, 0);
            engine.learn_from_outcome(&response, &outcome, 0);
        }
        let stats = engine.optimize();
        let block_ip_stats = &stats["block_ip"];
        assert_eq!(block_ip_stats.sample_count, 3);
        assert_eq!(block_ip_stats.suggested_parameters["duration"], "86400");
    }
}
