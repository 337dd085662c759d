// [apps/edge-agent/src/scheduler.rs]
//! =================================================================
//! APARATO: SCHEDULER DE TAREAS EN SEGUNDO PLANO (V1.0)
//! RESPONSABILIDAD: DESPACHO Y CICLO DE VIDA DE LOS BUCLES DE
//! ACTUALIZACIÓN OTA Y MONITOREO DE SEGURIDAD
//! =================================================================
//!
//! Membership health checks run via `MembershipMonitor`'s own ticker,
//! the OTA poller and the security monitor are spawned here, each
//! stoppable through a `watch` channel so shutdown can wait on them
//! instead of aborting mid-cycle.

use std::sync::Arc;
use std::time::Duration;

use atous_domain_response::ResponseOutcome;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::state::NodeState;
use crate::telemetry_source::TelemetrySource;

pub struct TaskHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.join.await;
    }
}

/// Spawns the OTA poller if `state.ota` is configured. Polls at the
/// node's configured health-check cadence, per §5's "OTA poller when
/// enabled" description.
pub fn spawn_ota_poller(state: Arc<NodeState>) -> Option<TaskHandle> {
    let ota = state.ota.clone()?;
    let interval = Duration::from_secs(state.config.health_check_interval_secs.max(1));
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let updated = ota.check_for_updates().await;
                    if updated {
                        info!("model update applied");
                    }
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    Some(TaskHandle { stop_tx, join })
}

/// Spawns the adaptive security loop: samples telemetry, runs pattern
/// and immune detection, fuses the two into a single assessment, and
/// generates and executes a graded response (C6 → C7 → C8, per §4.6
/// through §4.8).
pub fn spawn_security_monitor(
    state: Arc<NodeState>,
    telemetry_source: Arc<dyn TelemetrySource>,
    interval: Duration,
) -> TaskHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    run_security_tick(&state, telemetry_source.as_ref()).await;
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    TaskHandle { stop_tx, join }
}

#[instrument(skip(state, telemetry_source))]
async fn run_security_tick(state: &Arc<NodeState>, telemetry_source: &dyn TelemetrySource) {
    let telemetry = telemetry_source.sample().await;
    let now = crate::state::now_unix_seconds();

    let pattern_assessment = state.threat.detect(&telemetry).await;
    let antigens = state.immune.detect_antigens(&telemetry, now).await;

    let best_antigen = antigens.iter().max_by(|a, b| {
        a.confidence
            .partial_cmp(&b.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let (score, threat_type, immune_generated) = match best_antigen {
        Some(antigen) if antigen.confidence > pattern_assessment.score => {
            (antigen.confidence, antigen.threat_type.clone(), true)
        }
        _ => (
            pattern_assessment.score,
            pattern_assessment.threat_type.clone(),
            false,
        ),
    };

    if score < state.response.threat_threshold() {
        return;
    }

    let response = state
        .response
        .generate(score, Some(threat_type.as_str()), immune_generated, now);

    let result = atous_domain_response::execute(&response);
    warn!(
        score,
        threat_type = %threat_type,
        actions = result.actions_executed.len(),
        "adaptive response executed"
    );

    let outcome = ResponseOutcome {
        threat_stopped: result.success,
        false_positive: false,
        response_time_secs: (result.execution_time_ms as f64) / 1000.0,
        collateral_damage: 0.0,
    };

    let entry = state.response.learn_from_outcome(&response, &outcome, now);
    info!(effectiveness = entry.effectiveness, "response outcome recorded");

    if immune_generated {
        for cell in state.immune.cells_snapshot() {
            if cell.specialization == threat_type {
                state.immune.learn_by_id(&cell.cell_id, result.success);
            }
        }
        let _ = state.immune.form_memory(&response.action, result.success, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NodeState;
    use crate::telemetry_source::NullTelemetrySource;
    use atous_domain_models::NodeConfig;

    #[tokio::test]
    async fn ota_poller_is_not_spawned_without_an_aggregator() {
        let state = Arc::new(NodeState::build(NodeConfig::default()).unwrap());
        assert!(spawn_ota_poller(state).is_none());
    }

    #[tokio::test]
    async fn security_monitor_starts_and_stops_cleanly() {
        let state = Arc::new(NodeState::build(NodeConfig::default()).unwrap());
        let task = spawn_security_monitor(state, Arc::new(NullTelemetrySource), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        task.stop().await;
    }

    #[tokio::test]
    async fn security_tick_with_null_telemetry_does_not_panic() {
        let state = Arc::new(NodeState::build(NodeConfig::default()).unwrap());
        run_security_tick(&state, &NullTelemetrySource).await;
    }
}
