// [libs/core/membership/src/monitor.rs]
/*!
 * =================================================================
 * APARATO: MONITOR DE MEMBRESÍA Y SALUD DE PARES (V1.0 - CHURN GUARD)
 * CLASIFICACIÓN: CORE DOMAIN (ESTRATO L2)
 * RESPONSABILIDAD: DETECCIÓN DE FALLOS DE PARES Y DISPARO DE
 * REDISTRIBUCIÓN DE SHARDS Y SERVICIOS TRAS LA CAÍDA DE UN NODO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * Un tick por `health_check_interval`: sondea cada par activo, mueve
 * los que no responden al conjunto de fallidos y entrega la lista de
 * sobrevivientes al motor de sharding (C5); luego vuelve a sondear
 * los pares fallidos que superaron su timeout de recuperación y
 * restaura a los que contestan.
 *
 * # Mathematical Proof (Shard Conservation):
 * Sea T el total de shards antes de que un nodo falle. `redistribute`
 * remueve exactamente los shards del nodo fallido y los reparte uno a
 * uno sobre los sobrevivientes vía módulo, sin descartar ni duplicar
 * ninguno; por lo tanto el total de shards tras la redistribución
 * sigue siendo T mientras exista al menos un sobreviviente.
 * =================================================================
 */

use async_trait::async_trait;
use atous_core_sharding::ShardingEngine;
use atous_domain_models::PeerHealth;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

use crate::probe::PeerProbe;

const MAX_FAILURE_HISTORY: usize = 1000;
const RECENT_FAILURE_WINDOW_SECS: u64 = 3600;
const PURGE_INTERVAL: Duration = Duration::from_secs(3600);
const FAILURE_HISTORY_MAX_AGE_SECS: u64 = 24 * 3600;

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

#[derive(Debug, Clone)]
struct FailureEntry {
    node_id: String,
    failed_at: u64,
}

#[derive(Debug, Clone)]
pub struct HealthMetrics {
    pub active_nodes: usize,
    pub failed_nodes: usize,
    pub total_nodes: usize,
    pub uptime_secs: u64,
    pub recovery_rate: f64,
    pub health_check_interval_secs: u64,
    pub node_health: HashMap<String, PeerHealth>,
}

/// Background health monitor for a peer set, with failure-triggered
/// redistribution handed off to [`ShardingEngine`].
pub struct MembershipMonitor {
    active: RwLock<HashMap<String, PeerHealth>>,
    failed: RwLock<HashMap<String, PeerHealth>>,
    failure_history: tokio::sync::Mutex<VecDeque<FailureEntry>>,
    last_purge: StdMutex<Instant>,
    started_at: StdMutex<Option<Instant>>,
    health_check_interval: Duration,
    recovery_timeout: Duration,
    probe: Arc<dyn PeerProbe>,
    sharding: Arc<ShardingEngine>,
    stop_tx: StdMutex<Option<watch::Sender<bool>>>,
    task_handle: StdMutex<Option<JoinHandle<()>>>,
}

impl MembershipMonitor {
    pub fn new(
        health_check_interval: Duration,
        recovery_timeout: Duration,
        probe: Arc<dyn PeerProbe>,
        sharding: Arc<ShardingEngine>,
    ) -> Self {
        Self {
            active: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashMap::new()),
            failure_history: tokio::sync::Mutex::new(VecDeque::new()),
            last_purge: StdMutex::new(Instant::now()),
            started_at: StdMutex::new(None),
            health_check_interval,
            recovery_timeout,
            probe,
            sharding,
            stop_tx: StdMutex::new(None),
            task_handle: StdMutex::new(None),
        }
    }

    pub async fn add_node(&self, node_id: &str) {
        let now = now_unix_seconds();
        self.active
            .write()
            .await
            .insert(node_id.to_string(), PeerHealth::new(node_id, now));
        self.failed.write().await.remove(node_id);
    }

    /// Graceful exit: treated identically to a detected failure so shards
    /// and services still get redistributed off the departing node.
    pub async fn remove_node(&self, node_id: &str) {
        let now = now_unix_seconds();
        self.mark_failed(node_id, now).await;
    }

    pub async fn get_health_metrics(&self) -> HealthMetrics {
        let recovery_rate = self.recovery_rate().await;
        let active = self.active.read().await;
        let failed = self.failed.read().await;

        let mut node_health = HashMap::with_capacity(active.len() + failed.len());
        node_health.extend(active.iter().map(|(k, v)| (k.clone(), v.clone())));
        node_health.extend(failed.iter().map(|(k, v)| (k.clone(), v.clone())));

        let uptime_secs = self
            .started_at
            .lock()
            .expect("started_at lock poisoned")
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);

        HealthMetrics {
            active_nodes: active.len(),
            failed_nodes: failed.len(),
            total_nodes: active.len() + failed.len(),
            uptime_secs,
            recovery_rate,
            health_check_interval_secs: self.health_check_interval.as_secs(),
            node_health,
        }
    }

    /// Starts the periodic health-check task if it isn't already running.
    /// Idempotent: a second call while already running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut handle_guard = self.task_handle.lock().expect("task_handle lock poisoned");
        if handle_guard.is_some() {
            return;
        }

        *self.started_at.lock().expect("started_at lock poisoned") = Some(Instant::now());

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let this = Arc::clone(self);
        let interval = self.health_check_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        this.run_tick().await;
                    }
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        *handle_guard = Some(handle);
        *self.stop_tx.lock().expect("stop_tx lock poisoned") = Some(stop_tx);
    }

    /// Signals the tick loop to stop and waits for it to exit. Returns
    /// promptly regardless of where in its interval the loop currently is.
    /// Idempotent: a second call after the task has already stopped is a no-op.
    pub async fn stop(&self) {
        let stop_tx = self.stop_tx.lock().expect("stop_tx lock poisoned").take();
        if let Some(tx) = stop_tx {
            let _ = tx.send(true);
        }

        let handle = self.task_handle.lock().expect("task_handle lock poisoned").take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    async fn run_tick(&self) {
        let now = now_unix_seconds();
        self.probe_active_peers(now).await;
        self.probe_failed_peers(now).await;
        self.maybe_purge_history(now).await;
    }

    async fn probe_active_peers(&self, now: u64) {
        let node_ids: Vec<String> = self.active.read().await.keys().cloned().collect();
        for node_id in node_ids {
            if self.probe.probe(&node_id).await {
                if let Some(health) = self.active.write().await.get_mut(&node_id) {
                    health.last_seen = now;
                }
            } else {
                self.mark_failed(&node_id, now).await;
            }
        }
    }

    async fn probe_failed_peers(&self, now: u64) {
        let due: Vec<String> = {
            let failed = self.failed.read().await;
            failed
                .iter()
                .filter(|(_, health)| now.saturating_sub(health.last_seen) > self.recovery_timeout.as_secs())
                .map(|(node_id, _)| node_id.clone())
                .collect()
        };

        for node_id in due {
            if self.probe.probe(&node_id).await {
                let mut failed = self.failed.write().await;
                if let Some(mut health) = failed.remove(&node_id) {
                    drop(failed);
                    health.is_active = true;
                    health.last_seen = now;
                    self.active.write().await.insert(node_id.clone(), health);
                    info!(node_id = node_id.as_str(), "peer recovered");
                }
            }
        }
    }

    async fn mark_failed(&self, node_id: &str, now: u64) {
        let mut active = self.active.write().await;
        let Some(mut health) = active.remove(node_id) else {
            return;
        };
        drop(active);

        health.is_active = false;
        health.failure_count += 1;
        health.last_seen = now;
        self.failed.write().await.insert(node_id.to_string(), health);

        {
            let mut history = self.failure_history.lock().await;
            if history.len() == MAX_FAILURE_HISTORY {
                history.pop_front();
            }
            history.push_back(FailureEntry {
                node_id: node_id.to_string(),
                failed_at: now,
            });
        }

        let survivors: Vec<String> = self.active.read().await.keys().cloned().collect();
        self.sharding.redistribute(node_id, &survivors);
        self.sharding.reassign(node_id, &survivors);
        info!(node_id, survivor_count = survivors.len(), "peer marked failed");
    }

    async fn recovery_rate(&self) -> f64 {
        let now = now_unix_seconds();
        let window_start = now.saturating_sub(RECENT_FAILURE_WINDOW_SECS);

        let recent: Vec<String> = {
            let history = self.failure_history.lock().await;
            history
                .iter()
                .filter(|e| e.failed_at >= window_start)
                .map(|e| e.node_id.clone())
                .collect()
        };

        if recent.is_empty() {
            return 0.0;
        }

        let active = self.active.read().await;
        let recovered = recent.iter().filter(|id| active.contains_key(*id)).count();
        recovered as f64 / recent.len() as f64
    }

    async fn maybe_purge_history(&self, now: u64) {
        let should_purge = {
            let last_purge = self.last_purge.lock().expect("last_purge lock poisoned");
            last_purge.elapsed() >= PURGE_INTERVAL
        };
        if !should_purge {
            return;
        }

        let cutoff = now.saturating_sub(FAILURE_HISTORY_MAX_AGE_SECS);
        let mut history = self.failure_history.lock().await;
        history.retain(|e| e.failed_at >= cutoff);
        *self.last_purge.lock().expect("last_purge lock poisoned") = Instant::now();
    }
}

#[async_trait]
impl PeerProbe for MembershipMonitor {
    /// Allows a monitor to be nested as a probe source in tests; delegates
    /// to membership rather than transport.
    async fn probe(&self, node_id: &str) -> bool {
        self.active.read().await.contains_key(node_id)
    }
}
