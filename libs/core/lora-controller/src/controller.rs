// [libs/core/lora-controller/src/controller.rs]
/*!
 * =================================================================
 * APARATO: CONTROLADOR ADAPTATIVO LORA (V1.0 - CHANNEL FEEDBACK LOOP)
 * CLASIFICACIÓN: CORE DOMAIN (ESTRATO L2)
 * RESPONSABILIDAD: AJUSTE DINÁMICO DE SPREADING FACTOR, POTENCIA DE
 * TRANSMISIÓN Y ANCHO DE BANDA A PARTIR DE MÉTRICAS DE CANAL
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. BOUNDED HISTORY: La ventana de métricas es un anillo acotado;
 *    el controlador nunca retiene más muestras que su capacidad fija.
 * 2. ORDERED POLICY: Pérdida de paquetes primero, SNR después; a lo
 *    sumo un parámetro cambia por llamada a `adjust_parameters`.
 * 3. HARDWARE OPTIONAL: Todo cambio aceptado se espeja al adaptador
 *    de radio si hay uno conectado, o simplemente se registra si no.
 *
 * # Mathematical Proof (EMA Convergence):
 * La media móvil exponencial `ema' = 0.7*ema + 0.3*x` es una
 * combinación convexa, por lo que `ema` permanece siempre dentro del
 * rango de los valores de pérdida de paquetes observados, y pondera
 * geométricamente las muestras antiguas con factor 0.7^n, de modo que
 * la influencia de una muestra aislada decae a cero.
 * =================================================================
 */

use crate::summary::{summarize, PerformanceSummary};
use atous_domain_models::config::OptimizationMode;
use atous_domain_models::{LoraConfig, LoraMetric};
use atous_infra_radio_adapter::RadioAdapter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

const METRIC_RING_CAPACITY: usize = 100;
const MIN_ADJUST_INTERVAL: Duration = Duration::from_secs(30);
const MIN_METRICS_FOR_ADJUST: usize = 5;
const TARGET_PACKET_LOSS: f64 = 0.05;
const TARGET_SNR: f64 = -7.5;

struct MetricsState {
    ring: VecDeque<LoraMetric>,
    ema_packet_loss: Option<f64>,
}

pub struct LoraController {
    config: RwLock<LoraConfig>,
    optimization_mode: RwLock<OptimizationMode>,
    metrics: Mutex<MetricsState>,
    last_change: Mutex<Option<Instant>>,
    radio: Arc<dyn RadioAdapter>,
}

impl LoraController {
    pub fn new(
        config: LoraConfig,
        optimization_mode: OptimizationMode,
        radio: Arc<dyn RadioAdapter>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            optimization_mode: RwLock::new(optimization_mode),
            metrics: Mutex::new(MetricsState {
                ring: VecDeque::with_capacity(METRIC_RING_CAPACITY),
                ema_packet_loss: None,
            }),
            last_change: Mutex::new(None),
            radio,
        }
    }

    pub fn config(&self) -> LoraConfig {
        self.config.read().expect("lora config lock poisoned").clone()
    }

    /// Appends a channel sample and updates the packet-loss EMA
    /// (`ema = 0.7*prior + 0.3*new`).
    pub fn log_metrics(&self, rssi: f64, snr: f64, packet_loss: f64, timestamp: u64) {
        let metric = LoraMetric {
            rssi,
            snr,
            packet_loss,
            timestamp,
        };

        let mut state = self.metrics.lock().expect("metrics lock poisoned");
        state.ema_packet_loss = Some(match state.ema_packet_loss {
            Some(prior) => 0.7 * prior + 0.3 * packet_loss,
            None => packet_loss,
        });

        if state.ring.len() == METRIC_RING_CAPACITY {
            state.ring.pop_front();
        }
        state.ring.push_back(metric);
    }

    /// Applies the ordered adjustment policy. Returns whether any
    /// parameter actually changed.
    pub fn adjust_parameters(&self) -> bool {
        {
            let last_change = self.last_change.lock().expect("last_change lock poisoned");
            if let Some(last) = *last_change {
                if last.elapsed() < MIN_ADJUST_INTERVAL {
                    return false;
                }
            }
        }

        let (ema_packet_loss, latest_snr) = {
            let state = self.metrics.lock().expect("metrics lock poisoned");
            if state.ring.len() < MIN_METRICS_FOR_ADJUST {
                return false;
            }
            let ema = state.ema_packet_loss.unwrap_or(0.0);
            let snr = state.ring.back().map(|m| m.snr).unwrap_or(0.0);
            (ema, snr)
        };

        let mut changed = false;
        let mut config = self.config.write().expect("lora config lock poisoned");

        if ema_packet_loss > TARGET_PACKET_LOSS && config.spreading_factor < 12 {
            config.spreading_factor += 1;
            changed = true;
            let _ = self.radio.set_spreading_factor(config.spreading_factor);
        } else if latest_snr > TARGET_SNR && config.tx_power > 5 {
            let region_max = config.region.limits().max_tx_power;
            config.tx_power = (config.tx_power - 2).max(5).min(region_max);
            changed = true;
            let _ = self.radio.set_tx_power(config.tx_power);
        }

        if changed {
            let mode = *self.optimization_mode.read().expect("optimization mode lock poisoned");
            match mode {
                OptimizationMode::Energy => {
                    config.bandwidth = (config.bandwidth * 2).min(500_000);
                    let _ = self.radio.set_bandwidth(config.bandwidth);
                }
                OptimizationMode::Reliability => {
                    config.bandwidth = (config.bandwidth / 2).max(125_000);
                    let _ = self.radio.set_bandwidth(config.bandwidth);
                }
                OptimizationMode::Balanced => {}
            }

            config.clamp_tx_power();
            drop(config);
            *self.last_change.lock().expect("last_change lock poisoned") = Some(Instant::now());
            info!("lora parameters adjusted");
        }

        changed
    }

    pub fn set_optimization_mode(&self, mode: OptimizationMode) {
        *self.optimization_mode.write().expect("optimization mode lock poisoned") = mode;
    }

    pub fn reset_metrics(&self) {
        let mut state = self.metrics.lock().expect("metrics lock poisoned");
        state.ring.clear();
        state.ema_packet_loss = None;
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        summarize(&self.config())
    }
}
