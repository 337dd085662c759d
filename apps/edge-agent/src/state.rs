// [apps/edge-agent/src/state.rs]
/*!
 * =================================================================
 * APARATO: CONTENEDOR DE ESTADO DEL NODO (V1.0 - LOCK ORDER GUARD)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1)
 * RESPONSABILIDAD: ENSAMBLAJE Y EXPOSICIÓN DE LOS COMPONENTES
 * COMPARTIDOS DEL NODO BAJO UN ORDEN DE ADQUISICIÓN DE LOCKS FIJO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * Cada componente es un handle `Arc` con su propia sincronización
 * interna. Todo código que toque más de un componente en un mismo
 * paso lógico debe adquirirlos en el orden canónico
 * C4 -> C5 -> C8 -> C7 -> C6 -> C3 -> C2 -> C1 (membresía, sharding,
 * respuesta, inmune, amenaza, lora, ota, integridad) para evitar
 * inversiones de orden de lock; los accesores de `NodeState` están
 * agrupados en ese mismo orden por la razón anterior.
 * =================================================================
 */

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use atous_core_lora::LoraController;
use atous_core_membership::{AlwaysReachableProbe, MembershipMonitor};
use atous_core_ota::OtaEngine;
use atous_core_sharding::ShardingEngine;
use atous_domain_immune::ImmuneEngine;
use atous_domain_models::NodeConfig;
use atous_domain_response::ResponseEngine;
use atous_domain_threat::ThreatDetector;
use atous_infra_aggregator_client::AggregatorClient;
use atous_infra_oracle_client::OracleClient;
use atous_infra_radio_adapter::NullRadioAdapter;

use crate::error::StateError;

pub fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

pub struct NodeState {
    pub config: NodeConfig,

    // C4
    pub membership: Arc<MembershipMonitor>,
    // C5
    pub sharding: Arc<ShardingEngine>,
    // C8
    pub response: Arc<ResponseEngine>,
    // C7
    pub immune: Arc<ImmuneEngine>,
    // C6
    pub threat: Arc<ThreatDetector>,
    // C3
    pub lora: Arc<LoraController>,
    // C2 (only present when an aggregator endpoint is configured)
    pub ota: Option<Arc<OtaEngine>>,
}

impl NodeState {
    pub fn build(config: NodeConfig) -> Result<Self, StateError> {
        config.validate()?;

        let now = now_unix_seconds();

        let sharding = Arc::new(ShardingEngine::new());
        let membership = Arc::new(MembershipMonitor::new(
            std::time::Duration::from_secs(config.health_check_interval_secs),
            std::time::Duration::from_secs(config.recovery_timeout_secs),
            Arc::new(AlwaysReachableProbe),
            Arc::clone(&sharding),
        ));

        let response = Arc::new(ResponseEngine::new(config.response_threshold, config.memory_size));

        let oracle = config
            .llm_endpoint
            .as_ref()
            .map(|endpoint| Arc::new(OracleClient::new(endpoint.clone(), std::time::Duration::from_secs(config.timeout_secs))));

        let immune = Arc::new(ImmuneEngine::new(
            config.immune_cells_count,
            config.memory_cells_count,
            oracle.clone(),
            now,
        ));

        let threat = Arc::new(ThreatDetector::with_known_patterns(oracle.clone(), config.threat_threshold, now));

        let lora_config = build_lora_config(&config).map_err(|reason| StateError::Build {
            component: "lora-controller",
            reason,
        })?;
        let optimization_mode = config.optimization_mode().map_err(|e| StateError::Build {
            component: "lora-controller",
            reason: e.to_string(),
        })?;
        let lora = Arc::new(LoraController::new(lora_config, optimization_mode, Arc::new(NullRadioAdapter)));

        let ota = match &config.aggregator_url {
            Some(base_url) => {
                let aggregator = AggregatorClient::new(base_url.clone(), std::time::Duration::from_secs(config.timeout_secs))
                    .with_chunk_size(config.chunk_size)
                    .with_max_retries(config.max_retries);
                let engine = OtaEngine::new(&config, aggregator).map_err(|e| StateError::Build {
                    component: "ota-engine",
                    reason: e.to_string(),
                })?;
                Some(Arc::new(engine))
            }
            None => None,
        };

        Ok(Self {
            config,
            membership,
            sharding,
            response,
            immune,
            threat,
            lora,
            ota,
        })
    }
}

fn build_lora_config(config: &NodeConfig) -> Result<atous_domain_models::LoraConfig, String> {
    let region = config.region().map_err(|e| e.to_string())?;
    let coding_rate = config.coding_rate().map_err(|e| e.to_string())?;
    atous_domain_models::LoraConfig::new(
        config.spreading_factor,
        config.tx_power,
        config.bandwidth,
        coding_rate,
        region,
    )
    .map_err(|e| e.to_string())
}
