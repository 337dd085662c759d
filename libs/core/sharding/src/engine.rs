// [libs/core/sharding/src/engine.rs]
//! =================================================================
//! APARATO: MOTOR DE SHARDING Y REASIGNACIÓN (V1.0)
//! RESPONSABILIDAD: DISTRIBUCIÓN DETERMINISTA DE SHARDS Y SERVICIOS
//! TRAS LA CAÍDA DE UN NODO
//! =================================================================
//!
//! No posee noción propia de liveness: el monitor de membresía (C4)
//! decide que un nodo falló y entrega el conjunto de sobrevivientes
//! activos, serializado a través de su propio bucle de un tick, de
//! modo que redistribución y reasignación para un fallo siempre
//! terminan antes de la siguiente ronda de ping.

use atous_domain_models::{ServiceAssignments, ShardAssignments};
use std::sync::Mutex;
use tracing::{info, warn};

struct State {
    shards: ShardAssignments,
    services: ServiceAssignments,
}

pub struct ShardingEngine {
    state: Mutex<State>,
}

impl Default for ShardingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardingEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                shards: ShardAssignments::new(),
                services: ServiceAssignments::new(),
            }),
        }
    }

    pub fn set_node_shards(&self, node_id: &str, shards: Vec<String>) {
        self.state
            .lock()
            .expect("sharding state lock poisoned")
            .shards
            .insert(node_id.to_string(), shards);
    }

    pub fn assign_service(&self, service_id: &str, node_id: &str) {
        self.state
            .lock()
            .expect("sharding state lock poisoned")
            .services
            .insert(service_id.to_string(), node_id.to_string());
    }

    pub fn shards_snapshot(&self) -> ShardAssignments {
        self.state.lock().expect("sharding state lock poisoned").shards.clone()
    }

    pub fn services_snapshot(&self) -> ServiceAssignments {
        self.state
            .lock()
            .expect("sharding state lock poisoned")
            .services
            .clone()
    }

    /// Removes `failed_node`'s shard list and distributes it round-robin
    /// across `active_nodes` in sorted (deterministic) order. Every
    /// removed shard is placed on exactly one survivor, preserving the
    /// total shard count (invariant I5).
    pub fn redistribute(&self, failed_node: &str, active_nodes: &[String]) {
        let mut state = self.state.lock().expect("sharding state lock poisoned");
        let removed_shards = state.shards.remove(failed_node).unwrap_or_default();

        let mut survivors: Vec<String> = active_nodes.to_vec();
        survivors.sort();
        for node in &survivors {
            state.shards.entry(node.clone()).or_default();
        }

        if survivors.is_empty() {
            if !removed_shards.is_empty() {
                warn!(
                    failed_node,
                    shard_count = removed_shards.len(),
                    "no active survivors to redistribute shards onto"
                );
            }
            return;
        }

        for (i, shard) in removed_shards.into_iter().enumerate() {
            let target = &survivors[i % survivors.len()];
            state.shards.entry(target.clone()).or_default().push(shard);
        }

        info!(failed_node, survivor_count = survivors.len(), "shards redistributed");
    }

    /// Reassigns every service owned by `failed_node` to the
    /// least-loaded survivor (ties broken by node id for determinism).
    pub fn reassign(&self, failed_node: &str, active_nodes: &[String]) {
        let mut state = self.state.lock().expect("sharding state lock poisoned");
        let affected: Vec<String> = state
            .services
            .iter()
            .filter(|(_, owner)| owner.as_str() == failed_node)
            .map(|(service_id, _)| service_id.clone())
            .collect();

        for service_id in affected {
            let Some(new_owner) = least_loaded(&state, active_nodes) else {
                warn!(service_id, "no active survivor available to reassign service to");
                continue;
            };
            state.services.insert(service_id, new_owner);
        }
    }

    /// Ids whose shard list contains the placeholder corruption token.
    pub fn detect_byzantine(&self) -> Vec<String> {
        let state = self.state.lock().expect("sharding state lock poisoned");
        state
            .shards
            .iter()
            .filter(|(_, shards)| shards.iter().any(|s| s.contains("corrupted")))
            .map(|(node_id, _)| node_id.clone())
            .collect()
    }

    /// Approves iff `active_count >= max(2, ceil(quorum * total))`.
    pub fn reach_consensus(&self, decision: &str, quorum: f64, active_count: usize, total: usize) -> bool {
        let required = ((quorum * total as f64).ceil() as usize).max(2);
        let approved = active_count >= required;
        info!(decision, active_count, required, approved, "consensus check");
        approved
    }
}

fn least_loaded(state: &State, active_nodes: &[String]) -> Option<String> {
    active_nodes
        .iter()
        .min_by_key(|node| {
            let shard_load = state.shards.get(*node).map(|v| v.len()).unwrap_or(0);
            let service_load = state.services.values().filter(|owner| owner.as_str() == node.as_str()).count();
            (shard_load + service_load, (*node).clone())
        })
        .cloned()
}
