// [libs/domain/models/src/membership.rs]
//! =================================================================
//! APARATO: DTO DE SALUD DE PARES (V1.0)
//! RESPONSABILIDAD: ESTADO DE SALUD RASTREADO POR EL MONITOR DE
//! MEMBRESÍA
//! =================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerHealth {
    pub node_id: String,
    pub last_seen: u64,
    pub response_time: f64,
    pub failure_count: u32,
    pub is_active: bool,
}

impl PeerHealth {
    pub fn new(node_id: impl Into<String>, now: u64) -> Self {
        Self {
            node_id: node_id.into(),
            last_seen: now,
            response_time: 0.0,
            failure_count: 0,
            is_active: true,
        }
    }
}
