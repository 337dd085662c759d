// [libs/core/membership/src/probe.rs]
//! =================================================================
//! APARATO: SEAM DE SONDEO DE ALCANZABILIDAD (V1.0)
//! RESPONSABILIDAD: ABSTRACCIÓN DEL TRANSPORTE DE SONDEO PARA QUE EL
//! MONITOR SEA IDÉNTICO CON O SIN RED REAL
//! =================================================================

use async_trait::async_trait;

#[async_trait]
pub trait PeerProbe: Send + Sync {
    async fn probe(&self, node_id: &str) -> bool;
}

/// No transport configured: every peer is assumed reachable. Mirrors
/// the radio adapter's "absence degrades to a no-op" pattern.
pub struct AlwaysReachableProbe;

#[async_trait]
impl PeerProbe for AlwaysReachableProbe {
    async fn probe(&self, _node_id: &str) -> bool {
        true
    }
}
