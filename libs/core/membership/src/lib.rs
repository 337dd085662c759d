// [libs/core/membership/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DE MEMBRESÍA (V1.0 - COMPONENTE C4)
//! RESPONSABILIDAD: MONITOREO DE SALUD DE PARES Y REDISTRIBUCIÓN
//! DISPARADA POR CHURN
//! =================================================================

pub mod monitor;
pub mod probe;

pub use monitor::{HealthMetrics, MembershipMonitor};
pub use probe::{AlwaysReachableProbe, PeerProbe};
