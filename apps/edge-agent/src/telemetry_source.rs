// [apps/edge-agent/src/telemetry_source.rs]
//! =================================================================
//! APARATO: SEAM DE INGESTA DE TELEMETRÍA (V1.0)
//! RESPONSABILIDAD: PUNTO DE EXTENSIÓN PARA UNA FUENTE DE TELEMETRÍA
//! ESPECÍFICA DEL DESPLIEGUE, CON UN NO-OP POR DEFECTO
//! =================================================================

use async_trait::async_trait;
use atous_domain_models::Telemetry;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn sample(&self) -> Telemetry;
}

pub struct NullTelemetrySource;

#[async_trait]
impl TelemetrySource for NullTelemetrySource {
    async fn sample(&self) -> Telemetry {
        Telemetry::default()
    }
}
