// [apps/edge-agent/src/main.rs]
/*!
 * =================================================================
 * APARATO: EDGE AGENT BOOTSTRAP (V1.0 - NODE ENTRYPOINT)
 * CLASIFICACIÓN: APPLICATION ENTRYPOINT (ESTRATO L1)
 * RESPONSABILIDAD: ARRANQUE DEL NODO, ENSAMBLAJE DE COMPONENTES Y
 * APAGADO ORDENADO ANTE UNA SEÑAL DE TERMINACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE ASSEMBLY POINT: `NodeState::build` es la única puerta de
 *    entrada para construir los componentes del nodo; `main` no conoce
 *    el orden interno de dependencias entre ellos.
 * 2. GRACEFUL UNWIND: `ctrl_c` detiene membresía, monitor de seguridad
 *    y, si existe, el poller OTA, en ese orden, antes de salir.
 * 3. OBSERVABILITY FIRST: `init_tracing` se instala antes de tocar
 *    configuración, de modo que un fallo temprano siempre queda logeado.
 * =================================================================
 */

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use atous_edge_agent::{load_config, spawn_ota_poller, spawn_security_monitor, CliArgs, NodeState, NullTelemetrySource};
use clap::Parser;
use tracing::{info, warn};

const SECURITY_TICK_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    atous_shared_telemetry::init_tracing("atous-edge-agent");

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    info!(node_id = %config.node_id, region = %config.region, "starting edge agent");

    let state = Arc::new(NodeState::build(config)?);

    state.membership.start();
    let ota_task = spawn_ota_poller(Arc::clone(&state));
    let security_task = spawn_security_monitor(
        Arc::clone(&state),
        Arc::new(NullTelemetrySource),
        SECURITY_TICK_INTERVAL,
    );

    tokio::signal::ctrl_c().await.ok();
    warn!("termination requested, shutting down");

    state.membership.stop().await;
    security_task.stop().await;
    if let Some(task) = ota_task {
        task.stop().await;
    }

    info!("edge agent shutdown complete");
    Ok(())
}
