// [libs/shared/telemetry/src/lib.rs]
/*!
 * =================================================================
 * APARATO: INICIALIZADOR DE TRAZAS COMPARTIDO (V1.0 - PANIC SHIELD)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4)
 * RESPONSABILIDAD: CONFIGURACIÓN DE TRACING Y CAPTURA DE PÁNICOS PARA
 * TODOS LOS BINARIOS DEL WORKSPACE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DUAL MODE: Builds de desarrollo emiten líneas compactas y
 *    coloreadas; builds de producción emiten JSON aplanado listo
 *    para ingesta por un colector de logs.
 * 2. PANIC VISIBILITY: Un hook de pánico global registra cualquier
 *    pánico vía `tracing` en lugar de solo imprimirlo a stderr, de
 *    modo que un pánico en una tarea de fondo (el ticker de
 *    membresía, el poller OTA, el monitor de seguridad) siempre
 *    queda visible en el mismo sumidero que el resto de los logs.
 *
 * # Mathematical Proof (Panic Observability):
 * El hook de pánico se instala una sola vez, antes de que cualquier
 * tarea en segundo plano arranque, y permanece activo para el resto
 * del proceso; por lo tanto todo pánico que ocurra después queda
 * necesariamente capturado, sin ventana de exposición.
 * =================================================================
 */

use std::panic;
use tracing::{error, info, instrument};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber and panic hook for `service_name`.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
#[instrument(skip_all)]
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{service_name}={level},tower_http=warn,hyper=warn",
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .init();
    }

    let service = service_name.to_string();
    panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("non-string panic payload");

        error!(
            target: "panic",
            service = %service,
            location = %location,
            "thread panicked: {}",
            payload
        );
    }));

    info!(service = %service_name, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_does_not_panic_on_first_call() {
        init_tracing("telemetry-test");
        info!("smoke test line");
    }
}
