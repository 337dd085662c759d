// [apps/edge-agent/src/error.rs]
//! =================================================================
//! APARATO: ERRORES DE ENSAMBLAJE DEL NODO (V1.0)
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS AL CONSTRUIR `NodeState`
//! =================================================================
use atous_domain_models::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build {component}: {reason}")]
    Build { component: &'static str, reason: String },
}
