// [libs/domain/models/src/lib.rs]
//! =================================================================
//! APARATO: DTOS COMPARTIDOS DEL NODO (V1.0)
//! CLASIFICACIÓN: DOMAIN DTOS (ESTRATO L2)
//! RESPONSABILIDAD: TIPOS DE DATOS PUROS COMPARTIDOS POR TODAS LAS
//! CRATES DE COMPONENTES DEL AGENTE
//! =================================================================
//!
//! Todo tipo aquí es un contenedor de datos simple: la construcción
//! valida invariantes cuando es barato hacerlo, pero el comportamiento
//! (digerir, ajustar, redistribuir, ...) vive en la crate dueña de
//! cada entidad.

pub mod config;
pub mod error;
pub mod immune;
pub mod lora;
pub mod membership;
pub mod model;
pub mod response;
pub mod sharding;
pub mod telemetry;
pub mod threat;

pub use config::NodeConfig;
pub use error::ConfigError;
pub use immune::{Antigen, CellType, ImmuneCell};
pub use lora::{CodingRate, LoraConfig, LoraMetric, Region};
pub use membership::PeerHealth;
pub use model::{ModelArtifact, VersionHistoryEntry};
pub use response::{AdaptiveResponse, LearningEntry, ResponseAction};
pub use sharding::{ServiceAssignments, ShardAssignments};
pub use telemetry::Telemetry;
pub use threat::ThreatPattern;
