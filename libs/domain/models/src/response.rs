// [libs/domain/models/src/response.rs]
//! =================================================================
//! APARATO: DTOS DE RESPUESTA ADAPTATIVA (V1.0)
//! RESPONSABILIDAD: RESPUESTAS GRADUADAS Y SUS RESULTADOS DE
//! APRENDIZAJE
//! =================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseAction {
    BlockIp,
    RateLimit,
    AlertAdmin,
    Monitor,
    IsolateHost,
    EnableDdosProtection,
    ScaleResources,
    ScanSystem,
    QuarantineSuspicious,
    EncryptSensitiveData,
    AuditAccess,
}

impl ResponseAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResponseAction::BlockIp => "block_ip",
            ResponseAction::RateLimit => "rate_limit",
            ResponseAction::AlertAdmin => "alert_admin",
            ResponseAction::Monitor => "monitor",
            ResponseAction::IsolateHost => "isolate_host",
            ResponseAction::EnableDdosProtection => "enable_ddos_protection",
            ResponseAction::ScaleResources => "scale_resources",
            ResponseAction::ScanSystem => "scan_system",
            ResponseAction::QuarantineSuspicious => "quarantine_suspicious",
            ResponseAction::EncryptSensitiveData => "encrypt_sensitive_data",
            ResponseAction::AuditAccess => "audit_access",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveResponse {
    pub response_id: String,
    pub action: ResponseAction,
    /// Additional actions folded in for immune-generated responses
    /// (§4.8's per-threat-family augmentation).
    pub additional_actions: Vec<ResponseAction>,
    pub priority: u8,
    pub parameters: HashMap<String, String>,
    pub timestamp: u64,
}

/// A single learning-ring entry (bounded to `memory_size`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningEntry {
    pub response_id: String,
    pub response_type: String,
    pub effectiveness: f64,
    pub outcome_summary: String,
    pub timestamp: u64,
}
