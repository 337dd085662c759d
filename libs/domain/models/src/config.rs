// [libs/domain/models/src/config.rs]
//! =================================================================
//! APARATO: SUPERFICIE DE CONFIGURACIÓN DEL NODO (V1.0)
//! RESPONSABILIDAD: STRUCT ÚNICA DESERIALIZABLE CON TODAS LAS OPCIONES
//! RECONOCIDAS, COMPARTIDA POR TODAS LAS CRATES DE COMPONENTES
//! =================================================================

use crate::error::ConfigError;
use crate::lora::{CodingRate, Region};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationMode {
    Balanced,
    Energy,
    Reliability,
}

impl FromStr for OptimizationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(OptimizationMode::Balanced),
            "energy" => Ok(OptimizationMode::Energy),
            "reliability" => Ok(OptimizationMode::Reliability),
            other => Err(ConfigError::InvalidOptimizationMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // Identity
    pub node_id: String,
    pub current_version: u64,

    // OTA (C2)
    pub model_path: String,
    pub backup_dir: String,
    pub verify_signatures: bool,
    pub verify_checksums: bool,
    pub max_rollback_versions: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub chunk_size: usize,

    // Radio (C3)
    pub region: String,
    pub spreading_factor: u8,
    pub tx_power: i32,
    pub bandwidth: u32,
    pub coding_rate: String,
    pub optimization_mode: String,

    // Membership (C4)
    pub health_check_interval_secs: u64,
    pub recovery_timeout_secs: u64,

    // Security core (C6/C7/C8)
    pub threat_threshold: f64,
    pub memory_size: usize,
    pub immune_cells_count: usize,
    pub memory_cells_count: usize,
    pub response_threshold: f64,
    pub learning_rate: f64,

    // External oracle (out of scope, interface-only)
    pub llm_endpoint: Option<String>,
    pub model_name: Option<String>,

    /// Base URL of the model aggregator. The OTA poller task is only
    /// scheduled when this is set (§5's "OTA poller when enabled").
    pub aggregator_url: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: "edge-node-0".to_string(),
            current_version: 0,
            model_path: "model.bin".to_string(),
            backup_dir: "backups".to_string(),
            verify_signatures: true,
            verify_checksums: true,
            max_rollback_versions: 3,
            timeout_secs: 30,
            max_retries: 3,
            chunk_size: 8192,
            region: "BR".to_string(),
            spreading_factor: 7,
            tx_power: 14,
            bandwidth: 125_000,
            coding_rate: "4/5".to_string(),
            optimization_mode: "balanced".to_string(),
            health_check_interval_secs: 300,
            recovery_timeout_secs: 600,
            threat_threshold: 0.7,
            memory_size: 1000,
            immune_cells_count: 100,
            memory_cells_count: 50,
            response_threshold: 0.5,
            learning_rate: 0.1,
            llm_endpoint: None,
            model_name: None,
            aggregator_url: None,
        }
    }
}

impl NodeConfig {
    pub fn region(&self) -> Result<Region, ConfigError> {
        Region::from_str(&self.region)
    }

    pub fn coding_rate(&self) -> Result<CodingRate, ConfigError> {
        CodingRate::from_str(&self.coding_rate)
    }

    pub fn optimization_mode(&self) -> Result<OptimizationMode, ConfigError> {
        OptimizationMode::from_str(&self.optimization_mode)
    }

    /// Validate every field eagerly so construction-time `ConfigError`s
    /// (per §7) surface before any component is built from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.region()?;
        self.coding_rate()?;
        self.optimization_mode()?;
        if self.node_id.is_empty() {
            return Err(ConfigError::MissingField("node_id"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(NodeConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_region() {
        let mut cfg = NodeConfig::default();
        cfg.region = "XX".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnsupportedRegion(_))
        ));
    }

    #[test]
    fn rejects_empty_node_id() {
        let mut cfg = NodeConfig::default();
        cfg.node_id = String::new();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingField("node_id")));
    }

    #[test]
    fn optimization_mode_parses_from_default() {
        let cfg = NodeConfig::default();
        assert_eq!(cfg.optimization_mode().unwrap(), OptimizationMode::Balanced);
    }
}
