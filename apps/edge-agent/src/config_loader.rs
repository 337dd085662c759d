// [apps/edge-agent/src/config_loader.rs]
//! =================================================================
//! APARATO: CARGADOR DE CONFIGURACIÓN (V1.0)
//! RESPONSABILIDAD: FUSIÓN DE ARCHIVO TOML OPCIONAL CON FLAGS DE CLI
//! Y VARIABLES DE ENTORNO EN UN `NodeConfig` FINAL
//! =================================================================

use atous_domain_models::{ConfigError, NodeConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atous-edge-agent", about = "Atous edge-node agent")]
pub struct CliArgs {
    /// Path to a TOML file providing the base configuration.
    #[arg(long, env = "ATOUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ATOUS_NODE_ID")]
    pub node_id: Option<String>,

    #[arg(long, env = "ATOUS_MODEL_PATH")]
    pub model_path: Option<String>,

    #[arg(long, env = "ATOUS_BACKUP_DIR")]
    pub backup_dir: Option<String>,

    #[arg(long, env = "ATOUS_REGION")]
    pub region: Option<String>,

    #[arg(long, env = "ATOUS_AGGREGATOR_URL")]
    pub aggregator_url: Option<String>,

    #[arg(long, env = "ATOUS_LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,
}

impl CliArgs {
    fn apply_overrides(&self, mut config: NodeConfig) -> NodeConfig {
        if let Some(node_id) = &self.node_id {
            config.node_id = node_id.clone();
        }
        if let Some(model_path) = &self.model_path {
            config.model_path = model_path.clone();
        }
        if let Some(backup_dir) = &self.backup_dir {
            config.backup_dir = backup_dir.clone();
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(aggregator_url) = &self.aggregator_url {
            config.aggregator_url = Some(aggregator_url.clone());
        }
        if let Some(llm_endpoint) = &self.llm_endpoint {
            config.llm_endpoint = Some(llm_endpoint.clone());
        }
        config
    }
}

/// Loads the base config (defaults, or a TOML file if `--config` / `ATOUS_CONFIG`
/// points at one), applies CLI/env overrides, then validates.
pub fn load_config(args: &CliArgs) -> Result<NodeConfig, ConfigError> {
    let base = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingField("config file unreadable"))?;
            toml::from_str(&raw).map_err(|_| ConfigError::MissingField("config file malformed"))?
        }
        None => NodeConfig::default(),
    };

    let config = args.apply_overrides(base);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            config: None,
            node_id: None,
            model_path: None,
            backup_dir: None,
            region: None,
            aggregator_url: None,
            llm_endpoint: None,
        }
    }

    #[test]
    fn load_config_without_file_uses_defaults() {
        let config = load_config(&args()).unwrap();
        assert_eq!(config.node_id, NodeConfig::default().node_id);
    }

    #[test]
    fn cli_overrides_win_over_defaults() {
        let mut a = args();
        a.node_id = Some("node-7".to_string());
        let config = load_config(&a).unwrap();
        assert_eq!(config.node_id, "node-7");
    }

    #[test]
    fn config_file_is_layered_under_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        std::fs::write(&path, "node_id = \"from-file\"\nregion = \"EU\"\n").unwrap();

        let mut a = args();
        a.config = Some(path);
        a.region = Some("US".to_string());

        let config = load_config(&a).unwrap();
        assert_eq!(config.node_id, "from-file");
        assert_eq!(config.region, "US");
    }

    #[test]
    fn invalid_merged_config_fails_validation() {
        let mut a = args();
        a.region = Some("XX".to_string());
        assert!(load_config(&a).is_err());
    }
}
