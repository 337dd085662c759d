// [libs/domain/response-engine/src/types.rs]
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseOutcome {
    pub threat_stopped: bool,
    pub false_positive: bool,
    pub response_time_secs: f64,
    pub collateral_damage: f64,
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub execution_time_ms: u64,
    pub actions_executed: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    pub mean_effectiveness: f64,
    pub sample_count: usize,
    pub suggested_parameters: HashMap<String, String>,
}
