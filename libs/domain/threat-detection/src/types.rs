// [libs/domain/threat-detection/src/types.rs]

/// Known ordered attack chains; a correlation flags one when the
/// observed type set contains every step, in any relative order.
pub const KNOWN_CHAINS: &[&[&str]] = &[&["port_scan", "brute_force", "data_exfiltration"]];

#[derive(Debug, Clone, PartialEq)]
pub struct ThreatAssessment {
    pub score: f64,
    pub threat_type: String,
}

#[derive(Debug, Clone)]
pub struct ScoredThreat {
    pub source: String,
    pub threat_type: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Correlation {
    pub campaign_detected: bool,
    pub campaigns: Vec<String>,
    pub threat_chain: Option<Vec<String>>,
    pub overall_severity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLandscape {
    Low,
    Normal,
    High,
}
