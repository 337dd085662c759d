// [libs/domain/immune-engine/src/specializations.rs]

pub const SPECIALIZATIONS: &[&str] = &[
    "network_anomaly",
    "malware_detection",
    "ddos_attack",
    "data_exfiltration",
    "privilege_escalation",
    "sql_injection",
    "cross_site_scripting",
    "brute_force_attack",
    "phishing_attempt",
    "zero_day_exploit",
];

const DEFAULT_THRESHOLD: f64 = 0.7;

/// Activation threshold for a specialization, falling back to 0.7 for
/// any specialization not in the fixed table (e.g. one added by `adapt`).
pub fn threshold_for(specialization: &str) -> f64 {
    match specialization {
        "network_anomaly" => 0.6,
        "malware_detection" => 0.7,
        "ddos_attack" => 0.8,
        "data_exfiltration" => 0.9,
        "privilege_escalation" => 0.8,
        "sql_injection" => 0.7,
        "cross_site_scripting" => 0.6,
        "brute_force_attack" => 0.7,
        "phishing_attempt" => 0.6,
        "zero_day_exploit" => 0.9,
        _ => DEFAULT_THRESHOLD,
    }
}
