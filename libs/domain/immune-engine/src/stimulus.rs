// [libs/domain/immune-engine/src/stimulus.rs]
use atous_domain_models::Telemetry;

const DESTINATION_PORTS_OF_INTEREST: [u16; 4] = [22, 3389, 445, 1433];

/// Domain-specific stimulus heuristics. Specializations outside the four
/// listed below have no defined rule and always stimulate at 0.0.
pub fn stimulus_for(specialization: &str, telemetry: &Telemetry) -> f64 {
    let raw = match specialization {
        "network_anomaly" => network_anomaly_stimulus(telemetry),
        "ddos_attack" => ddos_attack_stimulus(telemetry),
        "data_exfiltration" => data_exfiltration_stimulus(telemetry),
        "malware_detection" => malware_detection_stimulus(telemetry),
        _ => 0.0,
    };
    raw.min(1.0)
}

fn network_anomaly_stimulus(telemetry: &Telemetry) -> f64 {
    let mut stimulus = 0.0;
    if telemetry.packet_count > 10_000 {
        stimulus += 0.3;
    }
    if telemetry.packet_count > 50_000 {
        stimulus += 0.4;
    }
    if telemetry.connection_attempts > 50 {
        stimulus += 0.3;
    }
    stimulus
}

fn ddos_attack_stimulus(telemetry: &Telemetry) -> f64 {
    let mut stimulus = 0.0;
    if telemetry.packet_count > 100_000 {
        stimulus += 0.8;
    }
    if telemetry.unique_sources > 100 {
        stimulus += 0.6;
    }
    stimulus
}

fn data_exfiltration_stimulus(telemetry: &Telemetry) -> f64 {
    let mut stimulus = 0.0;
    if telemetry.transfer_rate_mb_per_s > 10.0 {
        stimulus += 0.7;
    }
    if telemetry
        .destination_ports
        .iter()
        .any(|port| DESTINATION_PORTS_OF_INTEREST.contains(port))
    {
        stimulus += 0.4;
    }
    stimulus
}

fn malware_detection_stimulus(telemetry: &Telemetry) -> f64 {
    let text = telemetry.stringified();
    let mut stimulus = 0.0;
    if text.contains("suspicious_process") {
        stimulus += 0.6;
    }
    if text.contains("file_creation") {
        stimulus += 0.4;
    }
    stimulus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_anomaly_accumulates_and_caps() {
        let telemetry = Telemetry {
            packet_count: 60_000,
            connection_attempts: 60,
            ..Default::default()
        };
        assert_eq!(stimulus_for("network_anomaly", &telemetry), 1.0);
    }

    #[test]
    fn ddos_requires_volume_or_source_spread() {
        let telemetry = Telemetry {
            unique_sources: 150,
            ..Default::default()
        };
        assert!((stimulus_for("ddos_attack", &telemetry) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn data_exfiltration_flags_sensitive_ports() {
        let telemetry = Telemetry {
            transfer_rate_mb_per_s: 15.0,
            destination_ports: vec![445],
            ..Default::default()
        };
        assert!((stimulus_for("data_exfiltration", &telemetry) - 1.1_f64.min(1.0)).abs() < 1e-9);
    }

    #[test]
    fn malware_detection_reads_stringified_evidence() {
        let telemetry = Telemetry {
            evidence: vec!["suspicious_process_detected".to_string(), "file_creation_event".to_string()],
            ..Default::default()
        };
        assert!((stimulus_for("malware_detection", &telemetry) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unmapped_specialization_never_stimulates() {
        assert_eq!(stimulus_for("zero_day_exploit", &Telemetry::default()), 0.0);
    }
}
