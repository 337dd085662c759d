// [libs/domain/threat-detection/src/patterns.rs]
//! =================================================================
//! APARATO: PATRONES DE AMENAZA CONOCIDOS (V1.0)
//! RESPONSABILIDAD: CATÁLOGO DE LAS CUATRO FIRMAS SEMBRADAS AL
//! CONSTRUIR UN DETECTOR
//! =================================================================

use atous_domain_models::ThreatPattern;

pub fn known_patterns(seeded_at: u64) -> Vec<ThreatPattern> {
    vec![
        ThreatPattern {
            pattern_id: "ddos-001".to_string(),
            pattern_type: "ddos_attack".to_string(),
            indicators: vec!["high_packet_rate".to_string()],
            severity: 0.9,
            frequency: 0.0,
            description: "Sustained high packet rate consistent with a volumetric flood".to_string(),
            created_at: seeded_at,
        },
        ThreatPattern {
            pattern_id: "malware-001".to_string(),
            pattern_type: "malware_infection".to_string(),
            indicators: vec!["suspicious_process".to_string()],
            severity: 0.8,
            frequency: 0.0,
            description: "Process behavior matching known malware signatures".to_string(),
            created_at: seeded_at,
        },
        ThreatPattern {
            pattern_id: "exfil-001".to_string(),
            pattern_type: "data_exfiltration".to_string(),
            indicators: vec!["large_data_transfer".to_string()],
            severity: 0.9,
            frequency: 0.0,
            description: "Large outbound transfer to an unrecognized destination".to_string(),
            created_at: seeded_at,
        },
        ThreatPattern {
            pattern_id: "sqli-001".to_string(),
            pattern_type: "sql_injection".to_string(),
            indicators: vec!["sql_keywords_in_url".to_string()],
            severity: 0.7,
            frequency: 0.0,
            description: "SQL syntax tokens present in request URL parameters".to_string(),
            created_at: seeded_at,
        },
    ]
}
