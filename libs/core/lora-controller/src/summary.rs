// [libs/core/lora-controller/src/summary.rs]
use atous_domain_models::LoraConfig;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    pub frequency_mhz: f64,
    pub spreading_factor: u8,
    pub tx_power_dbm: i32,
    pub bandwidth_hz: u32,
    pub coding_rate: &'static str,
    pub throughput_bps: f64,
    pub estimated_range_m: f64,
    pub energy_ma: f64,
}

/// Derives throughput, range and energy estimates from the current
/// radio configuration, per the formulas in §4.3.
pub fn summarize(config: &LoraConfig) -> PerformanceSummary {
    let sf = config.spreading_factor as f64;
    let bw = config.bandwidth as f64;
    let tx = config.tx_power as f64;
    let cr_fraction = config.coding_rate.fraction();

    let throughput_bps = (sf * bw) / (2f64.powf(sf) * cr_fraction);

    let rx_sensitivity = -120.0 + (sf - 7.0) * 2.5;
    let frequency_ghz = config.frequency / 1000.0;
    let estimated_range_m =
        10f64.powf((tx - rx_sensitivity - 20.0 * frequency_ghz.log10() - 32.44) / 20.0);

    let energy_ma = 25.0 + (sf - 7.0) * 2.0 + (tx - 5.0) * 1.5;

    PerformanceSummary {
        frequency_mhz: config.frequency,
        spreading_factor: config.spreading_factor,
        tx_power_dbm: config.tx_power,
        bandwidth_hz: config.bandwidth,
        coding_rate: config.coding_rate.as_str(),
        throughput_bps,
        estimated_range_m,
        energy_ma,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atous_domain_models::{CodingRate, Region};

    #[test]
    fn summary_matches_formulas_for_a_known_configuration() {
        let config = LoraConfig::new(7, 14, 125_000, CodingRate::FourFifths, Region::Br).unwrap();
        let summary = summarize(&config);

        let expected_throughput = (7.0 * 125_000.0) / (2f64.powf(7.0) * 0.8);
        assert!((summary.throughput_bps - expected_throughput).abs() < 1e-6);

        let rx_sens = -120.0;
        let f_ghz = 915.0 / 1000.0;
        let expected_range = 10f64.powf((14.0 - rx_sens - 20.0 * f_ghz.log10() - 32.44) / 20.0);
        assert!((summary.estimated_range_m - expected_range).abs() < 1e-6);

        let expected_energy = 25.0 + (7.0 - 7.0) * 2.0 + (14.0 - 5.0) * 1.5;
        assert!((summary.energy_ma - expected_energy).abs() < 1e-9);
    }
}
