// [libs/domain/models/src/lora.rs]
//! =================================================================
//! APARATO: DTOS DE RADIO LORA (V1.0)
//! RESPONSABILIDAD: CONFIGURACIÓN DE RADIO Y MÉTRICAS DE CANAL
//! =================================================================

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regulatory region. Defines the cap on transmit power, duty cycle and
/// the operating frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Br,
    Eu,
    Us,
    Au,
}

/// `(max_tx_power dBm, max_duty_cycle fraction, frequency MHz)`.
pub struct RegionLimits {
    pub max_tx_power: i32,
    pub max_duty_cycle: f64,
    pub frequency: f64,
}

impl Region {
    pub const fn limits(self) -> RegionLimits {
        match self {
            Region::Br => RegionLimits {
                max_tx_power: 14,
                max_duty_cycle: 0.1,
                frequency: 915.0,
            },
            Region::Eu => RegionLimits {
                max_tx_power: 14,
                max_duty_cycle: 0.01,
                frequency: 868.0,
            },
            Region::Us => RegionLimits {
                max_tx_power: 30,
                max_duty_cycle: 1.0,
                frequency: 915.0,
            },
            Region::Au => RegionLimits {
                max_tx_power: 30,
                max_duty_cycle: 1.0,
                frequency: 915.0,
            },
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BR" => Ok(Region::Br),
            "EU" => Ok(Region::Eu),
            "US" => Ok(Region::Us),
            "AU" => Ok(Region::Au),
            other => Err(ConfigError::UnsupportedRegion(other.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Region::Br => "BR",
            Region::Eu => "EU",
            Region::Us => "US",
            Region::Au => "AU",
        };
        write!(f, "{s}")
    }
}

/// LoRa forward-error-correction coding rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodingRate {
    FourFifths,
    FourSixths,
    FourSevenths,
    FourEighths,
}

impl CodingRate {
    /// Fraction used in the throughput formula (§4.3).
    pub const fn fraction(self) -> f64 {
        match self {
            CodingRate::FourFifths => 0.8,
            CodingRate::FourSixths => 0.666_666_666_666_666_7,
            CodingRate::FourSevenths => 0.571_428_571_428_571_4,
            CodingRate::FourEighths => 0.5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CodingRate::FourFifths => "4/5",
            CodingRate::FourSixths => "4/6",
            CodingRate::FourSevenths => "4/7",
            CodingRate::FourEighths => "4/8",
        }
    }
}

impl FromStr for CodingRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4/5" => Ok(CodingRate::FourFifths),
            "4/6" => Ok(CodingRate::FourSixths),
            "4/7" => Ok(CodingRate::FourSevenths),
            "4/8" => Ok(CodingRate::FourEighths),
            other => Err(ConfigError::InvalidCodingRate(other.to_string())),
        }
    }
}

/// Physical parameter bounds, independent of region.
pub const SPREADING_FACTOR_MIN: u8 = 7;
pub const SPREADING_FACTOR_MAX: u8 = 12;
pub const TX_POWER_MIN: i32 = 5;
pub const TX_POWER_MAX: i32 = 30;
pub const BANDWIDTH_MIN: u32 = 125_000;
pub const BANDWIDTH_MAX: u32 = 500_000;

/// The mutable LoRa radio configuration. `tx_power` is clamped to the
/// region's cap on construction and on every subsequent adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoraConfig {
    pub frequency: f64,
    pub spreading_factor: u8,
    pub tx_power: i32,
    pub bandwidth: u32,
    pub coding_rate: CodingRate,
    pub region: Region,
}

impl LoraConfig {
    pub fn new(
        spreading_factor: u8,
        tx_power: i32,
        bandwidth: u32,
        coding_rate: CodingRate,
        region: Region,
    ) -> Result<Self, ConfigError> {
        if !(SPREADING_FACTOR_MIN..=SPREADING_FACTOR_MAX).contains(&spreading_factor) {
            return Err(ConfigError::SpreadingFactorOutOfBounds(spreading_factor));
        }
        if !(BANDWIDTH_MIN..=BANDWIDTH_MAX).contains(&bandwidth) {
            return Err(ConfigError::BandwidthOutOfBounds(bandwidth));
        }
        if !(TX_POWER_MIN..=TX_POWER_MAX).contains(&tx_power) {
            return Err(ConfigError::TxPowerOutOfBounds {
                tx_power,
                min: TX_POWER_MIN,
                max: TX_POWER_MAX,
            });
        }

        let limits = region.limits();
        let clamped_tx_power = tx_power.min(limits.max_tx_power);

        Ok(Self {
            frequency: limits.frequency,
            spreading_factor,
            tx_power: clamped_tx_power,
            bandwidth,
            coding_rate,
            region,
        })
    }

    /// Re-clamp `tx_power` to the region cap. Called after every
    /// adjustment so invariant I3 holds at every observable point.
    pub fn clamp_tx_power(&mut self) {
        let limits = self.region.limits();
        self.tx_power = self.tx_power.clamp(TX_POWER_MIN, limits.max_tx_power);
    }
}

/// A single channel-quality sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoraMetric {
    pub rssi: f64,
    pub snr: f64,
    pub packet_loss: f64,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_power_clamps_to_region_cap() {
        let cfg = LoraConfig::new(7, 30, 125_000, CodingRate::FourFifths, Region::Br).unwrap();
        assert_eq!(cfg.tx_power, 14);
    }

    #[test]
    fn tx_power_within_region_cap_is_untouched() {
        let cfg = LoraConfig::new(7, 10, 125_000, CodingRate::FourFifths, Region::Br).unwrap();
        assert_eq!(cfg.tx_power, 10);
    }

    #[test]
    fn spreading_factor_out_of_bounds_is_rejected() {
        let err = LoraConfig::new(13, 14, 125_000, CodingRate::FourFifths, Region::Br).unwrap_err();
        assert_eq!(err, ConfigError::SpreadingFactorOutOfBounds(13));
    }

    #[test]
    fn clamp_tx_power_reclamps_after_region_change() {
        let mut cfg = LoraConfig::new(7, 30, 125_000, CodingRate::FourFifths, Region::Us).unwrap();
        assert_eq!(cfg.tx_power, 30);
        cfg.region = Region::Eu;
        cfg.clamp_tx_power();
        assert_eq!(cfg.tx_power, 14);
    }

    #[test]
    fn region_round_trips_through_str() {
        assert_eq!(Region::from_str("eu").unwrap(), Region::Eu);
        assert_eq!(Region::Us.to_string(), "US");
        assert!(Region::from_str("xx").is_err());
    }

    #[test]
    fn coding_rate_fraction_matches_table() {
        assert_eq!(CodingRate::FourFifths.fraction(), 0.8);
        assert_eq!(CodingRate::FourEighths.fraction(), 0.5);
    }
}
