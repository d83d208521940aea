//! Surge pricing: maps a zone's demand and supply to a bounded fare multiplier.
//!
//! Formula: `raw = 1 + sensitivity * (demand / supply - 1)`, clamped to the surge band
//! and rounded to two decimal places. A zone with no supply prices at the band ceiling.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Multiplier floor: surge never discounts below the base fare.
pub const MIN_SURGE_MULTIPLIER: f64 = 1.0;

/// Multiplier ceiling, also charged when a zone has no supply at all.
pub const MAX_SURGE_MULTIPLIER: f64 = 3.0;

/// Sensitivity used by the engine unless overridden.
pub const DEFAULT_SURGE_SENSITIVITY: f64 = 0.6;

/// Surge pricing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurgeConfig {
    /// How strongly the demand/supply ratio moves the multiplier, in [0, 1].
    pub sensitivity: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SURGE_SENSITIVITY,
            min_multiplier: MIN_SURGE_MULTIPLIER,
            max_multiplier: MAX_SURGE_MULTIPLIER,
        }
    }
}

impl SurgeConfig {
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Multiplier for one zone and timestep under this configuration.
    pub fn multiplier(&self, demand: usize, supply: usize) -> f64 {
        surge_multiplier_in_band(
            demand,
            supply,
            self.sensitivity,
            self.min_multiplier,
            self.max_multiplier,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(ConfigError::SensitivityOutOfRange(self.sensitivity));
        }
        let min_ok = (MIN_SURGE_MULTIPLIER..=self.max_multiplier).contains(&self.min_multiplier);
        let max_ok = (self.min_multiplier..=MAX_SURGE_MULTIPLIER).contains(&self.max_multiplier);
        if !(min_ok && max_ok) {
            return Err(ConfigError::InvalidSurgeBand {
                min: self.min_multiplier,
                max: self.max_multiplier,
            });
        }
        Ok(())
    }
}

/// Surge multiplier in `[1.0, 3.0]` for the given demand, supply and sensitivity.
pub fn price_multiplier(demand: usize, supply: usize, sensitivity: f64) -> f64 {
    surge_multiplier_in_band(
        demand,
        supply,
        sensitivity,
        MIN_SURGE_MULTIPLIER,
        MAX_SURGE_MULTIPLIER,
    )
}

fn surge_multiplier_in_band(
    demand: usize,
    supply: usize,
    sensitivity: f64,
    min_multiplier: f64,
    max_multiplier: f64,
) -> f64 {
    if supply == 0 {
        return max_multiplier;
    }
    let ratio = demand as f64 / supply as f64;
    let raw = 1.0 + sensitivity * (ratio - 1.0);
    round_to_cents(raw.clamp(min_multiplier, max_multiplier))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_supply_prices_at_ceiling() {
        for demand in [0, 1, 7, 10_000] {
            for sensitivity in [0.0, 0.3, 0.6, 1.0] {
                assert_eq!(price_multiplier(demand, 0, sensitivity), 3.0);
            }
        }
    }

    #[test]
    fn no_demand_prices_at_floor() {
        for supply in [1, 2, 50, 10_000] {
            assert_eq!(price_multiplier(0, supply, 0.6), 1.0);
        }
    }

    #[test]
    fn multiplier_stays_in_band() {
        for demand in 0..40 {
            for supply in 0..40 {
                for step in 0..=10 {
                    let sensitivity = step as f64 / 10.0;
                    let m = price_multiplier(demand, supply, sensitivity);
                    assert!(
                        (1.0..=3.0).contains(&m),
                        "demand={demand} supply={supply} s={sensitivity} gave {m}"
                    );
                }
            }
        }
    }

    #[test]
    fn balanced_zone_has_no_surge() {
        assert_eq!(price_multiplier(5, 5, 0.6), 1.0);
    }

    #[test]
    fn excess_demand_scales_with_sensitivity() {
        // ratio 2 -> 1 + 0.6 * 1 = 1.6
        assert_eq!(price_multiplier(10, 5, 0.6), 1.6);
        // ratio 3 -> 1 + 0.6 * 2 = 2.2
        assert_eq!(price_multiplier(9, 3, 0.6), 2.2);
        // ratio 10 -> 6.4, clamped
        assert_eq!(price_multiplier(10, 1, 0.6), 3.0);
    }

    #[test]
    fn multiplier_is_rounded_to_two_decimals() {
        // ratio 4/3 -> 1 + 0.6 / 3 = 1.2
        assert_eq!(price_multiplier(4, 3, 0.6), 1.2);
        // ratio 8/7 -> 1.0857.. -> 1.09
        assert_eq!(price_multiplier(8, 7, 0.6), 1.09);
    }

    #[test]
    fn config_band_overrides_ceiling() {
        let config = SurgeConfig {
            max_multiplier: 2.0,
            ..Default::default()
        };
        assert_eq!(config.multiplier(3, 0), 2.0);
        assert_eq!(config.multiplier(10, 1), 2.0);
        assert_eq!(config.multiplier(10, 5), 1.6);
    }

    #[test]
    fn invalid_sensitivity_is_rejected() {
        let config = SurgeConfig::default().with_sensitivity(1.2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SensitivityOutOfRange(1.2))
        );
    }

    #[test]
    fn band_must_sit_inside_floor_and_ceiling() {
        let band = |min_multiplier, max_multiplier| SurgeConfig {
            min_multiplier,
            max_multiplier,
            ..Default::default()
        };
        assert_eq!(band(1.0, 3.0).validate(), Ok(()));
        assert_eq!(band(1.5, 1.5).validate(), Ok(()));
        assert_eq!(
            band(0.2, 0.5).validate(),
            Err(ConfigError::InvalidSurgeBand { min: 0.2, max: 0.5 })
        );
        assert_eq!(
            band(1.0, 3.5).validate(),
            Err(ConfigError::InvalidSurgeBand { min: 1.0, max: 3.5 })
        );
        assert_eq!(
            band(2.0, 1.5).validate(),
            Err(ConfigError::InvalidSurgeBand { min: 2.0, max: 1.5 })
        );
    }

    #[test]
    fn nan_band_bounds_are_rejected() {
        for (min, max) in [(f64::NAN, 3.0), (1.0, f64::NAN), (f64::NAN, f64::NAN)] {
            let config = SurgeConfig {
                min_multiplier: min,
                max_multiplier: max,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidSurgeBand { .. })),
                "min={min} max={max} passed validation"
            );
        }
    }
}
