//! Simulation configuration: the four size scalars, the policy switch, and every
//! engine constant exposed as an overridable parameter.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::dispatch::TabularPolicyConfig;
use crate::error::ConfigError;
use crate::pricing::SurgeConfig;

/// Default zone count (matches the dashboard slider default).
pub const DEFAULT_NUM_ZONES: usize = 16;
pub const DEFAULT_NUM_RIDERS: usize = 800;
pub const DEFAULT_NUM_REQUESTS: usize = 6000;
pub const DEFAULT_TIME_STEPS: u64 = 60;

/// Fraction of each realized fare kept by the platform.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.2;

/// Base fares are drawn uniformly from this half-open integer range.
pub const DEFAULT_FARE_RANGE: Range<u32> = 50..200;

/// Ride durations (in timesteps) are drawn uniformly from this half-open range.
pub const DEFAULT_RIDE_DURATION_RANGE: Range<u64> = 3..8;

/// Which dispatch policy decides whether a zone allocates in a timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchPolicyKind {
    /// Allocate whenever a zone has supply.
    #[default]
    Greedy,
    /// Tabular value-learning policy over (zone, demand/supply ratio) states.
    TabularRl,
}

impl DispatchPolicyKind {
    pub fn from_use_rl(use_rl: bool) -> Self {
        if use_rl {
            Self::TabularRl
        } else {
            Self::Greedy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::TabularRl => "tabular_rl",
        }
    }
}

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub num_zones: usize,
    pub num_riders: usize,
    pub num_requests: usize,
    pub time_steps: u64,
    pub policy: DispatchPolicyKind,
    /// Seed for the run's generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub pricing: SurgeConfig,
    pub commission_rate: f64,
    pub fare_range: Range<u32>,
    pub ride_duration_range: Range<u64>,
    pub tabular: TabularPolicyConfig,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_zones: DEFAULT_NUM_ZONES,
            num_riders: DEFAULT_NUM_RIDERS,
            num_requests: DEFAULT_NUM_REQUESTS,
            time_steps: DEFAULT_TIME_STEPS,
            policy: DispatchPolicyKind::default(),
            seed: None,
            pricing: SurgeConfig::default(),
            commission_rate: DEFAULT_COMMISSION_RATE,
            fare_range: DEFAULT_FARE_RANGE,
            ride_duration_range: DEFAULT_RIDE_DURATION_RANGE,
            tabular: TabularPolicyConfig::default(),
        }
    }
}

impl SimulationParams {
    /// Parameters with the four size scalars and policy switch set, everything else default.
    pub fn new(
        num_zones: usize,
        num_riders: usize,
        num_requests: usize,
        time_steps: u64,
        use_rl: bool,
    ) -> Self {
        Self {
            num_zones,
            num_riders,
            num_requests,
            time_steps,
            policy: DispatchPolicyKind::from_use_rl(use_rl),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: DispatchPolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_zones(mut self, num_zones: usize) -> Self {
        self.num_zones = num_zones;
        self
    }

    pub fn with_riders(mut self, num_riders: usize) -> Self {
        self.num_riders = num_riders;
        self
    }

    pub fn with_requests(mut self, num_requests: usize) -> Self {
        self.num_requests = num_requests;
        self
    }

    pub fn with_time_steps(mut self, time_steps: u64) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Set surge pricing configuration.
    pub fn with_pricing(mut self, pricing: SurgeConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_commission_rate(mut self, commission_rate: f64) -> Self {
        self.commission_rate = commission_rate;
        self
    }

    /// Base fares are drawn from `start..end`.
    pub fn with_fare_range(mut self, fare_range: Range<u32>) -> Self {
        self.fare_range = fare_range;
        self
    }

    /// Ride durations (timesteps) are drawn from `start..end`.
    pub fn with_ride_duration_range(mut self, range: Range<u64>) -> Self {
        self.ride_duration_range = range;
        self
    }

    /// Set learning policy configuration (ignored by the greedy policy).
    pub fn with_tabular_config(mut self, tabular: TabularPolicyConfig) -> Self {
        self.tabular = tabular;
        self
    }

    /// Check every scalar before any simulation state is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_zones == 0 {
            return Err(ConfigError::NoZones);
        }
        if self.time_steps == 0 {
            return Err(ConfigError::NoTimeSteps);
        }
        self.pricing.validate()?;
        if !(0.0..=1.0).contains(&self.commission_rate) {
            return Err(ConfigError::CommissionOutOfRange(self.commission_rate));
        }
        self.tabular.validate()?;
        if self.fare_range.is_empty() {
            return Err(ConfigError::EmptyFareRange {
                start: self.fare_range.start,
                end: self.fare_range.end,
            });
        }
        if self.ride_duration_range.is_empty() || self.ride_duration_range.start == 0 {
            return Err(ConfigError::InvalidDurationRange {
                start: self.ride_duration_range.start,
                end: self.ride_duration_range.end,
            });
        }
        Ok(())
    }
}
