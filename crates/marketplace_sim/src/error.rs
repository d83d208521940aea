use thiserror::Error;

/// Fatal configuration problems, detected before any simulation state is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("num_zones must be at least 1")]
    NoZones,
    #[error("time_steps must be at least 1")]
    NoTimeSteps,
    #[error("surge sensitivity must be within [0, 1], got {0}")]
    SensitivityOutOfRange(f64),
    #[error("surge band is invalid: need 1.0 <= min ({min}) <= max ({max}) <= 3.0")]
    InvalidSurgeBand { min: f64, max: f64 },
    #[error("commission rate must be within [0, 1], got {0}")]
    CommissionOutOfRange(f64),
    #[error("learning rate must be within (0, 1], got {0}")]
    LearningRateOutOfRange(f64),
    #[error("exploration rate must be within [0, 1], got {0}")]
    ExplorationRateOutOfRange(f64),
    #[error("fare range {start}..{end} is empty")]
    EmptyFareRange { start: u32, end: u32 },
    #[error("ride duration range {start}..{end} must be non-empty and start at 1 or more")]
    InvalidDurationRange { start: u64, end: u64 },
    #[error("rider {rider} has zone {zone}, but only {num_zones} zones exist")]
    RiderZoneOutOfRange {
        rider: usize,
        zone: usize,
        num_zones: usize,
    },
    #[error("request {request} has zone {zone}, but only {num_zones} zones exist")]
    RequestZoneOutOfRange {
        request: usize,
        zone: usize,
        num_zones: usize,
    },
    #[error("request {request} arrives at step {arrival}, past the horizon of {time_steps} steps")]
    RequestArrivalOutOfRange {
        request: usize,
        arrival: u64,
        time_steps: u64,
    },
}
