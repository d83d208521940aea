//! Time-stepped marketplace simulation: riders are matched to ride requests across
//! discrete zones under surge pricing and a pluggable dispatch policy.
//!
//! A run is one synchronous computation. All randomness (entity generation, ride
//! durations and policy exploration) flows through a single [rand::rngs::StdRng] owned
//! by the [runner::Simulation], so a fixed seed reproduces every record bit for bit.

pub mod agents;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod pricing;
pub mod runner;
pub mod spawner;
pub mod telemetry;
pub mod telemetry_export;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use config::{DispatchPolicyKind, SimulationParams};
pub use error::ConfigError;
pub use metrics::SimulationMetrics;
pub use runner::{run_scenario, run_scenario_with_rng, run_simulation, Simulation, SimulationOutput};
