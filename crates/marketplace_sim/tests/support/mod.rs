#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use marketplace_sim::dispatch::{DispatchAction, DispatchPolicy};
use marketplace_sim::{SimulationOutput, SimulationParams};
use rand::RngCore;

/// A mid-sized seeded scenario used across integration tests.
pub fn seeded_params(seed: u64, use_rl: bool) -> SimulationParams {
    SimulationParams::new(6, 60, 400, 20, use_rl).with_seed(seed)
}

pub fn temp_parquet_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{nanos}.parquet"))
}

/// Every zone appears exactly once per timestep in ascending order.
pub fn assert_surge_grid(output: &SimulationOutput, num_zones: usize, time_steps: u64) {
    assert_eq!(
        output.surge_records.len(),
        num_zones * time_steps as usize,
        "one surge record per (timestep, zone)"
    );
    for (idx, record) in output.surge_records.iter().enumerate() {
        assert_eq!(record.timestep, (idx / num_zones) as u64);
        assert_eq!(record.zone, idx % num_zones);
    }
}

/// One `feedback` call as seen by a policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackCall {
    pub zone: usize,
    pub demand: usize,
    pub supply: usize,
    pub action: DispatchAction,
    pub reward: f64,
}

/// Policy that always answers with `action` and logs every feedback it receives.
#[derive(Debug, Clone)]
pub struct RecordingPolicy {
    action: DispatchAction,
    calls: Arc<Mutex<Vec<FeedbackCall>>>,
}

impl RecordingPolicy {
    pub fn always(action: DispatchAction) -> Self {
        Self {
            action,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the log; stays readable after the policy moves into a run.
    pub fn calls(&self) -> Arc<Mutex<Vec<FeedbackCall>>> {
        Arc::clone(&self.calls)
    }
}

impl DispatchPolicy for RecordingPolicy {
    fn decide(
        &mut self,
        _zone: usize,
        _demand: usize,
        _supply: usize,
        _rng: &mut dyn RngCore,
    ) -> DispatchAction {
        self.action
    }

    fn feedback(
        &mut self,
        zone: usize,
        demand: usize,
        supply: usize,
        action: DispatchAction,
        reward: f64,
    ) {
        self.calls.lock().unwrap().push(FeedbackCall {
            zone,
            demand,
            supply,
            action,
            reward,
        });
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
