//! Per-run result rows.

use marketplace_sim::SimulationOutput;
use serde::Serialize;

use crate::parameters::ParameterSet;
use crate::report::surge_summary;

/// Aggregated outcome of one run, tagged with the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResult {
    pub experiment_id: String,
    pub run_id: usize,
    pub seed: u64,
    pub policy: String,
    pub num_zones: usize,
    pub num_riders: usize,
    pub num_requests: usize,
    pub time_steps: u64,
    pub commission_rate: f64,
    /// Platform commission.
    pub total_revenue: f64,
    pub fulfillment_rate: f64,
    pub utilization: f64,
    pub completed_rides: usize,
    /// Mean over all (timestep, zone) surge records.
    pub avg_surge: f64,
    /// Distinct zones whose surge exceeded 1.5 at least once.
    pub high_surge_zones: usize,
}

impl ExperimentResult {
    pub fn from_output(param_set: &ParameterSet, output: &SimulationOutput) -> Self {
        let params = &param_set.params;
        let surge = surge_summary(&output.surge_records);
        Self {
            experiment_id: param_set.experiment_id.clone(),
            run_id: param_set.run_id,
            seed: param_set.seed,
            policy: params.policy.as_str().to_string(),
            num_zones: params.num_zones,
            num_riders: params.num_riders,
            num_requests: params.num_requests,
            time_steps: params.time_steps,
            commission_rate: params.commission_rate,
            total_revenue: output.metrics.total_revenue,
            fulfillment_rate: output.metrics.fulfillment_rate,
            utilization: output.metrics.utilization,
            completed_rides: output.metrics.fulfilled_requests,
            avg_surge: surge.mean_surge,
            high_surge_zones: surge.high_surge_zones,
        }
    }
}
