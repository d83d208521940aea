//! Metrics aggregation: reduces run counters into revenue, fulfillment and utilization.

use serde::{Deserialize, Serialize};

use crate::config::SimulationParams;
use crate::telemetry::SimTelemetry;

/// Summary KPIs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Platform commission over all matched rides.
    pub total_revenue: f64,
    /// Matched requests / all requests; 0.0 when there were no requests.
    pub fulfillment_rate: f64,
    /// Busy rider-time / (riders x timesteps); 0.0 when there were no riders.
    pub utilization: f64,
    pub fulfilled_requests: usize,
    pub total_busy_time: u64,
    pub num_requests: usize,
    pub num_riders: usize,
    pub time_steps: u64,
}

impl SimulationMetrics {
    pub fn from_telemetry(telemetry: &SimTelemetry, params: &SimulationParams) -> Self {
        Self::from_counters(
            telemetry.total_revenue,
            telemetry.fulfilled_requests,
            telemetry.total_busy_time,
            params.num_requests,
            params.num_riders,
            params.time_steps,
        )
    }

    pub fn from_counters(
        total_revenue: f64,
        fulfilled_requests: usize,
        total_busy_time: u64,
        num_requests: usize,
        num_riders: usize,
        time_steps: u64,
    ) -> Self {
        let fulfillment_rate = if num_requests > 0 {
            fulfilled_requests as f64 / num_requests as f64
        } else {
            0.0
        };

        let total_possible_time = num_riders as u64 * time_steps;
        let utilization = if total_possible_time > 0 {
            total_busy_time as f64 / total_possible_time as f64
        } else {
            0.0
        };

        Self {
            total_revenue,
            fulfillment_rate,
            utilization,
            fulfilled_requests,
            total_busy_time,
            num_requests,
            num_riders,
            time_steps,
        }
    }

    /// Requests that were never matched.
    pub fn unfulfilled_requests(&self) -> usize {
        self.num_requests.saturating_sub(self.fulfilled_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_from_counters() {
        let metrics = SimulationMetrics::from_counters(50.0, 30, 120, 40, 10, 20);
        assert_eq!(metrics.fulfillment_rate, 0.75);
        assert_eq!(metrics.utilization, 0.6);
        assert_eq!(metrics.total_revenue, 50.0);
        assert_eq!(metrics.unfulfilled_requests(), 10);
    }

    #[test]
    fn no_requests_reports_zero_fulfillment() {
        let metrics = SimulationMetrics::from_counters(0.0, 0, 0, 0, 10, 20);
        assert_eq!(metrics.fulfillment_rate, 0.0);
    }

    #[test]
    fn no_riders_reports_zero_utilization() {
        let metrics = SimulationMetrics::from_counters(0.0, 0, 0, 100, 0, 20);
        assert_eq!(metrics.utilization, 0.0);
        assert_eq!(metrics.fulfillment_rate, 0.0);
    }
}
