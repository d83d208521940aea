//! Telemetry: the record streams emitted by the simulation loop plus run counters.

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchAction;

/// One matched request, appended at match time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub timestep: u64,
    pub zone: usize,
    /// Base fare times surge.
    pub fare: f64,
    pub surge: f64,
}

/// Surge multiplier for every (timestep, zone) pair, matched or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurgeRecord {
    pub timestep: u64,
    pub zone: usize,
    pub surge: f64,
}

/// Per (timestep, zone) audit of the dispatch decision and its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub timestep: u64,
    pub zone: usize,
    pub demand: usize,
    pub supply: usize,
    pub surge: f64,
    pub action: DispatchAction,
    pub matches: usize,
}

impl DispatchRecord {
    /// Requests left unserved in this cell.
    pub fn unmet_demand(&self) -> usize {
        self.demand.saturating_sub(self.matches)
    }
}

/// Collects records and accumulates the counters the metrics are reduced from.
#[derive(Debug, Clone, Default)]
pub struct SimTelemetry {
    pub allocations: Vec<AllocationRecord>,
    pub surges: Vec<SurgeRecord>,
    pub dispatches: Vec<DispatchRecord>,
    /// Rider-timesteps spent serving rides, truncated at the horizon.
    pub total_busy_time: u64,
    pub fulfilled_requests: usize,
    /// Platform commission summed over all realized fares.
    pub total_revenue: f64,
}

impl SimTelemetry {
    pub fn with_capacity(num_zones: usize, time_steps: u64, num_requests: usize) -> Self {
        let cells = num_zones.saturating_mul(time_steps as usize);
        Self {
            allocations: Vec::with_capacity(num_requests),
            surges: Vec::with_capacity(cells),
            dispatches: Vec::with_capacity(cells),
            ..Default::default()
        }
    }

    /// Account for one completed match.
    pub fn record_allocation(&mut self, record: AllocationRecord, busy_time: u64, revenue: f64) {
        self.allocations.push(record);
        self.total_busy_time += busy_time;
        self.total_revenue += revenue;
        self.fulfilled_requests += 1;
    }

    /// Sum of realized fares (before commission).
    pub fn gross_fares(&self) -> f64 {
        self.allocations.iter().map(|a| a.fare).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_allocation_updates_counters() {
        let mut telemetry = SimTelemetry::with_capacity(2, 3, 4);
        telemetry.record_allocation(
            AllocationRecord {
                timestep: 0,
                zone: 1,
                fare: 120.0,
                surge: 1.2,
            },
            4,
            24.0,
        );
        telemetry.record_allocation(
            AllocationRecord {
                timestep: 1,
                zone: 0,
                fare: 80.0,
                surge: 1.0,
            },
            2,
            16.0,
        );

        assert_eq!(telemetry.fulfilled_requests, 2);
        assert_eq!(telemetry.total_busy_time, 6);
        assert_eq!(telemetry.total_revenue, 40.0);
        assert_eq!(telemetry.gross_fares(), 200.0);
    }

    #[test]
    fn unmet_demand_saturates() {
        let record = DispatchRecord {
            timestep: 0,
            zone: 0,
            demand: 2,
            supply: 5,
            surge: 1.0,
            action: DispatchAction::Allocate,
            matches: 2,
        };
        assert_eq!(record.unmet_demand(), 0);
        let skipped = DispatchRecord {
            action: DispatchAction::Skip,
            matches: 0,
            ..record
        };
        assert_eq!(skipped.unmet_demand(), 2);
    }
}
