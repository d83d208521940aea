//! Reductions of one simulation's output into dashboard views.

use serde::Serialize;

use marketplace_sim::metrics::SimulationMetrics;
use marketplace_sim::telemetry::{AllocationRecord, SurgeRecord};

/// Surge above this marks a zone as high-surge.
pub const HIGH_SURGE_THRESHOLD: f64 = 1.5;

pub const LOW_FULFILLMENT_THRESHOLD: f64 = 0.8;
pub const LOW_UTILIZATION_THRESHOLD: f64 = 0.4;
pub const HIGH_AVERAGE_SURGE_THRESHOLD: f64 = 1.8;

/// Heatmap value for grid cells that have no zone.
const EMPTY_CELL_SURGE: f64 = 1.0;

/// Realized fares (before commission) summed per timestep; index is the timestep.
pub fn revenue_by_timestep(allocations: &[AllocationRecord], time_steps: u64) -> Vec<f64> {
    let mut revenue = vec![0.0; time_steps as usize];
    for allocation in allocations {
        if let Some(slot) = revenue.get_mut(allocation.timestep as usize) {
            *slot += allocation.fare;
        }
    }
    revenue
}

/// Completed rides per zone divided by the average supply per zone
/// (`num_riders / num_zones`). All zeros when there are no riders.
pub fn zone_imbalance(
    allocations: &[AllocationRecord],
    num_zones: usize,
    num_riders: usize,
) -> Vec<f64> {
    let mut completed = vec![0usize; num_zones];
    for allocation in allocations {
        if let Some(count) = completed.get_mut(allocation.zone) {
            *count += 1;
        }
    }
    if num_riders == 0 || num_zones == 0 {
        return vec![0.0; num_zones];
    }
    let avg_supply = num_riders as f64 / num_zones as f64;
    completed
        .into_iter()
        .map(|rides| rides as f64 / avg_supply)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurgeSummary {
    /// Mean over every (timestep, zone) record; 1.0 when there are none.
    pub mean_surge: f64,
    /// Distinct zones that exceeded [HIGH_SURGE_THRESHOLD] at least once.
    pub high_surge_zones: usize,
}

pub fn surge_summary(surges: &[SurgeRecord]) -> SurgeSummary {
    if surges.is_empty() {
        return SurgeSummary {
            mean_surge: 1.0,
            high_surge_zones: 0,
        };
    }
    let mean_surge = surges.iter().map(|s| s.surge).sum::<f64>() / surges.len() as f64;
    let mut high: Vec<usize> = surges
        .iter()
        .filter(|s| s.surge > HIGH_SURGE_THRESHOLD)
        .map(|s| s.zone)
        .collect();
    high.sort_unstable();
    high.dedup();
    SurgeSummary {
        mean_surge,
        high_surge_zones: high.len(),
    }
}

/// Mean surge per zone laid out row-major with `width` columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurgeHeatmap {
    pub width: usize,
    pub rows: Vec<Vec<f64>>,
}

impl SurgeHeatmap {
    /// Value at `(row, col)`, if the cell exists.
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Zone `z` lands at row `z / width`, column `z % width`, where `width = floor(sqrt(zones))`.
/// Cells with no zone or no records hold 1.0.
pub fn surge_heatmap(surges: &[SurgeRecord], num_zones: usize) -> SurgeHeatmap {
    let width = ((num_zones as f64).sqrt().floor() as usize).max(1);
    let height = num_zones.div_ceil(width);

    let mut sums = vec![0.0; num_zones];
    let mut counts = vec![0usize; num_zones];
    for record in surges {
        if record.zone < num_zones {
            sums[record.zone] += record.surge;
            counts[record.zone] += 1;
        }
    }

    let mut rows = vec![vec![EMPTY_CELL_SURGE; width]; height];
    for zone in 0..num_zones {
        if counts[zone] > 0 {
            rows[zone / width][zone % width] = sums[zone] / counts[zone] as f64;
        }
    }
    SurgeHeatmap { width, rows }
}

/// Operational flags raised from a run's KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Insight {
    LowFulfillment,
    LowUtilization,
    HighSurge,
    Balanced,
}

impl Insight {
    pub fn message(&self) -> &'static str {
        match self {
            Insight::LowFulfillment => {
                "Low fulfillment rate detected. Consider increasing rider supply."
            }
            Insight::LowUtilization => {
                "Low rider utilization detected. Oversupply may be reducing surge and revenue."
            }
            Insight::HighSurge => {
                "High surge conditions detected. Revenue optimized but customer wait times may increase."
            }
            Insight::Balanced => {
                "Marketplace is balanced. Supply and demand are operating efficiently."
            }
        }
    }
}

/// Every triggered flag in a fixed order, or just [Insight::Balanced].
pub fn insights(metrics: &SimulationMetrics, mean_surge: f64) -> Vec<Insight> {
    let mut found = Vec::new();
    if metrics.fulfillment_rate < LOW_FULFILLMENT_THRESHOLD {
        found.push(Insight::LowFulfillment);
    }
    if metrics.utilization < LOW_UTILIZATION_THRESHOLD {
        found.push(Insight::LowUtilization);
    }
    if mean_surge > HIGH_AVERAGE_SURGE_THRESHOLD {
        found.push(Insight::HighSurge);
    }
    if found.is_empty() {
        found.push(Insight::Balanced);
    }
    found
}
