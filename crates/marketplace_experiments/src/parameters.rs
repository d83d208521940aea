//! Parameter grid for sweeping the marketplace simulation.
//!
//! A [ParameterSpace] holds candidate values per dimension; [ParameterSpace::generate]
//! expands the Cartesian product into [ParameterSet]s. Dimensions left empty fall back to
//! the base parameters. Each run gets its own seed, so runs never share a generator.

use marketplace_sim::{DispatchPolicyKind, SimulationParams};

/// Seed of run 0 when none is configured.
pub const DEFAULT_BASE_SEED: u64 = 42;

/// One simulation configuration plus the metadata that identifies it in exports.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    pub params: SimulationParams,
    /// Identifies the grid point; repeated runs of one point share it.
    pub experiment_id: String,
    /// Position in the generated list, unique across the sweep.
    pub run_id: usize,
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(params: SimulationParams, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
            seed,
        }
    }

    /// The simulation params with this run's seed applied.
    pub fn simulation_params(&self) -> SimulationParams {
        self.params.clone().with_seed(self.seed)
    }
}

#[derive(Debug, Clone, Copy)]
struct GridPoint {
    num_riders: usize,
    num_zones: usize,
    time_steps: u64,
    policy: DispatchPolicyKind,
    commission_rate: f64,
}

/// Candidate values per dimension.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    base: SimulationParams,
    num_riders: Vec<usize>,
    num_zones: Vec<usize>,
    time_steps: Vec<u64>,
    policies: Vec<DispatchPolicyKind>,
    commission_rates: Vec<f64>,
    runs_per_point: usize,
    base_seed: u64,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: SimulationParams::default(),
            num_riders: vec![],
            num_zones: vec![],
            time_steps: vec![],
            policies: vec![],
            commission_rates: vec![],
            runs_per_point: 1,
            base_seed: DEFAULT_BASE_SEED,
        }
    }

    pub fn grid() -> Self {
        Self::new()
    }

    pub fn with_base(mut self, base: SimulationParams) -> Self {
        self.base = base;
        self
    }

    pub fn num_riders(mut self, counts: Vec<usize>) -> Self {
        self.num_riders = counts;
        self
    }

    pub fn num_zones(mut self, counts: Vec<usize>) -> Self {
        self.num_zones = counts;
        self
    }

    pub fn time_steps(mut self, steps: Vec<u64>) -> Self {
        self.time_steps = steps;
        self
    }

    pub fn policies(mut self, policies: Vec<DispatchPolicyKind>) -> Self {
        self.policies = policies;
        self
    }

    pub fn commission_rate(mut self, rates: Vec<f64>) -> Self {
        self.commission_rates = rates;
        self
    }

    /// Repeat every grid point `runs` times with distinct seeds. Values below 1 become 1.
    pub fn runs_per_point(mut self, runs: usize) -> Self {
        self.runs_per_point = runs.max(1);
        self
    }

    /// Seed of the first run; run `i` uses `base_seed + i`.
    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    fn or_base<T: Clone>(values: &[T], base: T) -> Vec<T> {
        if values.is_empty() {
            vec![base]
        } else {
            values.to_vec()
        }
    }

    fn grid_points(&self) -> Vec<GridPoint> {
        let riders = Self::or_base(&self.num_riders, self.base.num_riders);
        let zones = Self::or_base(&self.num_zones, self.base.num_zones);
        let steps = Self::or_base(&self.time_steps, self.base.time_steps);
        let policies = Self::or_base(&self.policies, self.base.policy);
        let commissions = Self::or_base(&self.commission_rates, self.base.commission_rate);

        let mut points = Vec::with_capacity(
            riders.len() * zones.len() * steps.len() * policies.len() * commissions.len(),
        );
        for &num_riders in &riders {
            for &num_zones in &zones {
                for &time_steps in &steps {
                    for &policy in &policies {
                        for &commission_rate in &commissions {
                            points.push(GridPoint {
                                num_riders,
                                num_zones,
                                time_steps,
                                policy,
                                commission_rate,
                            });
                        }
                    }
                }
            }
        }
        points
    }

    /// Expand the grid. Output order is riders, zones, steps, policy, commission
    /// (last varies fastest), then repeated runs.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::new();
        for (experiment_idx, point) in self.grid_points().into_iter().enumerate() {
            let params = self
                .base
                .clone()
                .with_riders(point.num_riders)
                .with_zones(point.num_zones)
                .with_time_steps(point.time_steps)
                .with_policy(point.policy)
                .with_commission_rate(point.commission_rate);
            for _ in 0..self.runs_per_point {
                let run_id = sets.len();
                sets.push(ParameterSet::new(
                    params.clone(),
                    format!("exp_{}", experiment_idx),
                    run_id,
                    self.base_seed.wrapping_add(run_id as u64),
                ));
            }
        }
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_space_yields_base_point() {
        let sets = ParameterSpace::grid().generate();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].params, SimulationParams::default());
        assert_eq!(sets[0].seed, DEFAULT_BASE_SEED);
        assert_eq!(sets[0].experiment_id, "exp_0");
    }

    #[test]
    fn grid_is_cartesian_product() {
        let sets = ParameterSpace::grid()
            .num_riders(vec![100, 200, 300])
            .policies(vec![DispatchPolicyKind::Greedy, DispatchPolicyKind::TabularRl])
            .commission_rate(vec![0.1, 0.2])
            .generate();
        assert_eq!(sets.len(), 12);
        assert_eq!(sets[0].params.num_riders, 100);
        assert_eq!(sets[0].params.commission_rate, 0.1);
        assert_eq!(sets[1].params.commission_rate, 0.2);
        assert_eq!(sets[2].params.policy, DispatchPolicyKind::TabularRl);
        assert_eq!(sets[11].params.num_riders, 300);
    }

    #[test]
    fn every_run_gets_its_own_seed() {
        let sets = ParameterSpace::grid()
            .num_zones(vec![4, 9])
            .runs_per_point(3)
            .base_seed(100)
            .generate();
        assert_eq!(sets.len(), 6);
        let seeds: Vec<u64> = sets.iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103, 104, 105]);
        assert_eq!(sets[2].experiment_id, "exp_0");
        assert_eq!(sets[3].experiment_id, "exp_1");
        assert_eq!(sets[4].simulation_params().seed, Some(104));
    }
}
