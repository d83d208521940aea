//! Parallel simulation execution using rayon.
//!
//! Every run builds its own simulation, generator and policy, so runs share nothing and
//! can execute on any worker in any order. Results come back in input order.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use marketplace_sim::{run_scenario, SimulationParams};

use crate::error::ExperimentError;
use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

/// Rider counts swept by default: 200 to 2000 in steps of 300.
pub const DEFAULT_RIDER_COUNTS: [usize; 7] = [200, 500, 800, 1100, 1400, 1700, 2000];

/// Run one parameter set to completion.
pub fn run_single_simulation(param_set: &ParameterSet) -> Result<ExperimentResult, ExperimentError> {
    let output = run_scenario(param_set.simulation_params())?;
    Ok(ExperimentResult::from_output(param_set, &output))
}

/// Run every parameter set in parallel with a progress bar.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Result<Vec<ExperimentResult>, ExperimentError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Run every parameter set in parallel.
///
/// `num_threads` of `None` uses rayon's default. Fails with the first invalid
/// configuration encountered.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<ExperimentResult>, ExperimentError> {
    let total = parameter_sets.len();
    info!(runs = total, threads = ?num_threads, "starting parallel experiments");

    let pb = progress_bar(total, show_progress);
    let pool = build_pool(num_threads)?;

    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }
    results
}

/// One point of the revenue-vs-supply curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub num_riders: usize,
    pub total_revenue: f64,
    pub fulfillment_rate: f64,
    pub utilization: f64,
}

/// Rerun `base` once per rider count, in parallel, and report revenue for each.
///
/// All points share `base.seed`; with no seed each point draws its own entropy.
pub fn revenue_curve(
    base: &SimulationParams,
    rider_counts: &[usize],
    num_threads: Option<usize>,
) -> Result<Vec<RevenuePoint>, ExperimentError> {
    let pool = build_pool(num_threads)?;
    pool.install(|| {
        rider_counts
            .par_iter()
            .map(|&num_riders| {
                let output = run_scenario(base.clone().with_riders(num_riders))?;
                Ok::<_, ExperimentError>(RevenuePoint {
                    num_riders,
                    total_revenue: output.metrics.total_revenue,
                    fulfillment_rate: output.metrics.fulfillment_rate,
                    utilization: output.metrics.utilization,
                })
            })
            .collect()
    })
}

fn build_pool(num_threads: Option<usize>) -> Result<rayon::ThreadPool, ExperimentError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    Ok(builder.build()?)
}

fn progress_bar(total: usize, show_progress: bool) -> Option<ProgressBar> {
    if !show_progress || total == 0 {
        return None;
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    Some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterSpace;
    use marketplace_sim::DispatchPolicyKind;

    fn small_base() -> SimulationParams {
        SimulationParams::new(4, 40, 300, 10, false)
    }

    #[test]
    fn test_single_simulation() {
        let sets = ParameterSpace::grid().with_base(small_base()).generate();
        let result = run_single_simulation(&sets[0]).expect("valid params");
        assert_eq!(result.num_riders, 40);
        assert_eq!(result.policy, "greedy");
        assert!(result.completed_rides > 0);
        assert!((0.0..=1.0).contains(&result.fulfillment_rate));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sets = ParameterSpace::grid()
            .with_base(small_base())
            .num_riders(vec![10, 40])
            .policies(vec![DispatchPolicyKind::Greedy, DispatchPolicyKind::TabularRl])
            .generate();
        let parallel =
            run_parallel_experiments_with_progress(sets.clone(), Some(2), false).expect("valid");
        let sequential: Vec<ExperimentResult> = sets
            .iter()
            .map(|set| run_single_simulation(set).expect("valid"))
            .collect();

        assert_eq!(parallel.len(), 4);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn invalid_set_fails_the_sweep() {
        let sets = ParameterSpace::grid()
            .with_base(small_base())
            .num_zones(vec![2, 0])
            .generate();
        let err = run_parallel_experiments_with_progress(sets, Some(1), false)
            .expect_err("zero zones");
        assert!(matches!(err, ExperimentError::Config(_)));
    }

    #[test]
    fn single_run_wraps_config_errors() {
        let sets = ParameterSpace::grid()
            .with_base(small_base().with_time_steps(0))
            .generate();
        let err = run_single_simulation(&sets[0]).expect_err("zero steps");
        assert!(matches!(
            err,
            ExperimentError::Config(marketplace_sim::ConfigError::NoTimeSteps)
        ));
    }

    #[test]
    fn revenue_curve_keeps_input_order() {
        let base = small_base().with_seed(5);
        let curve = revenue_curve(&base, &[0, 20, 40], Some(2)).expect("valid params");
        let riders: Vec<usize> = curve.iter().map(|p| p.num_riders).collect();
        assert_eq!(riders, vec![0, 20, 40]);
        assert_eq!(curve[0].total_revenue, 0.0);
        assert!(curve[2].total_revenue > 0.0);
    }
}
