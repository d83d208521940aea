//! Parallel experimentation and reporting on top of `marketplace_sim`.
//!
//! Runs many independent simulations across a parameter grid, reduces their output into
//! comparable results and dashboard-style reports, and exports them to CSV/JSON.
//!
//! # Quick Start
//!
//! ```no_run
//! use marketplace_experiments::{run_parallel_experiments, ParameterSpace};
//! use marketplace_sim::DispatchPolicyKind;
//!
//! let sets = ParameterSpace::grid()
//!     .num_riders(vec![400, 800])
//!     .policies(vec![DispatchPolicyKind::Greedy, DispatchPolicyKind::TabularRl])
//!     .base_seed(7)
//!     .generate();
//!
//! let results = run_parallel_experiments(sets, None).expect("valid grid");
//! assert_eq!(results.len(), 4);
//! ```
//!
//! - [`parameters`]: grid definition and per-run seeds
//! - [`runner`]: rayon execution and the revenue-vs-riders curve
//! - [`metrics`]: per-run result rows
//! - [`report`]: per-timestep, per-zone and surge reductions plus insights
//! - [`export`]: CSV/JSON writers

pub mod error;
pub mod export;
pub mod metrics;
pub mod parameters;
pub mod report;
pub mod runner;

pub use error::ExperimentError;
pub use export::{export_to_csv, export_to_json};
pub use metrics::ExperimentResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use report::{insights, Insight, SurgeHeatmap, SurgeSummary};
pub use runner::{revenue_curve, run_parallel_experiments, RevenuePoint};
