//! Command-line front end for the marketplace simulator.
//!
//! `marketplace run` executes one simulation and prints KPIs, surge and insights.
//! `marketplace sweep` runs the rider-count grid in parallel and optionally exports it.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketplace_experiments::report::{
    insights, revenue_by_timestep, surge_heatmap, surge_summary, zone_imbalance,
};
use marketplace_experiments::runner::{run_parallel_experiments, DEFAULT_RIDER_COUNTS};
use marketplace_experiments::{export_to_csv, export_to_json, revenue_curve, ParameterSpace};
use marketplace_sim::config::{
    DEFAULT_NUM_REQUESTS, DEFAULT_NUM_RIDERS, DEFAULT_NUM_ZONES, DEFAULT_TIME_STEPS,
};
use marketplace_sim::telemetry_export::{
    write_allocations_parquet, write_dispatch_parquet, write_surge_parquet,
};
use marketplace_sim::{run_scenario, DispatchPolicyKind, SimulationParams};

#[derive(Parser)]
#[command(
    name = "marketplace",
    about = "Zone-based ride marketplace simulator with surge pricing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and print its KPIs
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Number of riders (supply)
        #[arg(long, default_value_t = DEFAULT_NUM_RIDERS)]
        riders: usize,
        /// Also compute revenue against rider counts 200..=2000
        #[arg(long)]
        curve: bool,
        /// Write allocations, surge and dispatch records as parquet into this directory
        #[arg(long, env = "MARKETPLACE_PARQUET_DIR")]
        parquet_dir: Option<PathBuf>,
    },
    /// Run the rider-count sweep in parallel
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Rider counts to sweep
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_RIDER_COUNTS)]
        riders: Vec<usize>,
        /// Repeats per rider count, each with its own seed
        #[arg(long, default_value_t = 1)]
        runs: usize,
        /// Worker threads (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,
        /// Write one CSV row per run
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write all results as a JSON array
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScenarioArgs {
    /// Number of zones
    #[arg(long, default_value_t = DEFAULT_NUM_ZONES)]
    zones: usize,
    /// Number of ride requests (demand)
    #[arg(long, default_value_t = DEFAULT_NUM_REQUESTS)]
    requests: usize,
    /// Number of timesteps
    #[arg(long, default_value_t = DEFAULT_TIME_STEPS)]
    steps: u64,
    /// Dispatch policy
    #[arg(long, value_enum, default_value_t = PolicyArg::Greedy)]
    policy: PolicyArg,
    /// Seed for reproducible runs; a random seed is drawn and logged when omitted
    #[arg(long, env = "MARKETPLACE_SEED")]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Greedy,
    Rl,
    Both,
}

impl PolicyArg {
    fn kinds(self) -> Vec<DispatchPolicyKind> {
        match self {
            PolicyArg::Greedy => vec![DispatchPolicyKind::Greedy],
            PolicyArg::Rl => vec![DispatchPolicyKind::TabularRl],
            PolicyArg::Both => vec![DispatchPolicyKind::Greedy, DispatchPolicyKind::TabularRl],
        }
    }
}

impl ScenarioArgs {
    fn resolve_seed(&self) -> u64 {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(seed, "using seed");
        seed
    }

    fn base_params(&self, riders: usize, policy: DispatchPolicyKind, seed: u64) -> SimulationParams {
        SimulationParams::default()
            .with_zones(self.zones)
            .with_riders(riders)
            .with_requests(self.requests)
            .with_time_steps(self.steps)
            .with_policy(policy)
            .with_seed(seed)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            riders,
            curve,
            parquet_dir,
        } => run(&scenario, riders, curve, parquet_dir),
        Commands::Sweep {
            scenario,
            riders,
            runs,
            threads,
            csv,
            json,
        } => sweep(&scenario, riders, runs, threads, csv, json),
    }
}

fn run(
    scenario: &ScenarioArgs,
    riders: usize,
    curve: bool,
    parquet_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let seed = scenario.resolve_seed();
    for policy in scenario.policy.kinds() {
        let params = scenario.base_params(riders, policy, seed);
        let output = run_scenario(params.clone())?;
        let metrics = output.metrics;
        let surge = surge_summary(&output.surge_records);

        println!("=== {} (seed {}) ===", policy.as_str(), seed);
        println!("Total revenue:       {:.2}", metrics.total_revenue);
        println!("Fulfillment rate:    {:.2} %", metrics.fulfillment_rate * 100.0);
        println!("Unmatched requests:  {}", metrics.unfulfilled_requests());
        println!("Rider utilization:   {:.2} %", metrics.utilization * 100.0);
        println!("Average surge:       {:.2}", surge.mean_surge);
        println!("High surge zones:    {}", surge.high_surge_zones);

        let per_step = revenue_by_timestep(&output.allocation_records, params.time_steps);
        if let Some((peak_step, peak)) = per_step
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        {
            println!("Peak fares:          {:.2} at t={}", peak, peak_step);
        }

        let imbalance = zone_imbalance(&output.allocation_records, params.num_zones, riders);
        println!(
            "Imbalance by zone:   {}",
            imbalance
                .iter()
                .map(|ratio| format!("{ratio:.2}"))
                .collect::<Vec<_>>()
                .join(" ")
        );

        println!("Surge heatmap:");
        for row in surge_heatmap(&output.surge_records, params.num_zones).rows {
            let cells: Vec<String> = row.iter().map(|s| format!("{s:.2}")).collect();
            println!("  {}", cells.join(" "));
        }

        println!("Insights:");
        for insight in insights(&metrics, surge.mean_surge) {
            println!("  - {}", insight.message());
        }

        if curve {
            println!("Revenue vs riders:");
            for point in revenue_curve(&params, &DEFAULT_RIDER_COUNTS, None)? {
                println!("  {:>5} riders  {:>12.2}", point.num_riders, point.total_revenue);
            }
        }

        if let Some(dir) = &parquet_dir {
            std::fs::create_dir_all(dir)?;
            let prefix = policy.as_str();
            write_allocations_parquet(
                dir.join(format!("{prefix}_allocations.parquet")),
                &output.allocation_records,
            )?;
            write_surge_parquet(
                dir.join(format!("{prefix}_surge.parquet")),
                &output.surge_records,
            )?;
            write_dispatch_parquet(
                dir.join(format!("{prefix}_dispatch.parquet")),
                &output.dispatch_records,
            )?;
            info!(dir = %dir.display(), policy = prefix, "parquet records written");
        }
        println!();
    }
    Ok(())
}

fn sweep(
    scenario: &ScenarioArgs,
    riders: Vec<usize>,
    runs: usize,
    threads: Option<usize>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let seed = scenario.resolve_seed();
    let base = scenario.base_params(DEFAULT_NUM_RIDERS, DispatchPolicyKind::Greedy, seed);
    let parameter_sets = ParameterSpace::grid()
        .with_base(base)
        .num_riders(riders)
        .policies(scenario.policy.kinds())
        .runs_per_point(runs)
        .base_seed(seed)
        .generate();

    let results = run_parallel_experiments(parameter_sets.clone(), threads)?;

    println!(
        "{:<10} {:>7} {:>12} {:>12} {:>12} {:>10}",
        "policy", "riders", "revenue", "fulfillment", "utilization", "avg_surge"
    );
    for result in &results {
        println!(
            "{:<10} {:>7} {:>12.2} {:>12.3} {:>12.3} {:>10.2}",
            result.policy,
            result.num_riders,
            result.total_revenue,
            result.fulfillment_rate,
            result.utilization,
            result.avg_surge
        );
    }

    if let Some(path) = csv {
        export_to_csv(&results, &parameter_sets, &path)?;
        info!(path = %path.display(), "csv written");
    }
    if let Some(path) = json {
        export_to_json(&results, &path)?;
        info!(path = %path.display(), "json written");
    }
    Ok(())
}
