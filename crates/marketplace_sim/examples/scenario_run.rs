//! Run the default marketplace scenario under both policies and print the KPIs.
//!
//! Run with: cargo run -p marketplace_sim --example scenario_run

use marketplace_sim::{run_scenario, DispatchPolicyKind, SimulationParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const SEED: u64 = 123;

    for policy in [DispatchPolicyKind::Greedy, DispatchPolicyKind::TabularRl] {
        let params = SimulationParams::default()
            .with_seed(SEED)
            .with_policy(policy);
        println!(
            "--- {} ({} zones, {} riders, {} requests, {} steps, seed {}) ---",
            policy.as_str(),
            params.num_zones,
            params.num_riders,
            params.num_requests,
            params.time_steps,
            SEED
        );

        let output = run_scenario(params)?;
        let metrics = output.metrics;
        println!("Revenue:      {:.2}", metrics.total_revenue);
        println!(
            "Fulfillment:  {:.3} ({} of {})",
            metrics.fulfillment_rate, metrics.fulfilled_requests, metrics.num_requests
        );
        println!("Utilization:  {:.3}", metrics.utilization);

        let skipped = output
            .dispatch_records
            .iter()
            .filter(|d| d.supply > 0 && d.matches == 0 && d.demand > 0)
            .count();
        println!("Zones skipped with supply and demand: {}", skipped);

        println!("Sample allocations (first 5):");
        for (i, a) in output.allocation_records.iter().take(5).enumerate() {
            println!(
                "  {}  t={} zone={} fare={:.2} surge={:.2}",
                i + 1,
                a.timestep,
                a.zone,
                a.fare,
                a.surge
            );
        }
        println!();
    }
    Ok(())
}
