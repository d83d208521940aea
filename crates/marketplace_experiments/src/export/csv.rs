use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[ExperimentResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "policy",
        "num_zones",
        "num_riders",
        "num_requests",
        "time_steps",
        "commission_rate",
        "surge_sensitivity",
        "fare_min",
        "fare_max",
        "duration_min",
        "duration_max",
        "learning_rate",
        "exploration_rate",
        "total_revenue",
        "fulfillment_rate",
        "utilization",
        "completed_rides",
        "avg_surge",
        "high_surge_zones",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        wtr.write_record([
            &param_set.experiment_id,
            &param_set.run_id.to_string(),
            &param_set.seed.to_string(),
            &params.policy.as_str().to_string(),
            &params.num_zones.to_string(),
            &params.num_riders.to_string(),
            &params.num_requests.to_string(),
            &params.time_steps.to_string(),
            &params.commission_rate.to_string(),
            &params.pricing.sensitivity.to_string(),
            &params.fare_range.start.to_string(),
            &params.fare_range.end.to_string(),
            &params.ride_duration_range.start.to_string(),
            &params.ride_duration_range.end.to_string(),
            &params.tabular.learning_rate.to_string(),
            &params.tabular.exploration_rate.to_string(),
            &result.total_revenue.to_string(),
            &result.fulfillment_rate.to_string(),
            &result.utilization.to_string(),
            &result.completed_rides.to_string(),
            &result.avg_surge.to_string(),
            &result.high_surge_zones.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
