//! Result export to CSV and JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::metrics::ExperimentResult;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;

/// Export results as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if file creation or serialization fails.
pub fn export_to_json(
    results: &[ExperimentResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

/// Export results with the full parameters that produced them, one row per run.
/// `results[i]` must correspond to `parameter_sets[i]`.
///
/// # Errors
///
/// Returns an error if there are no results, the two slices differ in length, or
/// writing fails.
pub fn export_to_csv(
    results: &[ExperimentResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.is_empty() {
        return Err("no experiment results to export".into());
    }
    csv::export_to_csv_impl(results, parameter_sets, File::create(path)?)
}
