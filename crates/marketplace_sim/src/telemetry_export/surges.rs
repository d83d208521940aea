use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::SurgeRecord;

use super::utils::{f64_field, u64_field, write_record_batch};

pub fn write_surge_parquet<P: AsRef<Path>>(
    path: P,
    records: &[SurgeRecord],
) -> Result<(), Box<dyn Error>> {
    let timestep: Vec<u64> = records.iter().map(|r| r.timestep).collect();
    let zone: Vec<u64> = records.iter().map(|r| r.zone as u64).collect();
    let surge: Vec<f64> = records.iter().map(|r| r.surge).collect();

    let schema = Schema::new(vec![
        u64_field("timestep"),
        u64_field("zone"),
        f64_field("surge"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(timestep)),
        Arc::new(UInt64Array::from(zone)),
        Arc::new(Float64Array::from(surge)),
    ];

    write_record_batch(path, schema, arrays)
}
