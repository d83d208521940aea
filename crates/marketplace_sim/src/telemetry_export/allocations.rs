use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::telemetry::AllocationRecord;

use super::utils::{f64_field, u64_field, write_record_batch};

pub fn write_allocations_parquet<P: AsRef<Path>>(
    path: P,
    records: &[AllocationRecord],
) -> Result<(), Box<dyn Error>> {
    let mut timestep = Vec::with_capacity(records.len());
    let mut zone = Vec::with_capacity(records.len());
    let mut fare = Vec::with_capacity(records.len());
    let mut surge = Vec::with_capacity(records.len());

    for record in records {
        timestep.push(record.timestep);
        zone.push(record.zone as u64);
        fare.push(record.fare);
        surge.push(record.surge);
    }

    let schema = Schema::new(vec![
        u64_field("timestep"),
        u64_field("zone"),
        f64_field("fare"),
        f64_field("surge"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(timestep)),
        Arc::new(UInt64Array::from(zone)),
        Arc::new(Float64Array::from(fare)),
        Arc::new(Float64Array::from(surge)),
    ];

    write_record_batch(path, schema, arrays)
}
