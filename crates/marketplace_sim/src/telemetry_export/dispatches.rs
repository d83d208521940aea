use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array, UInt8Array};
use arrow::datatypes::Schema;

use crate::telemetry::DispatchRecord;

use super::utils::{action_code, f64_field, u64_field, u8_field, write_record_batch};

/// Write one row per (timestep, zone). `action` is encoded as 0 = allocate, 1 = skip.
pub fn write_dispatch_parquet<P: AsRef<Path>>(
    path: P,
    records: &[DispatchRecord],
) -> Result<(), Box<dyn Error>> {
    let mut timestep = Vec::with_capacity(records.len());
    let mut zone = Vec::with_capacity(records.len());
    let mut demand = Vec::with_capacity(records.len());
    let mut supply = Vec::with_capacity(records.len());
    let mut surge = Vec::with_capacity(records.len());
    let mut action = Vec::with_capacity(records.len());
    let mut matches = Vec::with_capacity(records.len());

    for record in records {
        timestep.push(record.timestep);
        zone.push(record.zone as u64);
        demand.push(record.demand as u64);
        supply.push(record.supply as u64);
        surge.push(record.surge);
        action.push(action_code(record.action));
        matches.push(record.matches as u64);
    }

    let schema = Schema::new(vec![
        u64_field("timestep"),
        u64_field("zone"),
        u64_field("demand"),
        u64_field("supply"),
        f64_field("surge"),
        u8_field("action"),
        u64_field("matches"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(timestep)),
        Arc::new(UInt64Array::from(zone)),
        Arc::new(UInt64Array::from(demand)),
        Arc::new(UInt64Array::from(supply)),
        Arc::new(Float64Array::from(surge)),
        Arc::new(UInt8Array::from(action)),
        Arc::new(UInt64Array::from(matches)),
    ];

    write_record_batch(path, schema, arrays)
}
