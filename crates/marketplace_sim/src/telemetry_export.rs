//! Parquet export of the simulation record streams.

mod allocations;
mod dispatches;
mod surges;
mod utils;
mod validate;

pub use allocations::write_allocations_parquet;
pub use dispatches::write_dispatch_parquet;
pub use surges::write_surge_parquet;
pub use validate::validate_dispatch_record;
