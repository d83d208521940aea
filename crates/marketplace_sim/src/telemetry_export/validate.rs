use crate::dispatch::DispatchAction;
use crate::pricing::{MAX_SURGE_MULTIPLIER, MIN_SURGE_MULTIPLIER};
use crate::telemetry::DispatchRecord;

/// Checks a dispatch record for internal consistency:
/// matches never exceed min(demand, supply), a skip never matches,
/// and the surge lies within the default band.
/// Returns an error message if validation fails, None if valid.
pub fn validate_dispatch_record(record: &DispatchRecord) -> Option<String> {
    let cap = record.demand.min(record.supply);
    if record.matches > cap {
        return Some(format!(
            "Dispatch t={} zone={}: matches ({}) > min(demand, supply) ({})",
            record.timestep, record.zone, record.matches, cap
        ));
    }
    if record.action == DispatchAction::Skip && record.matches > 0 {
        return Some(format!(
            "Dispatch t={} zone={}: skipped zone has {} matches",
            record.timestep, record.zone, record.matches
        ));
    }
    if !(MIN_SURGE_MULTIPLIER..=MAX_SURGE_MULTIPLIER).contains(&record.surge) {
        return Some(format!(
            "Dispatch t={} zone={}: surge {} outside [{}, {}]",
            record.timestep, record.zone, record.surge, MIN_SURGE_MULTIPLIER, MAX_SURGE_MULTIPLIER
        ));
    }
    None
}
