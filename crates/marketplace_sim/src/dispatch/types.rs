use serde::{Deserialize, Serialize};

/// Outcome of a dispatch decision for one zone in one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchAction {
    Allocate,
    Skip,
}

impl DispatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Skip => "skip",
        }
    }
}

/// Discretized learning state: zone plus the demand/supply ratio in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub zone: usize,
    /// Ratio rounded to one decimal place, stored as an integer count of tenths.
    pub ratio_bucket: u64,
}

impl StateKey {
    /// Key for a zone. With no supply the ratio is replaced by `empty_supply_ratio`.
    ///
    /// The ratio is the `f64` quotient rounded to one decimal place, half to even on the
    /// exact binary value: 0.25 buckets to 0.2, 0.15 (stored as 0.1499..) to 0.1.
    pub fn new(zone: usize, demand: usize, supply: usize, empty_supply_ratio: f64) -> Self {
        let ratio_bucket = if supply == 0 {
            (empty_supply_ratio * 10.0).round().max(0.0) as u64
        } else {
            round_to_tenths(demand as f64 / supply as f64)
        };
        Self { zone, ratio_bucket }
    }

    /// Bucketed ratio as a decimal value.
    pub fn ratio(&self) -> f64 {
        self.ratio_bucket as f64 / 10.0
    }
}

/// Float formatting rounds the exact binary value half to even, so parse its output back.
fn round_to_tenths(ratio: f64) -> u64 {
    format!("{ratio:.1}")
        .parse::<f64>()
        .map(|rounded| (rounded * 10.0).round() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_bucketed_to_tenths() {
        assert_eq!(StateKey::new(0, 1, 3, 10.0).ratio_bucket, 3); // 0.333
        assert_eq!(StateKey::new(0, 2, 3, 10.0).ratio_bucket, 7); // 0.667
        assert_eq!(StateKey::new(0, 5, 2, 10.0).ratio_bucket, 25);
        assert_eq!(StateKey::new(0, 0, 9, 10.0).ratio_bucket, 0);
    }

    #[test]
    fn ties_round_half_to_even_on_the_float_ratio() {
        // 0.25 -> 0.2
        assert_eq!(StateKey::new(2, 1, 4, 10.0).ratio_bucket, 2);
        // 0.75 -> 0.8
        assert_eq!(StateKey::new(2, 3, 4, 10.0).ratio_bucket, 8);
        // 1.25 -> 1.2
        assert_eq!(StateKey::new(2, 5, 4, 10.0).ratio_bucket, 12);
        // 0.15 is stored just below the tie -> 0.1
        assert_eq!(StateKey::new(2, 3, 20, 10.0).ratio_bucket, 1);
        // 0.35 is stored just below the tie -> 0.3
        assert_eq!(StateKey::new(2, 7, 20, 10.0).ratio_bucket, 3);
    }

    #[test]
    fn empty_supply_uses_sentinel() {
        let key = StateKey::new(4, 3, 0, 10.0);
        assert_eq!(key.zone, 4);
        assert_eq!(key.ratio_bucket, 100);
        assert_eq!(key.ratio(), 10.0);
        assert_eq!(StateKey::new(4, 0, 0, 10.0), key);
    }
}
