use rand::RngCore;

use super::policy::DispatchPolicy;
use super::types::DispatchAction;

/// Baseline policy: allocate whenever the zone has any available rider.
///
/// Stateless and deterministic; it never consumes randomness and ignores feedback.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPolicy;

impl DispatchPolicy for GreedyPolicy {
    fn decide(
        &mut self,
        _zone: usize,
        _demand: usize,
        supply: usize,
        _rng: &mut dyn RngCore,
    ) -> DispatchAction {
        if supply > 0 {
            DispatchAction::Allocate
        } else {
            DispatchAction::Skip
        }
    }

    fn feedback(
        &mut self,
        _zone: usize,
        _demand: usize,
        _supply: usize,
        _action: DispatchAction,
        _reward: f64,
    ) {
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
