use rand::RngCore;

use super::types::DispatchAction;

/// Decision rule choosing whether a zone allocates riders in the current timestep.
///
/// Policies are owned by exactly one simulation run. Any randomness a policy needs is
/// drawn from the run's generator, passed in on every call.
///
/// # Examples
///
/// ```rust
/// use marketplace_sim::dispatch::{DispatchAction, DispatchPolicy, GreedyPolicy};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut policy = GreedyPolicy;
/// assert_eq!(policy.decide(0, 3, 2, &mut rng), DispatchAction::Allocate);
/// assert_eq!(policy.decide(0, 3, 0, &mut rng), DispatchAction::Skip);
/// ```
pub trait DispatchPolicy: Send {
    /// Choose an action for `zone` given this timestep's demand and available supply.
    fn decide(
        &mut self,
        zone: usize,
        demand: usize,
        supply: usize,
        rng: &mut dyn RngCore,
    ) -> DispatchAction;

    /// Observe the reward for taking `action` in the state described by
    /// `(zone, demand, supply)`. Stateless policies ignore it.
    fn feedback(
        &mut self,
        zone: usize,
        demand: usize,
        supply: usize,
        action: DispatchAction,
        reward: f64,
    );

    /// Short identifier used in logs and exports.
    fn name(&self) -> &'static str;
}
