use std::collections::HashMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::policy::DispatchPolicy;
use super::types::{DispatchAction, StateKey};
use crate::error::ConfigError;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.1;
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;

/// Ratio substituted when a zone has no available supply.
pub const DEFAULT_EMPTY_SUPPLY_RATIO: f64 = 10.0;

/// Learning policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabularPolicyConfig {
    /// Step size of the incremental value update, in (0, 1].
    pub learning_rate: f64,
    /// Probability of choosing uniformly between allocate and skip, in [0, 1].
    pub exploration_rate: f64,
    /// Carried for reporting only. The value update does not bootstrap from successor
    /// states, so this factor never enters it.
    pub discount_factor: f64,
    pub empty_supply_ratio: f64,
}

impl Default for TabularPolicyConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            exploration_rate: DEFAULT_EXPLORATION_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            empty_supply_ratio: DEFAULT_EMPTY_SUPPLY_RATIO,
        }
    }
}

impl TabularPolicyConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::LearningRateOutOfRange(self.learning_rate));
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(ConfigError::ExplorationRateOutOfRange(self.exploration_rate));
        }
        Ok(())
    }
}

/// Learned values for one state, plus the cached greedy choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionValues {
    pub allocate: f64,
    pub skip: f64,
    pub best_action: DispatchAction,
}

impl Default for ActionValues {
    fn default() -> Self {
        Self {
            allocate: 0.0,
            skip: 0.0,
            best_action: DispatchAction::Allocate,
        }
    }
}

impl ActionValues {
    fn value_mut(&mut self, action: DispatchAction) -> &mut f64 {
        match action {
            DispatchAction::Allocate => &mut self.allocate,
            DispatchAction::Skip => &mut self.skip,
        }
    }

    /// Argmax over {allocate, skip}; ties go to allocate.
    fn refresh_best_action(&mut self) {
        self.best_action = if self.skip > self.allocate {
            DispatchAction::Skip
        } else {
            DispatchAction::Allocate
        };
    }
}

/// Epsilon-greedy value table over `(zone, ratio bucket)` states.
///
/// Each feedback moves the chosen action's value toward the observed reward by
/// `new = old + learning_rate * (reward - old)` and recomputes the cached best action.
/// Unseen states default to allocate.
#[derive(Debug, Clone, Default)]
pub struct TabularPolicy {
    config: TabularPolicyConfig,
    table: HashMap<StateKey, ActionValues>,
}

impl TabularPolicy {
    pub fn new(config: TabularPolicyConfig) -> Self {
        Self {
            config,
            table: HashMap::new(),
        }
    }

    pub fn state_key(&self, zone: usize, demand: usize, supply: usize) -> StateKey {
        StateKey::new(zone, demand, supply, self.config.empty_supply_ratio)
    }

    pub fn entry(&self, key: &StateKey) -> Option<&ActionValues> {
        self.table.get(key)
    }

    /// Cached greedy action for a state, or `None` if it has never received feedback.
    pub fn best_action(&self, key: &StateKey) -> Option<DispatchAction> {
        self.table.get(key).map(|values| values.best_action)
    }

    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Apply one value update for `action` in state `key`.
    pub fn update(&mut self, key: StateKey, action: DispatchAction, reward: f64) {
        let learning_rate = self.config.learning_rate;
        let values = self.table.entry(key).or_default();
        let value = values.value_mut(action);
        *value += learning_rate * (reward - *value);
        values.refresh_best_action();
        trace!(
            zone = key.zone,
            ratio = key.ratio(),
            action = action.as_str(),
            reward,
            best = values.best_action.as_str(),
            "value update"
        );
    }
}

impl DispatchPolicy for TabularPolicy {
    fn decide(
        &mut self,
        zone: usize,
        demand: usize,
        supply: usize,
        rng: &mut dyn RngCore,
    ) -> DispatchAction {
        if rng.gen_bool(self.config.exploration_rate) {
            return if rng.gen_bool(0.5) {
                DispatchAction::Allocate
            } else {
                DispatchAction::Skip
            };
        }
        let key = self.state_key(zone, demand, supply);
        self.best_action(&key).unwrap_or(DispatchAction::Allocate)
    }

    fn feedback(
        &mut self,
        zone: usize,
        demand: usize,
        supply: usize,
        action: DispatchAction,
        reward: f64,
    ) {
        let key = self.state_key(zone, demand, supply);
        self.update(key, action, reward);
    }

    fn name(&self) -> &'static str {
        "tabular_rl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn greedy_only() -> TabularPolicy {
        TabularPolicy::new(TabularPolicyConfig::default().with_exploration_rate(0.0))
    }

    #[test]
    fn unseen_states_default_to_allocate() {
        let mut policy = greedy_only();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(policy.decide(3, 4, 2, &mut rng), DispatchAction::Allocate);
        assert_eq!(policy.state_count(), 0);
    }

    #[test]
    fn update_is_incremental_average() {
        let mut policy = greedy_only();
        let key = policy.state_key(0, 1, 1);

        policy.update(key, DispatchAction::Allocate, 1.0);
        let values = *policy.entry(&key).expect("entry");
        assert!((values.allocate - 0.1).abs() < 1e-12);
        assert_eq!(values.skip, 0.0);

        policy.update(key, DispatchAction::Allocate, 1.0);
        let values = *policy.entry(&key).expect("entry");
        assert!((values.allocate - 0.19).abs() < 1e-12);
    }

    #[test]
    fn discount_factor_does_not_change_updates() {
        let mut plain = greedy_only();
        let mut discounted = TabularPolicy::new(TabularPolicyConfig {
            discount_factor: 0.0,
            exploration_rate: 0.0,
            ..Default::default()
        });
        for reward in [0.5, -1.0, 0.75, 0.2] {
            plain.feedback(1, 2, 3, DispatchAction::Allocate, reward);
            discounted.feedback(1, 2, 3, DispatchAction::Allocate, reward);
        }
        let key = plain.state_key(1, 2, 3);
        assert_eq!(plain.entry(&key), discounted.entry(&key));
    }

    #[test]
    fn penalised_allocate_flips_best_action_to_skip() {
        let mut policy = greedy_only();
        let mut rng = StdRng::seed_from_u64(2);
        policy.feedback(1, 5, 1, DispatchAction::Allocate, -1.0);

        let key = policy.state_key(1, 5, 1);
        assert_eq!(policy.best_action(&key), Some(DispatchAction::Skip));
        assert_eq!(policy.decide(1, 5, 1, &mut rng), DispatchAction::Skip);
    }

    #[test]
    fn skip_penalty_keeps_allocate_preferred() {
        let mut policy = greedy_only();
        policy.feedback(2, 0, 0, DispatchAction::Skip, -1.0);
        let key = policy.state_key(2, 0, 0);
        assert_eq!(policy.best_action(&key), Some(DispatchAction::Allocate));
    }

    #[test]
    fn ties_resolve_to_allocate() {
        let mut policy = greedy_only();
        let key = policy.state_key(0, 2, 2);
        policy.update(key, DispatchAction::Skip, 0.5);
        policy.update(key, DispatchAction::Allocate, 0.5);
        let values = *policy.entry(&key).expect("entry");
        assert_eq!(values.allocate, values.skip);
        assert_eq!(values.best_action, DispatchAction::Allocate);
    }

    #[test]
    fn positive_allocate_rewards_converge_to_allocate() {
        let mut policy = TabularPolicy::new(TabularPolicyConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let key = policy.state_key(0, 2, 2);

        // Start from a state that prefers skipping.
        policy.update(key, DispatchAction::Skip, 0.3);
        assert_eq!(policy.best_action(&key), Some(DispatchAction::Skip));

        for step in 0..500 {
            let action = policy.decide(0, 2, 2, &mut rng);
            let reward = match action {
                DispatchAction::Allocate => 0.6 + (step % 5) as f64 * 0.1,
                DispatchAction::Skip => -1.0,
            };
            policy.feedback(0, 2, 2, action, reward);
        }

        let values = policy.entry(&key).expect("entry");
        assert_eq!(values.best_action, DispatchAction::Allocate);
        assert!(values.allocate > 0.5);
    }

    #[test]
    fn full_exploration_picks_both_actions() {
        let mut policy = TabularPolicy::new(TabularPolicyConfig::default().with_exploration_rate(1.0));
        let mut rng = StdRng::seed_from_u64(4);
        let allocations = (0..1000)
            .filter(|_| policy.decide(0, 1, 1, &mut rng) == DispatchAction::Allocate)
            .count();
        assert!((350..650).contains(&allocations), "got {allocations}");
    }

    #[test]
    fn config_validation() {
        assert!(TabularPolicyConfig::default().validate().is_ok());
        assert_eq!(
            TabularPolicyConfig::default().with_learning_rate(0.0).validate(),
            Err(ConfigError::LearningRateOutOfRange(0.0))
        );
        assert_eq!(
            TabularPolicyConfig::default()
                .with_exploration_rate(-0.1)
                .validate(),
            Err(ConfigError::ExplorationRateOutOfRange(-0.1))
        );
    }
}
