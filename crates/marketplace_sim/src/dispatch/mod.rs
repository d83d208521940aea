//! Dispatch policies: per zone and timestep, decide whether to allocate riders.

pub mod greedy;
pub mod policy;
pub mod tabular;
pub mod types;

pub use greedy::GreedyPolicy;
pub use policy::DispatchPolicy;
pub use tabular::{ActionValues, TabularPolicy, TabularPolicyConfig};
pub use types::{DispatchAction, StateKey};

use crate::config::DispatchPolicyKind;

/// Build a fresh policy instance for one run. Learning state is never shared between runs.
pub fn create_dispatch_policy(
    kind: DispatchPolicyKind,
    tabular: &TabularPolicyConfig,
) -> Box<dyn DispatchPolicy> {
    match kind {
        DispatchPolicyKind::Greedy => Box::new(GreedyPolicy),
        DispatchPolicyKind::TabularRl => Box::new(TabularPolicy::new(*tabular)),
    }
}
