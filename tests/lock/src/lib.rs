//! Shared helpers for the lock tests.
//!
//! Plans are checked by replaying them against the domain: every action
//! must label a successor of the current state, the replayed costs must
//! add up to the reported cost, and the final state must be a goal.

use std::fmt::Debug;

use metronome_search::{PlanV1, SearchDomainV1};

/// Absolute tolerance for comparing summed costs.
pub const COST_EPSILON: f64 = 1e-9;

/// Replay `plan` from `root`. Returns the final state and replayed cost.
///
/// # Panics
///
/// Panics with a description of the first step that does not replay, if
/// the replayed cost differs from `plan.cost`, or if the final state is not
/// a goal. These are test-only invariants.
pub fn replay_plan<D>(domain: &D, root: &D::State, plan: &PlanV1<D::Action>) -> (D::State, f64)
where
    D: SearchDomainV1,
    D::Action: PartialEq + Debug,
{
    let mut state = root.clone();
    let mut cost = 0.0;
    for (step, action) in plan.actions.iter().enumerate() {
        let successor = domain
            .successors(&state)
            .into_iter()
            .find(|s| s.action == *action)
            .unwrap_or_else(|| panic!("step {step}: {action:?} is not available at {state:?}"));
        cost += successor.action_cost;
        state = successor.state;
    }
    assert!(
        (cost - plan.cost).abs() < COST_EPSILON,
        "replayed cost {cost} differs from reported {}",
        plan.cost
    );
    assert!(domain.is_goal(&state), "plan ends at non-goal {state:?}");
    (state, cost)
}

/// Assert `cost ≤ weight × optimal` up to rounding.
///
/// # Panics
///
/// Panics if the bound is violated.
pub fn assert_within_bound(cost: f64, optimal: f64, weight: f64, context: &str) {
    assert!(
        cost <= weight * optimal + COST_EPSILON,
        "{context}: cost {cost} exceeds {weight} × optimal {optimal}"
    );
}
