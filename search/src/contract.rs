//! Search domain contract trait.

use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{PanicStageV1, SearchError};

/// One outgoing transition from a state.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessorV1<S, A> {
    /// The state reached.
    pub state: S,
    /// The transition label.
    pub action: A,
    /// Cost of taking `action` (must be finite and >= 0).
    pub action_cost: f64,
}

/// Capability set a planning domain exposes to the search engines.
///
/// # Contract
///
/// - All methods are pure from the engine's point of view: same input, same
///   output, no I/O.
/// - `successors` returns a finite list; duplicates are tolerated.
/// - `heuristic` is finite and non-negative. Admissibility is assumed by the
///   quality bound but is not checked.
/// - `distance` is a rough, non-negative estimate of the number of steps
///   remaining to a goal.
/// - The root state's "no-operation" action is represented by `None` in
///   [`crate::node::SearchNodeV1::action`]; domains do not supply one.
pub trait SearchDomainV1 {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Debug;

    /// Identifier used in logs.
    fn domain_id(&self) -> &str;

    /// Enumerate every transition out of `state`.
    fn successors(&self, state: &Self::State) -> Vec<SuccessorV1<Self::State, Self::Action>>;

    /// Estimated cost-to-go from `state`.
    fn heuristic(&self, state: &Self::State) -> f64;

    /// Estimated number of steps-to-go from `state`.
    fn distance(&self, state: &Self::State) -> f64;

    /// Test whether `state` satisfies the goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// A state drawn deterministically from `seed`, for seeding experiments
    /// and tests.
    fn random_state(&self, seed: u64) -> Self::State;
}

/// Run a domain callback, turning a panic into [`SearchError::DomainPanic`].
pub(crate) fn guarded<T>(stage: PanicStageV1, f: impl FnOnce() -> T) -> Result<T, SearchError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| SearchError::DomainPanic { stage })
}

/// Heuristic and distance estimates of a state, validated against the contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StateEstimate {
    pub heuristic: f64,
    pub distance: f64,
}

pub(crate) fn estimate<D: SearchDomainV1>(
    domain: &D,
    state: &D::State,
) -> Result<StateEstimate, SearchError> {
    let heuristic = guarded(PanicStageV1::Heuristic, || domain.heuristic(state))?;
    if !(heuristic.is_finite() && heuristic >= 0.0) {
        return Err(SearchError::DomainContractViolation {
            detail: format!("heuristic {heuristic} for {state:?} is not a finite non-negative value"),
        });
    }
    let distance = guarded(PanicStageV1::Distance, || domain.distance(state))?;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(SearchError::DomainContractViolation {
            detail: format!("distance {distance} for {state:?} is not a finite non-negative value"),
        });
    }
    Ok(StateEstimate {
        heuristic,
        distance,
    })
}

pub(crate) fn successors<D: SearchDomainV1>(
    domain: &D,
    state: &D::State,
) -> Result<Vec<SuccessorV1<D::State, D::Action>>, SearchError> {
    let successors = guarded(PanicStageV1::Successors, || domain.successors(state))?;
    if let Some(bad) = successors
        .iter()
        .find(|s| !(s.action_cost.is_finite() && s.action_cost >= 0.0))
    {
        return Err(SearchError::DomainContractViolation {
            detail: format!(
                "action {:?} from {state:?} has cost {}",
                bad.action, bad.action_cost
            ),
        });
    }
    Ok(successors)
}

pub(crate) fn is_goal<D: SearchDomainV1>(domain: &D, state: &D::State) -> Result<bool, SearchError> {
    guarded(PanicStageV1::IsGoal, || domain.is_goal(state))
}
