//! Configuration and domain-fault lock tests.
//!
//! A JSON policy drives a whole search; bad configuration is rejected
//! before the domain is touched; misbehaving domains surface as typed
//! errors rather than wrong plans or process aborts.

use std::cell::Cell;

use metronome_harness::worlds::explicit_graph::ExplicitGraph;
use metronome_search::error::PanicStageV1;
use metronome_search::{
    explicit_estimation_search, potential_search, ConfigError, SearchDomainV1, SearchError,
    SearchPolicyV1, SuccessorV1, Unbounded,
};
use serde_json::json;

/// Chain `0 → 1 → … → goal` whose callbacks can be made to misbehave at
/// one state. Counts every callback.
struct Faulty {
    goal: u32,
    fault_at: u32,
    fault: Fault,
    calls: Cell<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    PanicInSuccessors,
    PanicInHeuristic,
    NanDistance,
    NegativeCost,
}

impl Faulty {
    fn new(goal: u32, fault_at: u32, fault: Fault) -> Self {
        Self {
            goal,
            fault_at,
            fault,
            calls: Cell::new(0),
        }
    }

    fn hit(&self, state: u32, fault: Fault) -> bool {
        self.calls.set(self.calls.get() + 1);
        state == self.fault_at && self.fault == fault
    }
}

impl SearchDomainV1 for Faulty {
    type State = u32;
    type Action = u32;

    #[allow(clippy::unnecessary_literal_bound)]
    fn domain_id(&self) -> &str {
        "faulty_chain"
    }

    fn successors(&self, state: &u32) -> Vec<SuccessorV1<u32, u32>> {
        assert!(!self.hit(*state, Fault::PanicInSuccessors), "successors blew up");
        let cost = if self.hit(*state, Fault::NegativeCost) { -1.0 } else { 1.0 };
        vec![SuccessorV1 {
            state: state + 1,
            action: state + 1,
            action_cost: cost,
        }]
    }

    fn heuristic(&self, state: &u32) -> f64 {
        assert!(!self.hit(*state, Fault::PanicInHeuristic), "heuristic blew up");
        f64::from(self.goal.saturating_sub(*state))
    }

    fn distance(&self, state: &u32) -> f64 {
        if self.hit(*state, Fault::NanDistance) {
            return f64::NAN;
        }
        f64::from(self.goal.saturating_sub(*state))
    }

    fn is_goal(&self, state: &u32) -> bool {
        self.calls.set(self.calls.get() + 1);
        *state == self.goal
    }

    fn random_state(&self, seed: u64) -> u32 {
        u32::try_from(seed % u64::from(self.goal + 1)).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn json_policy_drives_search() {
    let policy = SearchPolicyV1::from_json(&json!({ "weight": 1.0, "note": "ignored" })).unwrap();
    let graph = ExplicitGraph::diamond();
    let plan = explicit_estimation_search(&graph, graph.start(), &policy, Unbounded).unwrap();
    assert!((plan.cost - 2.0).abs() < 1e-9);
}

#[test]
fn json_text_policy_round_trips_weight() {
    let policy = SearchPolicyV1::from_json_str(r#"{"weight": 2.5}"#).unwrap();
    assert!((policy.weight - 2.5).abs() < f64::EPSILON);
}

#[test]
fn missing_weight_is_rejected() {
    assert_eq!(
        SearchPolicyV1::from_json(&json!({})),
        Err(ConfigError::MissingWeight)
    );
}

#[test]
fn malformed_configs_are_rejected() {
    assert!(matches!(
        SearchPolicyV1::from_json(&json!([1.5])),
        Err(ConfigError::Malformed { .. })
    ));
    assert!(matches!(
        SearchPolicyV1::from_json_str("{weight: 1.5"),
        Err(ConfigError::Malformed { .. })
    ));
    assert!(matches!(
        SearchPolicyV1::from_json(&json!({ "weight": "heavy" })),
        Err(ConfigError::InvalidWeight { .. })
    ));
    assert!(matches!(
        SearchPolicyV1::from_json(&json!({ "weight": 0.5 })),
        Err(ConfigError::InvalidWeight { .. })
    ));
}

#[test]
fn invalid_policy_fails_before_any_domain_call() {
    let domain = Faulty::new(5, u32::MAX, Fault::None);
    let policy = SearchPolicyV1 { weight: f64::NAN };
    let err = explicit_estimation_search(&domain, 0, &policy, Unbounded).unwrap_err();
    assert!(matches!(err, SearchError::Config(ConfigError::InvalidWeight { .. })));
    let err = potential_search(&domain, 0, &policy, Unbounded).unwrap_err();
    assert!(matches!(err, SearchError::Config(ConfigError::InvalidWeight { .. })));
    assert_eq!(domain.calls.get(), 0);
}

// ---------------------------------------------------------------------------
// Domain faults
// ---------------------------------------------------------------------------

fn run(fault: Fault) -> Result<(), SearchError> {
    let domain = Faulty::new(6, 3, fault);
    let policy = SearchPolicyV1::new(1.5).unwrap();
    explicit_estimation_search(&domain, 0, &policy, Unbounded).map(|_| ())
}

#[test]
fn healthy_chain_is_solved() {
    assert_eq!(run(Fault::None), Ok(()));
}

#[test]
fn successor_panic_is_reported_with_stage() {
    assert_eq!(
        run(Fault::PanicInSuccessors),
        Err(SearchError::DomainPanic {
            stage: PanicStageV1::Successors
        })
    );
}

#[test]
fn heuristic_panic_is_reported_with_stage() {
    assert_eq!(
        run(Fault::PanicInHeuristic),
        Err(SearchError::DomainPanic {
            stage: PanicStageV1::Heuristic
        })
    );
}

#[test]
fn non_finite_distance_is_a_contract_violation() {
    assert!(matches!(
        run(Fault::NanDistance),
        Err(SearchError::DomainContractViolation { .. })
    ));
}

#[test]
fn negative_action_cost_is_a_contract_violation() {
    assert!(matches!(
        run(Fault::NegativeCost),
        Err(SearchError::DomainContractViolation { .. })
    ));
}

#[test]
fn potential_search_reports_domain_faults_too() {
    let domain = Faulty::new(6, 2, Fault::PanicInSuccessors);
    let policy = SearchPolicyV1::new(2.0).unwrap();
    assert_eq!(
        potential_search(&domain, 0, &policy, Unbounded).map(|_| ()),
        Err(SearchError::DomainPanic {
            stage: PanicStageV1::Successors
        })
    );
}
