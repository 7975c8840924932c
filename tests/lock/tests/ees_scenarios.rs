//! End-to-end EES scenarios on hand-built fixtures.
//!
//! - trivial domain: the root is the goal
//! - diamond with a perfect heuristic and weight 1
//! - misleading diamond with weight 10
//! - endless corridor with an expansion budget

use lock_tests::{assert_within_bound, replay_plan};
use metronome_harness::worlds::corridor::Corridor;
use metronome_harness::worlds::explicit_graph::{ExplicitGraph, GraphEdge};
use metronome_search::search::StepOutcome;
use metronome_search::{
    explicit_estimation_search, ExpansionBudget, ExplicitEstimationSearch, SearchError,
    SearchPolicyV1, Unbounded,
};

fn policy(weight: f64) -> SearchPolicyV1 {
    SearchPolicyV1::new(weight).expect("valid weight")
}

// ---------------------------------------------------------------------------
// Trivial domain
// ---------------------------------------------------------------------------

#[test]
fn root_goal_returns_empty_plan() {
    let mut graph = ExplicitGraph::with_labels(&["only"]);
    graph.add_goal(0);
    let plan = explicit_estimation_search(&graph, 0, &policy(1.0), Unbounded).unwrap();
    assert!(plan.actions.is_empty());
    assert_eq!(plan.stats.expanded_nodes, 0);
    assert_eq!(plan.stats.generated_nodes, 0);
}

// ---------------------------------------------------------------------------
// Diamond, perfect heuristic
// ---------------------------------------------------------------------------

#[test]
fn diamond_returns_cheapest_route() {
    let graph = ExplicitGraph::diamond();
    let plan = explicit_estimation_search(&graph, graph.start(), &policy(1.0), Unbounded).unwrap();
    assert_eq!(
        plan.actions,
        vec![GraphEdge { from: 0, to: 1 }, GraphEdge { from: 1, to: 3 }]
    );
    assert_eq!(graph.route(&plan.actions), vec!["start", "a", "goal"]);
    let (_, cost) = replay_plan(&graph, &graph.start(), &plan);
    assert!((cost - 2.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Diamond, misleading heuristic, weight 10
// ---------------------------------------------------------------------------

#[test]
fn misleading_diamond_stays_within_bound() {
    let graph = ExplicitGraph::misleading_diamond();
    let plan = explicit_estimation_search(&graph, graph.start(), &policy(10.0), Unbounded).unwrap();
    let (_, cost) = replay_plan(&graph, &graph.start(), &plan);
    assert_within_bound(cost, 2.0, 10.0, "misleading diamond");
}

#[test]
fn misleading_diamond_prefers_focal_route_through_b() {
    let graph = ExplicitGraph::misleading_diamond();
    let plan = explicit_estimation_search(&graph, graph.start(), &policy(10.0), Unbounded).unwrap();
    // `b` looks one step from the goal and enters focal first; its route
    // costs 6, inside the bound of 20.
    assert_eq!(graph.route(&plan.actions), vec!["start", "b", "goal"]);
    assert!((plan.cost - 6.0).abs() < 1e-9);
    assert!(plan.stats.focal_selections >= 2);
}

#[test]
fn misleading_diamond_with_weight_one_is_optimal() {
    let graph = ExplicitGraph::misleading_diamond();
    let plan = explicit_estimation_search(&graph, graph.start(), &policy(1.0), Unbounded).unwrap();
    assert!((plan.cost - 2.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Budget exhaustion
// ---------------------------------------------------------------------------

#[test]
fn endless_corridor_exhausts_budget() {
    let err = explicit_estimation_search(
        &Corridor::endless(),
        0,
        &policy(2.0),
        ExpansionBudget::new(25),
    )
    .unwrap_err();
    assert_eq!(err, SearchError::BudgetExhausted { expanded: 25 });
}

#[test]
fn finite_dead_end_reports_unreachable_not_budget() {
    let mut graph = ExplicitGraph::with_labels(&["start", "mid", "island"]);
    graph.add_edge(0, 1, 1.0);
    graph.add_goal(2);
    let err = explicit_estimation_search(&graph, 0, &policy(2.0), ExpansionBudget::new(25))
        .unwrap_err();
    assert_eq!(err, SearchError::GoalNotReachable { expanded: 2 });
}

#[test]
fn budget_counts_are_caller_visible() {
    let mut budget = ExpansionBudget::new(10);
    let err =
        explicit_estimation_search(&Corridor::endless(), 0, &policy(1.0), &mut budget).unwrap_err();
    assert!(matches!(err, SearchError::BudgetExhausted { .. }));
    assert_eq!(budget.expanded(), 10);
}

#[test]
fn corridor_with_goal_is_solved_in_a_straight_line() {
    let corridor = Corridor::with_goal(12);
    let plan = explicit_estimation_search(&corridor, 0, &policy(1.5), Unbounded).unwrap();
    assert_eq!(plan.actions.len(), 12);
    replay_plan(&corridor, &0, &plan);
}

// ---------------------------------------------------------------------------
// Engine invariants along a whole run
// ---------------------------------------------------------------------------

#[test]
fn invariants_hold_on_random_graphs() {
    for seed in 0..10 {
        let graph = ExplicitGraph::random(seed, 40, 80, 0.7);
        let policy = policy(1.5);
        let mut engine = ExplicitEstimationSearch::new(&graph, graph.start(), &policy).unwrap();
        loop {
            engine.check_invariants().unwrap();
            match engine.step().unwrap() {
                StepOutcome::Expanded(_) => {}
                StepOutcome::Goal(id) => {
                    let plan = engine.plan(id).unwrap();
                    replay_plan(&graph, &graph.start(), &plan);
                    break;
                }
                StepOutcome::Exhausted => {
                    panic!("seed {seed}: goal is reachable by construction")
                }
            }
        }
    }
}
