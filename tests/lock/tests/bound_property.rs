//! Suboptimality bound lock tests.
//!
//! For admissible heuristics every returned plan must cost at most
//! `weight × optimal`, where the optimum comes from the Dijkstra oracle.
//! Covered: seeded random graphs (exact and scaled-down heuristics), grid
//! regimes, and the eight puzzle under both cost models.

use lock_tests::{assert_within_bound, replay_plan};
use metronome_harness::oracle::optimal_cost;
use metronome_harness::regimes::{regime_eight_puzzle, regime_grid_room, regime_grid_terrain};
use metronome_harness::worlds::explicit_graph::ExplicitGraph;
use metronome_harness::worlds::sliding_tile::TileCost;
use metronome_search::{explicit_estimation_search, SearchError, SearchPolicyV1, Unbounded};

const WEIGHTS: [f64; 5] = [1.0, 1.2, 1.5, 2.0, 5.0];

// ---------------------------------------------------------------------------
// Random graphs
// ---------------------------------------------------------------------------

#[test]
fn random_graphs_respect_bound_with_exact_heuristic() {
    for seed in 0..25 {
        let graph = ExplicitGraph::random(seed, 30, 60, 1.0);
        let optimal = optimal_cost(&graph, &graph.start(), 10_000).expect("spine reaches goal");
        for weight in WEIGHTS {
            let policy = SearchPolicyV1::new(weight).unwrap();
            let plan = explicit_estimation_search(&graph, graph.start(), &policy, Unbounded)
                .unwrap_or_else(|e| panic!("seed {seed} weight {weight}: {e}"));
            let (_, cost) = replay_plan(&graph, &graph.start(), &plan);
            assert_within_bound(cost, optimal, weight, &format!("seed {seed}"));
        }
    }
}

#[test]
fn random_graphs_respect_bound_with_weak_heuristic() {
    for seed in 100..125 {
        let graph = ExplicitGraph::random(seed, 50, 150, 0.4);
        let optimal = optimal_cost(&graph, &graph.start(), 10_000).expect("spine reaches goal");
        for weight in WEIGHTS {
            let policy = SearchPolicyV1::new(weight).unwrap();
            let plan = explicit_estimation_search(&graph, graph.start(), &policy, Unbounded)
                .unwrap_or_else(|e| panic!("seed {seed} weight {weight}: {e}"));
            let (_, cost) = replay_plan(&graph, &graph.start(), &plan);
            assert_within_bound(cost, optimal, weight, &format!("seed {seed}"));
        }
    }
}

#[test]
fn weight_one_is_optimal_on_random_graphs() {
    for seed in 200..220 {
        let graph = ExplicitGraph::random(seed, 25, 50, 0.8);
        let optimal = optimal_cost(&graph, &graph.start(), 10_000).unwrap();
        let policy = SearchPolicyV1::new(1.0).unwrap();
        let plan = explicit_estimation_search(&graph, graph.start(), &policy, Unbounded).unwrap();
        assert!(
            (plan.cost - optimal).abs() < 1e-9,
            "seed {seed}: {} vs optimal {optimal}",
            plan.cost
        );
    }
}

// ---------------------------------------------------------------------------
// Grids
// ---------------------------------------------------------------------------

#[test]
fn grid_room_respects_bound() {
    for weight in WEIGHTS {
        let regime = regime_grid_room(weight);
        let optimal = regime.expectations.optimal_cost.unwrap();
        let plan =
            explicit_estimation_search(&regime.world, regime.root, &regime.policy, Unbounded)
                .unwrap();
        let (_, cost) = replay_plan(&regime.world, &regime.root, &plan);
        assert_within_bound(cost, optimal, weight, "grid room");
    }
}

#[test]
fn grid_terrain_matches_oracle_solvability() {
    for seed in 0..8 {
        for weight in [1.0, 2.0] {
            let regime = regime_grid_terrain(seed, weight);
            let optimal = optimal_cost(&regime.world, &regime.root, 10_000);
            let result =
                explicit_estimation_search(&regime.world, regime.root, &regime.policy, Unbounded);
            match (optimal, result) {
                (Some(optimal), Ok(plan)) => {
                    let (_, cost) = replay_plan(&regime.world, &regime.root, &plan);
                    assert_within_bound(cost, optimal, weight, &format!("terrain {seed}"));
                }
                (None, Err(SearchError::GoalNotReachable { .. })) => {}
                (optimal, result) => {
                    panic!("terrain {seed}: oracle {optimal:?} but search {result:?}")
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Eight puzzle
// ---------------------------------------------------------------------------

fn check_eight_puzzle(cost: TileCost) {
    for seed in 0..4 {
        for weight in [1.0, 1.5, 3.0] {
            let regime = regime_eight_puzzle(cost, seed, 14, weight);
            let optimal = optimal_cost(&regime.world, &regime.root, 200_000)
                .expect("scrambled boards are solvable");
            let plan = explicit_estimation_search(
                &regime.world,
                regime.root.clone(),
                &regime.policy,
                Unbounded,
            )
            .unwrap();
            let (_, replayed) = replay_plan(&regime.world, &regime.root, &plan);
            assert_within_bound(replayed, optimal, weight, &format!("{cost:?} seed {seed}"));
        }
    }
}

#[test]
fn unit_eight_puzzle_respects_bound() {
    check_eight_puzzle(TileCost::Unit);
}

#[test]
fn heavy_eight_puzzle_respects_bound() {
    check_eight_puzzle(TileCost::Heavy);
}
