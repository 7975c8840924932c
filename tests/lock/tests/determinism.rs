//! Determinism lock tests.
//!
//! Every ordering ends in a creation-order tie-break and the engine holds no
//! process-wide state, so identical inputs must give identical plans and
//! identical counters, including across interleaved independent searches.

use metronome_harness::regimes::{regime_eight_puzzle, regime_grid_room, regime_grid_terrain};
use metronome_harness::worlds::explicit_graph::ExplicitGraph;
use metronome_harness::worlds::sliding_tile::TileCost;
use metronome_search::{
    explicit_estimation_search, potential_search, ExpansionBudget, SearchPolicyV1, Unbounded,
};

#[test]
fn repeated_runs_are_identical_on_grids() {
    for weight in [1.0, 1.7, 4.0] {
        let regime = regime_grid_room(weight);
        let first =
            explicit_estimation_search(&regime.world, regime.root, &regime.policy, Unbounded);
        let second =
            explicit_estimation_search(&regime.world, regime.root, &regime.policy, Unbounded);
        assert_eq!(first, second, "weight {weight}");
    }
}

#[test]
fn repeated_runs_are_identical_on_tiles() {
    for cost in [TileCost::Unit, TileCost::Heavy] {
        let regime = regime_eight_puzzle(cost, 7, 24, 2.0);
        let run = || {
            explicit_estimation_search(
                &regime.world,
                regime.root.clone(),
                &regime.policy,
                Unbounded,
            )
        };
        assert_eq!(run(), run(), "{cost:?}");
    }
}

#[test]
fn budget_failures_are_identical() {
    let regime = regime_grid_terrain(3, 1.0);
    let run = || {
        explicit_estimation_search(
            &regime.world,
            regime.root,
            &regime.policy,
            ExpansionBudget::new(40),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn interleaved_searches_do_not_interfere() {
    let graphs: Vec<ExplicitGraph> = (0..4).map(|s| ExplicitGraph::random(s, 30, 60, 0.6)).collect();
    let policy = SearchPolicyV1::new(1.5).unwrap();
    let solo: Vec<_> = graphs
        .iter()
        .map(|g| explicit_estimation_search(g, g.start(), &policy, Unbounded))
        .collect();
    let interleaved: Vec<_> = graphs
        .iter()
        .rev()
        .map(|g| explicit_estimation_search(g, g.start(), &policy, Unbounded))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    assert_eq!(solo, interleaved);
}

#[test]
fn potential_search_is_deterministic() {
    let regime = regime_grid_room(1.5);
    let run = || potential_search(&regime.world, regime.root, &regime.policy, Unbounded);
    assert_eq!(run(), run());
}
