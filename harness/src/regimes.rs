//! Canonical regime constructors.
//!
//! Each regime returns `(world, root, policy, expectations)` as a matched
//! set. Tests and benchmarks use these constructors rather than building
//! worlds directly, so the world shape, the weight, and the expected
//! outcome cannot drift apart.

use metronome_search::SearchPolicyV1;

use crate::worlds::grid_world::{Cell, GridWorld};
use crate::worlds::sliding_tile::{Board, SlidingTile, TileCost};

/// Test-side expectations for a regime.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeExpectations {
    /// Whether a solution is guaranteed to exist.
    pub solvable: bool,
    /// Optimal plan cost, when known without running the oracle.
    pub optimal_cost: Option<f64>,
}

/// A matched world, root, policy, and expectations.
pub struct Regime<W, S> {
    pub world: W,
    pub root: S,
    pub policy: SearchPolicyV1,
    pub expectations: RegimeExpectations,
}

fn policy(weight: f64) -> SearchPolicyV1 {
    SearchPolicyV1 { weight }
}

/// Open 32×32 room split by a wall with one gap near the bottom.
#[must_use]
pub fn regime_grid_room(bound: f64) -> Regime<GridWorld, Cell> {
    let side = 32;
    let gap_row = side - 3;
    let world = GridWorld::from_fn(
        side,
        side,
        Cell { row: 0, col: 0 },
        Cell {
            row: side - 1,
            col: side - 1,
        },
        |cell| (cell.col != side / 2 || cell.row == gap_row).then_some(1),
    );
    Regime {
        root: world.start(),
        world,
        policy: policy(bound),
        expectations: RegimeExpectations {
            solvable: true,
            // Down to the gap row, right to the far wall, down to the goal.
            optimal_cost: Some(62.0),
        },
    }
}

/// Seeded random 40×40 terrain with 25% walls and costs 1–3.
#[must_use]
pub fn regime_grid_terrain(seed: u64, bound: f64) -> Regime<GridWorld, Cell> {
    let world = GridWorld::random(seed, 40, 40, 25);
    Regime {
        root: world.start(),
        world,
        policy: policy(bound),
        expectations: RegimeExpectations {
            solvable: false,
            optimal_cost: None,
        },
    }
}

/// 3×3 puzzle scrambled by `moves` random slides under `cost`.
#[must_use]
pub fn regime_eight_puzzle(
    cost: TileCost,
    seed: u64,
    moves: usize,
    bound: f64,
) -> Regime<SlidingTile, Board> {
    let world = SlidingTile::new(3, cost);
    Regime {
        root: world.scrambled(seed, moves),
        world,
        policy: policy(bound),
        expectations: RegimeExpectations {
            solvable: true,
            optimal_cost: None,
        },
    }
}

/// 4×4 puzzle scrambled by `moves` random slides under `cost`.
#[must_use]
pub fn regime_fifteen_puzzle(
    cost: TileCost,
    seed: u64,
    moves: usize,
    bound: f64,
) -> Regime<SlidingTile, Board> {
    let world = SlidingTile::new(4, cost);
    Regime {
        root: world.scrambled(seed, moves),
        world,
        policy: policy(bound),
        expectations: RegimeExpectations {
            solvable: true,
            optimal_cost: None,
        },
    }
}
