//! `SlidingTile`: the `n × n` sliding-tile puzzle.
//!
//! The goal board is `0, 1, …, n²-1` in row-major order with the blank
//! (`0`) top-left. An action slides the blank one cell. Two cost models:
//!
//! - [`TileCost::Unit`]: every move costs 1.
//! - [`TileCost::Heavy`]: a move costs the face value of the tile that
//!   moves, so heavy tiles are expensive to disturb.
//!
//! The heuristic is the Manhattan distance of every tile to its home,
//! weighted by face value under `Heavy`; the distance estimate is always the
//! plain Manhattan sum. Both are admissible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use metronome_search::{SearchDomainV1, SuccessorV1};

/// Cost model of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCost {
    Unit,
    Heavy,
}

/// Direction the blank moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slide {
    Up,
    Down,
    Left,
    Right,
}

const SLIDES: [Slide; 4] = [Slide::Up, Slide::Down, Slide::Left, Slide::Right];

/// A board: `tiles[cell]` is the tile at `cell`, `0` is the blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Board {
    tiles: Vec<u8>,
    blank: usize,
}

impl Board {
    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }
}

/// Puzzle configuration.
#[derive(Debug, Clone)]
pub struct SlidingTile {
    side: usize,
    cost: TileCost,
}

impl SlidingTile {
    /// `side × side` puzzle; `side` is clamped to `2..=15`.
    #[must_use]
    pub fn new(side: usize, cost: TileCost) -> Self {
        Self {
            side: side.clamp(2, 15),
            cost,
        }
    }

    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn goal(&self) -> Board {
        let cells = self.side * self.side;
        Board {
            tiles: (0..cells)
                .map(|t| u8::try_from(t).unwrap_or(u8::MAX))
                .collect(),
            blank: 0,
        }
    }

    /// Build a board from tiles in row-major order.
    ///
    /// Returns `None` unless `tiles` is a permutation of `0..side²`.
    /// Solvability is not checked.
    #[must_use]
    pub fn board(&self, tiles: &[u8]) -> Option<Board> {
        let cells = self.side * self.side;
        if tiles.len() != cells {
            return None;
        }
        let mut seen = vec![false; cells];
        for &tile in tiles {
            let slot = seen.get_mut(usize::from(tile))?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        let blank = tiles.iter().position(|&t| t == 0)?;
        Some(Board {
            tiles: tiles.to_vec(),
            blank,
        })
    }

    /// Board reached by a seeded random walk of `moves` slides from the
    /// goal. Always solvable, never more than `moves` optimal steps away.
    #[must_use]
    pub fn scrambled(&self, seed: u64, moves: usize) -> Board {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = self.goal();
        let mut previous: Option<usize> = None;
        for _ in 0..moves {
            let options: Vec<(Slide, usize)> = SLIDES
                .iter()
                .filter_map(|&s| self.target(board.blank, s).map(|cell| (s, cell)))
                .filter(|&(_, cell)| Some(cell) != previous)
                .collect();
            let (_, cell) = options[rng.gen_range(0..options.len())];
            previous = Some(board.blank);
            board = apply(&board, cell);
        }
        board
    }

    /// Cell the blank moves to, if it stays on the board.
    fn target(&self, blank: usize, slide: Slide) -> Option<usize> {
        let (row, col) = (blank / self.side, blank % self.side);
        match slide {
            Slide::Up => row.checked_sub(1).map(|r| r * self.side + col),
            Slide::Down => (row + 1 < self.side).then_some((row + 1) * self.side + col),
            Slide::Left => col.checked_sub(1).map(|c| row * self.side + c),
            Slide::Right => (col + 1 < self.side).then_some(row * self.side + col + 1),
        }
    }

    fn tile_cost(&self, tile: u8) -> f64 {
        match self.cost {
            TileCost::Unit => 1.0,
            TileCost::Heavy => f64::from(tile),
        }
    }

    /// Sum over tiles of `weight(tile) × manhattan(tile)`.
    fn manhattan(&self, board: &Board, weighted: bool) -> f64 {
        board
            .tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != 0)
            .map(|(cell, &tile)| {
                let home = usize::from(tile);
                let steps = (cell / self.side).abs_diff(home / self.side)
                    + (cell % self.side).abs_diff(home % self.side);
                let steps = f64::from(u32::try_from(steps).unwrap_or(u32::MAX));
                if weighted {
                    steps * self.tile_cost(tile)
                } else {
                    steps
                }
            })
            .sum()
    }
}

fn apply(board: &Board, cell: usize) -> Board {
    let mut next = board.clone();
    next.tiles.swap(board.blank, cell);
    next.blank = cell;
    next
}

impl SearchDomainV1 for SlidingTile {
    type State = Board;
    type Action = Slide;

    #[allow(clippy::unnecessary_literal_bound)]
    fn domain_id(&self) -> &str {
        match self.cost {
            TileCost::Unit => "sliding_tile_unit",
            TileCost::Heavy => "sliding_tile_heavy",
        }
    }

    fn successors(&self, state: &Board) -> Vec<SuccessorV1<Board, Slide>> {
        SLIDES
            .iter()
            .filter_map(|&slide| {
                let cell = self.target(state.blank, slide)?;
                Some(SuccessorV1 {
                    state: apply(state, cell),
                    action: slide,
                    action_cost: self.tile_cost(state.tiles[cell]),
                })
            })
            .collect()
    }

    fn heuristic(&self, state: &Board) -> f64 {
        self.manhattan(state, true)
    }

    fn distance(&self, state: &Board) -> f64 {
        self.manhattan(state, false)
    }

    fn is_goal(&self, state: &Board) -> bool {
        state.blank == 0 && state.tiles.iter().enumerate().all(|(i, &t)| usize::from(t) == i)
    }

    fn random_state(&self, seed: u64) -> Board {
        self.scrambled(seed, self.side * self.side * 4)
    }
}
