//! `GridWorld`: 4-connected grid parsed from an ASCII map.
//!
//! Map legend:
//!
//! | char      | meaning                                   |
//! |-----------|-------------------------------------------|
//! | `.`       | open cell, entering costs 1               |
//! | `1`..=`9` | open cell, entering costs the digit       |
//! | `#`       | wall                                      |
//! | `S`       | start (open, cost 1)                      |
//! | `G`       | goal (open, cost 1); several are allowed  |
//!
//! Heuristic and distance are the Manhattan distance to the nearest goal.
//! Every move costs at least 1, so the heuristic is admissible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use metronome_search::{SearchDomainV1, SuccessorV1};

/// A cell position, `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// One move of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

/// Reasons an ASCII map is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    Empty,
    Ragged { row: usize },
    UnknownCell { row: usize, col: usize, found: char },
    MissingStart,
    DuplicateStart,
    MissingGoal,
}

/// Grid world over a rectangular map.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    /// Entry cost per cell; `None` is a wall.
    cells: Vec<Option<u8>>,
    start: Cell,
    goals: Vec<Cell>,
}

impl GridWorld {
    /// Parse an ASCII map. Leading and trailing blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridParseError`] if the map is empty or ragged, contains an
    /// unknown character, or does not have exactly one start and at least
    /// one goal.
    pub fn parse(map: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.is_empty() || width == 0 {
            return Err(GridParseError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut goals = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(GridParseError::Ragged { row });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => None,
                    '.' => Some(1),
                    'S' => {
                        if start.replace(Cell { row, col }).is_some() {
                            return Err(GridParseError::DuplicateStart);
                        }
                        Some(1)
                    }
                    'G' => {
                        goals.push(Cell { row, col });
                        Some(1)
                    }
                    '1'..='9' => ch.to_digit(10).and_then(|d| u8::try_from(d).ok()),
                    found => return Err(GridParseError::UnknownCell { row, col, found }),
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or(GridParseError::MissingStart)?;
        if goals.is_empty() {
            return Err(GridParseError::MissingGoal);
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
            start,
            goals,
        })
    }

    /// `width × height` map whose cell costs come from `cost`, called in
    /// row-major order. `start` and `goal` are forced open at cost 1.
    #[must_use]
    pub fn from_fn(
        width: usize,
        height: usize,
        start: Cell,
        goal: Cell,
        mut cost: impl FnMut(Cell) -> Option<u8>,
    ) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let cell = Cell { row, col };
                cells.push(if cell == start || cell == goal {
                    Some(1)
                } else {
                    cost(cell)
                });
            }
        }
        Self {
            width,
            height,
            cells,
            start,
            goals: vec![goal],
        }
    }

    /// Seeded `width × height` map with start top-left, goal bottom-right,
    /// and roughly `wall_percent`% walls elsewhere. The result may have no
    /// route to the goal.
    #[must_use]
    pub fn random(seed: u64, width: usize, height: usize, wall_percent: u8) -> Self {
        let width = width.max(2);
        let height = height.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let start = Cell { row: 0, col: 0 };
        let goal = Cell {
            row: height - 1,
            col: width - 1,
        };
        Self::from_fn(width, height, start, goal, |_| {
            if rng.gen_range(0..100) < wall_percent {
                None
            } else {
                Some(rng.gen_range(1..=3))
            }
        })
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    /// Entry cost of `cell`, or `None` for walls and out-of-range cells.
    #[must_use]
    pub fn cost(&self, cell: Cell) -> Option<f64> {
        if cell.row >= self.height || cell.col >= self.width {
            return None;
        }
        self.cells[cell.row * self.width + cell.col].map(f64::from)
    }

    /// Cell reached by `step` from `cell`, if it is inside the map.
    #[must_use]
    pub fn neighbor(&self, cell: Cell, step: Move) -> Option<Cell> {
        let Cell { row, col } = cell;
        let next = match step {
            Move::Up => Cell {
                row: row.checked_sub(1)?,
                col,
            },
            Move::Down => Cell { row: row + 1, col },
            Move::Left => Cell {
                row,
                col: col.checked_sub(1)?,
            },
            Move::Right => Cell { row, col: col + 1 },
        };
        (next.row < self.height && next.col < self.width).then_some(next)
    }

    fn manhattan_to_goal(&self, cell: Cell) -> f64 {
        let nearest = self
            .goals
            .iter()
            .map(|g| g.row.abs_diff(cell.row) + g.col.abs_diff(cell.col))
            .min()
            .unwrap_or(0);
        f64::from(u32::try_from(nearest).unwrap_or(u32::MAX))
    }
}

impl SearchDomainV1 for GridWorld {
    type State = Cell;
    type Action = Move;

    #[allow(clippy::unnecessary_literal_bound)]
    fn domain_id(&self) -> &str {
        "grid_world"
    }

    fn successors(&self, state: &Cell) -> Vec<SuccessorV1<Cell, Move>> {
        [Move::Up, Move::Down, Move::Left, Move::Right]
            .into_iter()
            .filter_map(|step| {
                let next = self.neighbor(*state, step)?;
                let action_cost = self.cost(next)?;
                Some(SuccessorV1 {
                    state: next,
                    action: step,
                    action_cost,
                })
            })
            .collect()
    }

    fn heuristic(&self, state: &Cell) -> f64 {
        self.manhattan_to_goal(*state)
    }

    fn distance(&self, state: &Cell) -> f64 {
        self.manhattan_to_goal(*state)
    }

    fn is_goal(&self, state: &Cell) -> bool {
        self.goals.contains(state)
    }

    fn random_state(&self, seed: u64) -> Cell {
        let mut rng = StdRng::seed_from_u64(seed);
        let open: Vec<usize> = (0..self.cells.len())
            .filter(|&i| self.cells[i].is_some())
            .collect();
        let index = open[rng.gen_range(0..open.len())];
        Cell {
            row: index / self.width,
            col: index % self.width,
        }
    }
}
