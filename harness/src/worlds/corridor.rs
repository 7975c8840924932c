//! `Corridor`: an unbounded one-dimensional walk.
//!
//! States are integer positions; every position has a step left and a step
//! right at cost 1. With no goal the state space never runs out, so only a
//! termination checker can end a search over it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use metronome_search::{SearchDomainV1, SuccessorV1};

/// Direction of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Left,
    Right,
}

/// Infinite corridor with an optional goal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corridor {
    goal: Option<i64>,
}

impl Corridor {
    /// Corridor without a goal.
    #[must_use]
    pub fn endless() -> Self {
        Self { goal: None }
    }

    #[must_use]
    pub fn with_goal(goal: i64) -> Self {
        Self { goal: Some(goal) }
    }

    fn steps_to_go(&self, position: i64) -> f64 {
        self.goal.map_or(1.0, |goal| {
            let gap = goal.abs_diff(position);
            f64::from(u32::try_from(gap).unwrap_or(u32::MAX))
        })
    }
}

impl SearchDomainV1 for Corridor {
    type State = i64;
    type Action = Step;

    #[allow(clippy::unnecessary_literal_bound)]
    fn domain_id(&self) -> &str {
        "corridor"
    }

    fn successors(&self, state: &i64) -> Vec<SuccessorV1<i64, Step>> {
        vec![
            SuccessorV1 {
                state: state - 1,
                action: Step::Left,
                action_cost: 1.0,
            },
            SuccessorV1 {
                state: state + 1,
                action: Step::Right,
                action_cost: 1.0,
            },
        ]
    }

    /// Without a goal this is the constant 1, which is admissible because
    /// no goal is ever reached.
    fn heuristic(&self, state: &i64) -> f64 {
        self.steps_to_go(*state)
    }

    fn distance(&self, state: &i64) -> f64 {
        self.steps_to_go(*state)
    }

    fn is_goal(&self, state: &i64) -> bool {
        self.goal == Some(*state)
    }

    fn random_state(&self, seed: u64) -> i64 {
        StdRng::seed_from_u64(seed).gen_range(-1000..=1000)
    }
}
