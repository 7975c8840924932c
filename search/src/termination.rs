//! Termination checkers.
//!
//! The engine consults the checker once per loop iteration, after the
//! open-list emptiness check and before selecting a node. Reaching
//! termination ends the search with [`crate::error::SearchError::BudgetExhausted`].

use std::time::{Duration, Instant};

/// Decides when a search must give up.
pub trait TerminationCheckerV1 {
    /// Whether the search must stop now.
    fn reached_termination(&self) -> bool;

    /// Called once per expanded node.
    fn notify_expansion(&mut self);
}

/// Stops after a fixed number of expansions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionBudget {
    limit: u64,
    expanded: u64,
}

impl ExpansionBudget {
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self { limit, expanded: 0 }
    }

    #[must_use]
    pub fn expanded(&self) -> u64 {
        self.expanded
    }
}

impl TerminationCheckerV1 for ExpansionBudget {
    fn reached_termination(&self) -> bool {
        self.expanded >= self.limit
    }

    fn notify_expansion(&mut self) {
        self.expanded = self.expanded.saturating_add(1);
    }
}

/// Stops once a wall-clock deadline has passed.
///
/// The only non-deterministic checker; runs using it are not reproducible.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    /// Deadline `limit` from now.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self {
            deadline: Instant::now() + limit,
        }
    }
}

impl TerminationCheckerV1 for TimeBudget {
    fn reached_termination(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn notify_expansion(&mut self) {}
}

/// Never stops the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbounded;

impl TerminationCheckerV1 for Unbounded {
    fn reached_termination(&self) -> bool {
        false
    }

    fn notify_expansion(&mut self) {}
}

impl<T: TerminationCheckerV1 + ?Sized> TerminationCheckerV1 for &mut T {
    fn reached_termination(&self) -> bool {
        (**self).reached_termination()
    }

    fn notify_expansion(&mut self) {
        (**self).notify_expansion();
    }
}
