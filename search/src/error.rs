//! Typed search errors.
//!
//! Every failure of a search call is one of these values. Business
//! outcomes (`GoalNotReachable`, `BudgetExhausted`) are kept distinct so a
//! caller can tell "no solution under this expansion" from "ran out of
//! budget". Internal-consistency defects are reported as
//! [`SearchError::InvariantViolation`] and abort the search on the spot;
//! no partial plan is ever returned.

use thiserror::Error;

use crate::bucket::BucketError;
use crate::indexed_heap::QueueError;

/// Failure of a search invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The policy was missing or rejected before any search work began.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The open list emptied without a goal being selected.
    #[error("goal not reachable: open list exhausted after {expanded} expansions")]
    GoalNotReachable { expanded: u64 },

    /// The termination checker fired before a goal was selected.
    #[error("search budget exhausted after {expanded} expansions")]
    BudgetExhausted { expanded: u64 },

    /// The domain returned a value outside its contract (negative action
    /// cost, negative or non-finite heuristic, ...).
    #[error("domain contract violation: {detail}")]
    DomainContractViolation { detail: String },

    /// A domain callback panicked. The panic was caught at the boundary.
    #[error("domain callback panicked during {stage:?}")]
    DomainPanic { stage: PanicStageV1 },

    /// The engine detected a defect in its own bookkeeping.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolationV1),
}

impl From<QueueError> for SearchError {
    fn from(err: QueueError) -> Self {
        Self::InvariantViolation(InvariantViolationV1::Queue(err))
    }
}

impl From<BucketError> for SearchError {
    fn from(err: BucketError) -> Self {
        Self::InvariantViolation(InvariantViolationV1::Bucket(err))
    }
}

/// Rejected or missing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The required `weight` parameter is absent.
    #[error("\"weight\" is not found; add it to the search configuration")]
    MissingWeight,

    /// `weight` is present but unusable (non-numeric, NaN, infinite, < 1).
    #[error("invalid weight: {detail}")]
    InvalidWeight { detail: String },

    /// The configuration document itself could not be read.
    #[error("malformed configuration: {detail}")]
    Malformed { detail: String },
}

/// Engine defects. These are never business outcomes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolationV1 {
    /// A corrected estimate fell below the uncorrected one.
    #[error("fHat {f_hat} is below f {f}")]
    EstimateBelowCost { f: f64, f_hat: f64 },

    /// A corrected distance-to-go estimate is negative (or NaN).
    #[error("dHat {d_hat} is negative")]
    NegativeDistanceEstimate { d_hat: f64 },

    /// A queue that was required to hold an element was empty.
    #[error("{queue:?} queue is empty")]
    EmptyQueue { queue: QueueKindV1 },

    /// The orderings disagree about which nodes are open.
    #[error("queue membership out of sync: {detail}")]
    QueueMembership { detail: String },

    /// Plan reconstruction did not terminate at the root state.
    #[error("parent chain corrupted: {detail}")]
    ParentChainCorrupted { detail: String },

    /// Indexed heap misuse.
    #[error("{0}")]
    Queue(QueueError),

    /// Bucket open list misuse.
    #[error("{0}")]
    Bucket(BucketError),
}

/// Which ordering an [`InvariantViolationV1::EmptyQueue`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKindV1 {
    Cleanup,
    Open,
    Focal,
    Bucket,
}

/// Domain callback that panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicStageV1 {
    /// `SearchDomainV1::successors()` panicked.
    Successors,
    /// `SearchDomainV1::heuristic()` panicked.
    Heuristic,
    /// `SearchDomainV1::distance()` panicked.
    Distance,
    /// `SearchDomainV1::is_goal()` panicked.
    IsGoal,
}
