//! Metronome Search: bounded-suboptimal heuristic search.
//!
//! The engine plans over any domain that implements
//! [`SearchDomainV1`]. [`explicit_estimation_search`] returns a plan whose
//! cost is within `weight ×` optimal for admissible heuristics, while
//! preferring nodes that its online error model predicts are close to a
//! goal. [`potential_search`] is a lighter weighted search over the
//! [`BucketOpenList`].
//!
//! # Crate layout
//!
//! ```text
//! indexed_heap  ←  bucket  ←  potential
//!      ↑                          ↓
//!     node  ←───────────────  search  →  termination, policy
//!      ↑                          ↓
//!   contract  ←───────────────────┘
//! ```
//!
//! # Key types
//!
//! - [`SearchNodeV1`]: one explored state with corrected estimates
//! - [`IndexedHeap`]: binary heap with O(log n) arbitrary removal
//! - [`BucketOpenList`]: `(g, h)` buckets ordered by potential
//! - [`ExplicitEstimationSearch`]: the incremental EES engine
//! - [`SearchPolicyV1`]: the `weight` configuration
//! - [`TerminationCheckerV1`]: caller-supplied budget

#![forbid(unsafe_code)]

pub mod bucket;
pub mod contract;
pub mod error;
pub mod indexed_heap;
pub mod node;
pub mod policy;
pub mod potential;
pub mod search;
pub mod termination;

pub use bucket::{BucketNode, BucketOpenList};
pub use contract::{SearchDomainV1, SuccessorV1};
pub use error::{ConfigError, InvariantViolationV1, SearchError};
pub use indexed_heap::{HeapKey, IndexedHeap, QueueOrder};
pub use node::{NodeId, SearchNodeV1};
pub use policy::SearchPolicyV1;
pub use potential::potential_search;
pub use search::{explicit_estimation_search, ExplicitEstimationSearch, PlanV1, SearchStatsV1};
pub use termination::{ExpansionBudget, TerminationCheckerV1, TimeBudget, Unbounded};
