//! Search node, online heuristic-error model, and the node arena.
//!
//! Nodes live in a [`NodeArena`] and are addressed by [`NodeId`]. Queues
//! store ids, never nodes; a node's parent is an id that is overwritten
//! when a cheaper path is found. Because a node is re-parented only on a
//! strictly cheaper path, the parent chain cannot close into a cycle.
//!
//! # Error model
//!
//! Each node accumulates the single-step error of the heuristic and of the
//! distance estimate along its current path:
//!
//! ```text
//! sseH(child) = sseH(parent) + max(0, (actionCost + h(child)) - h(parent))
//! sseD(child) = sseD(parent) + max(0, (1 + d(child)) - d(parent))
//! ```
//!
//! With `meanH = sseH / depth` and `meanD = sseD / depth` (raw sums at the
//! root), the corrected estimates are `dHat = d / (1 - meanD)`,
//! `hHat = h + dHat * meanH`, `fHat = g + hHat`. When `meanD >= 1` the
//! correction diverges and all three are `f64::MAX`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::InvariantViolationV1;
use crate::indexed_heap::{HeapKey, QueueOrder};

/// Handle of a node inside one [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl HeapKey for NodeId {
    fn heap_key(&self) -> usize {
        self.0
    }
}

/// Heuristic inputs of a node, computed once when it is generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEstimate {
    /// `weight × domain.heuristic(state)`.
    pub heuristic: f64,
    /// `domain.heuristic(state)`.
    pub raw_heuristic: f64,
    /// Estimated steps-to-go.
    pub d: f64,
}

/// The edge a node was reached through.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeV1<A> {
    pub action: A,
    pub action_cost: f64,
}

/// What a child needs to know about its parent to derive its estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStats {
    pub heuristic: f64,
    pub d: f64,
    pub depth: u32,
    pub sse_h: f64,
    pub sse_d: f64,
}

/// One explored state.
#[derive(Debug, Clone)]
pub struct SearchNodeV1<S, A> {
    id: NodeId,
    state: S,
    estimate: NodeEstimate,
    cost: f64,
    action_cost: f64,
    action: Option<A>,
    depth: u32,
    parent: Option<NodeId>,
    sse_h: f64,
    sse_d: f64,
    h_hat: f64,
    d_hat: f64,
    f_hat: f64,
}

impl<S, A> SearchNodeV1<S, A> {
    /// Build a node and derive its corrected estimates.
    ///
    /// `edge` is `None` only for the root, whose action is the no-op.
    /// The id is assigned by [`NodeArena::insert`].
    #[must_use]
    pub fn new(
        state: S,
        estimate: NodeEstimate,
        cost: f64,
        edge: Option<EdgeV1<A>>,
        parent: Option<(NodeId, PathStats)>,
    ) -> Self {
        let (action, action_cost) = match edge {
            Some(edge) => (Some(edge.action), edge.action_cost),
            None => (None, 0.0),
        };
        let mut node = Self {
            id: NodeId(usize::MAX),
            state,
            estimate,
            cost,
            action_cost,
            action,
            depth: 0,
            parent: parent.map(|(id, _)| id),
            sse_h: 0.0,
            sse_d: 0.0,
            h_hat: 0.0,
            d_hat: 0.0,
            f_hat: 0.0,
        };
        node.compute_path_hats(parent.map(|(_, stats)| stats));
        node
    }

    /// Root node: cost 0, no parent, no-op action.
    #[must_use]
    pub fn root(state: S, estimate: NodeEstimate) -> Self {
        Self::new(state, estimate, 0.0, None, None)
    }

    /// Re-cost the node through a cheaper path and re-derive its estimates.
    ///
    /// The caller guarantees `cost` is strictly below the current cost and
    /// must reposition the node in every queue it belongs to.
    pub fn relax(&mut self, cost: f64, edge: EdgeV1<A>, parent: (NodeId, PathStats)) {
        debug_assert!(cost < self.cost, "relax must strictly decrease cost");
        self.cost = cost;
        self.action = Some(edge.action);
        self.action_cost = edge.action_cost;
        self.parent = Some(parent.0);
        self.compute_path_hats(Some(parent.1));
    }

    fn compute_path_hats(&mut self, parent: Option<PathStats>) {
        match parent {
            Some(p) => {
                self.depth = p.depth + 1;
                self.sse_h =
                    p.sse_h + ((self.action_cost + self.estimate.heuristic) - p.heuristic).max(0.0);
                self.sse_d = p.sse_d + ((1.0 + self.estimate.d) - p.d).max(0.0);
            }
            None => {
                self.depth = 0;
                self.sse_h = 0.0;
                self.sse_d = 0.0;
            }
        }

        let samples = f64::from(self.depth.max(1));
        let mean_h = self.sse_h / samples;
        let mean_d = self.sse_d / samples;
        if mean_d < 1.0 {
            self.d_hat = self.estimate.d / (1.0 - mean_d);
            self.h_hat = self.estimate.heuristic + self.d_hat * mean_h;
            self.f_hat = self.cost + self.h_hat;
        } else {
            self.d_hat = f64::MAX;
            self.h_hat = f64::MAX;
            self.f_hat = f64::MAX;
        }
    }

    /// `fHat >= f` and `dHat >= 0`.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant. NaN estimates violate both.
    pub fn check_estimates(&self) -> Result<(), InvariantViolationV1> {
        let at_least = |a: f64, b: f64| {
            matches!(a.partial_cmp(&b), Some(Ordering::Greater | Ordering::Equal))
        };
        if !at_least(self.f_hat, self.f()) {
            return Err(InvariantViolationV1::EstimateBelowCost {
                f: self.f(),
                f_hat: self.f_hat,
            });
        }
        if !at_least(self.d_hat, 0.0) {
            return Err(InvariantViolationV1::NegativeDistanceEstimate { d_hat: self.d_hat });
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Weighted heuristic `h`.
    #[must_use]
    pub fn heuristic(&self) -> f64 {
        self.estimate.heuristic
    }

    /// Unweighted heuristic, as reported by the domain.
    #[must_use]
    pub fn raw_heuristic(&self) -> f64 {
        self.estimate.raw_heuristic
    }

    /// Best known path cost `g` (`f64::INFINITY` until first reached).
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// `g + h` with the weighted heuristic.
    #[must_use]
    pub fn f(&self) -> f64 {
        self.cost + self.estimate.heuristic
    }

    /// `g + h` with the raw heuristic; a lower bound on the cost of any
    /// solution through this node when the heuristic is admissible.
    #[must_use]
    pub fn base_f(&self) -> f64 {
        self.cost + self.estimate.raw_heuristic
    }

    #[must_use]
    pub fn d(&self) -> f64 {
        self.estimate.d
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    #[must_use]
    pub fn action_cost(&self) -> f64 {
        self.action_cost
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn sse_h(&self) -> f64 {
        self.sse_h
    }

    #[must_use]
    pub fn sse_d(&self) -> f64 {
        self.sse_d
    }

    #[must_use]
    pub fn h_hat(&self) -> f64 {
        self.h_hat
    }

    #[must_use]
    pub fn d_hat(&self) -> f64 {
        self.d_hat
    }

    #[must_use]
    pub fn f_hat(&self) -> f64 {
        self.f_hat
    }

    #[must_use]
    pub fn path_stats(&self) -> PathStats {
        PathStats {
            heuristic: self.estimate.heuristic,
            d: self.estimate.d,
            depth: self.depth,
            sse_h: self.sse_h,
            sse_d: self.sse_d,
        }
    }
}

// ---------------------------------------------------------------------------
// Orderings
// ---------------------------------------------------------------------------

/// Ascending `base_f`; ties prefer the higher cost, then the older node.
pub fn cleanup_order<S, A>(a: &SearchNodeV1<S, A>, b: &SearchNodeV1<S, A>) -> Ordering {
    a.base_f()
        .total_cmp(&b.base_f())
        .then(b.cost.total_cmp(&a.cost))
        .then(a.id.cmp(&b.id))
}

/// Ascending `dHat`, then `fHat`; ties prefer the higher cost, then the
/// older node.
pub fn focal_order<S, A>(a: &SearchNodeV1<S, A>, b: &SearchNodeV1<S, A>) -> Ordering {
    a.d_hat
        .total_cmp(&b.d_hat)
        .then(a.f_hat.total_cmp(&b.f_hat))
        .then(b.cost.total_cmp(&a.cost))
        .then(a.id.cmp(&b.id))
}

/// Ascending `fHat`, then `d`; ties prefer the higher cost, then the older
/// node.
pub fn open_order<S, A>(a: &SearchNodeV1<S, A>, b: &SearchNodeV1<S, A>) -> Ordering {
    a.f_hat
        .total_cmp(&b.f_hat)
        .then(a.estimate.d.total_cmp(&b.estimate.d))
        .then(b.cost.total_cmp(&a.cost))
        .then(a.id.cmp(&b.id))
}

/// Node comparator lifted to ids by looking them up in an arena.
pub struct ArenaOrder<'a, S, A> {
    nodes: &'a [SearchNodeV1<S, A>],
    compare: fn(&SearchNodeV1<S, A>, &SearchNodeV1<S, A>) -> Ordering,
}

impl<'a, S, A> ArenaOrder<'a, S, A> {
    #[must_use]
    pub fn new(
        nodes: &'a [SearchNodeV1<S, A>],
        compare: fn(&SearchNodeV1<S, A>, &SearchNodeV1<S, A>) -> Ordering,
    ) -> Self {
        Self { nodes, compare }
    }
}

impl<S, A> QueueOrder<NodeId> for ArenaOrder<'_, S, A> {
    fn compare(&self, a: &NodeId, b: &NodeId) -> Ordering {
        (self.compare)(&self.nodes[a.0], &self.nodes[b.0])
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Owner of every node of one search, plus the state → node map.
///
/// At most one node exists per distinct state.
#[derive(Debug, Clone)]
pub struct NodeArena<S, A> {
    nodes: Vec<SearchNodeV1<S, A>>,
    index: HashMap<S, NodeId>,
}

impl<S: Clone + Eq + Hash, A> NodeArena<S, A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn nodes(&self) -> &[SearchNodeV1<S, A>] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNodeV1<S, A> {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNodeV1<S, A> {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn lookup(&self, state: &S) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    /// Store `node` and map its state to the new id.
    ///
    /// If a node for the same state already exists the map is left
    /// pointing at the existing node and its id is returned instead.
    pub fn insert(&mut self, mut node: SearchNodeV1<S, A>) -> NodeId {
        if let Some(existing) = self.index.get(&node.state) {
            return *existing;
        }
        let id = NodeId(self.nodes.len());
        node.id = id;
        self.index.insert(node.state.clone(), id);
        self.nodes.push(node);
        id
    }

    /// Walk parent links from `goal` to the root and return the actions in
    /// execution order.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolationV1::ParentChainCorrupted`] if the walk
    /// revisits a node, meets a non-root node without an action, or ends at
    /// a state other than `root_state`.
    pub fn reconstruct_plan(
        &self,
        goal: NodeId,
        root_state: &S,
    ) -> Result<Vec<A>, InvariantViolationV1>
    where
        A: Clone,
        S: std::fmt::Debug,
    {
        let mut actions = Vec::new();
        let mut current = self.get(goal);
        while let Some(parent) = current.parent {
            if actions.len() >= self.nodes.len() {
                return Err(InvariantViolationV1::ParentChainCorrupted {
                    detail: format!("cycle through {:?}", current.state),
                });
            }
            let action = current.action.clone().ok_or_else(|| {
                InvariantViolationV1::ParentChainCorrupted {
                    detail: format!("{:?} has a parent but no action", current.state),
                }
            })?;
            actions.push(action);
            current = self.get(parent);
        }
        if current.state != *root_state {
            return Err(InvariantViolationV1::ParentChainCorrupted {
                detail: format!(
                    "chain ends at {:?}, expected root {:?}",
                    current.state, root_state
                ),
            });
        }
        actions.reverse();
        Ok(actions)
    }
}

impl<S: Clone + Eq + Hash, A> Default for NodeArena<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
