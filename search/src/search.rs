//! Explicit Estimation Search.
//!
//! Three orderings over the same open set are kept in sync:
//!
//! - **cleanup**: ascending uncorrected, unweighted `g + h`
//!   ([`cleanup_order`]). Its head is a lower bound on the optimal cost.
//! - **open**: ascending corrected `fHat` ([`open_order`]).
//! - **focal**: the open nodes with `fHat ≤ weight × best open fHat`,
//!   ascending corrected distance-to-go `dHat` ([`focal_order`]).
//!
//! Each iteration picks the focal head if its `fHat` is within
//! `weight × cleanup head`, else the open head under the same test, else the
//! cleanup head. A goal is only ever selected under that threshold, which
//! bounds the returned cost by `weight × optimal` for admissible heuristics.

use tracing::{debug, trace};

use crate::contract::{self, SearchDomainV1};
use crate::error::{InvariantViolationV1, QueueKindV1, SearchError};
use crate::indexed_heap::IndexedHeap;
use crate::node::{
    cleanup_order, focal_order, open_order, ArenaOrder, EdgeV1, NodeArena, NodeEstimate, NodeId,
    SearchNodeV1,
};
use crate::policy::SearchPolicyV1;
use crate::termination::TerminationCheckerV1;

/// Counters reported with every plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatsV1 {
    /// Nodes removed from open and expanded (goal selection excluded).
    pub expanded_nodes: u64,
    /// Successors considered after trivial-cycle pruning.
    pub generated_nodes: u64,
    /// Expanded nodes put back on open after a cheaper path was found.
    pub reopened_nodes: u64,
    pub focal_selections: u64,
    pub open_selections: u64,
    pub cleanup_selections: u64,
}

/// A solution: actions from the root to a goal, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanV1<A> {
    pub actions: Vec<A>,
    /// Sum of the action costs along `actions`.
    pub cost: f64,
    pub stats: SearchStatsV1,
}

/// What one call to [`ExplicitEstimationSearch::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The selected node satisfies the goal test. Search is finished.
    Goal(NodeId),
    /// The selected node was expanded.
    Expanded(NodeId),
    /// Open was empty; nothing was selected.
    Exhausted,
}

/// Which ordering supplied the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Focal,
    Open,
    Cleanup,
}

/// Incremental EES engine.
///
/// [`explicit_estimation_search`] drives it to completion; tests step it
/// one selection at a time and inspect the queues in between.
pub struct ExplicitEstimationSearch<'d, D: SearchDomainV1> {
    domain: &'d D,
    weight: f64,
    root_state: D::State,
    arena: NodeArena<D::State, D::Action>,
    cleanup: IndexedHeap<NodeId>,
    open: IndexedHeap<NodeId>,
    focal: IndexedHeap<NodeId>,
    /// Admission threshold the focal membership currently reflects.
    focal_bound: f64,
    stats: SearchStatsV1,
}

impl<'d, D: SearchDomainV1> ExplicitEstimationSearch<'d, D> {
    /// Validate the policy and seed open with the root.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] if the policy is invalid (no domain call is
    ///   made in that case).
    /// - [`SearchError::DomainContractViolation`] or
    ///   [`SearchError::DomainPanic`] if the root estimates are unusable.
    pub fn new(
        domain: &'d D,
        root: D::State,
        policy: &SearchPolicyV1,
    ) -> Result<Self, SearchError> {
        policy.validate()?;
        let estimate = contract::estimate(domain, &root)?;
        let mut engine = Self {
            domain,
            weight: policy.weight,
            root_state: root.clone(),
            arena: NodeArena::new(),
            cleanup: IndexedHeap::new(),
            open: IndexedHeap::new(),
            focal: IndexedHeap::new(),
            focal_bound: f64::INFINITY,
            stats: SearchStatsV1::default(),
        };
        let root_node = SearchNodeV1::root(
            root,
            NodeEstimate {
                heuristic: policy.weight * estimate.heuristic,
                raw_heuristic: estimate.heuristic,
                d: estimate.distance,
            },
        );
        root_node.check_estimates()?;
        let id = engine.arena.insert(root_node);
        engine.open_node(id)?;
        engine.sync_focal()?;
        Ok(engine)
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena<D::State, D::Action> {
        &self.arena
    }

    #[must_use]
    pub fn stats(&self) -> SearchStatsV1 {
        self.stats
    }

    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn focal_len(&self) -> usize {
        self.focal.len()
    }

    #[must_use]
    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    /// Select one node; return it if it is a goal, otherwise expand it.
    ///
    /// # Errors
    ///
    /// Domain contract violations, caught domain panics, and invariant
    /// violations.
    pub fn step(&mut self) -> Result<StepOutcome, SearchError> {
        if self.open.is_empty() {
            return Ok(StepOutcome::Exhausted);
        }
        let id = self.select()?;
        let state = self.arena.get(id).state().clone();
        if contract::is_goal(self.domain, &state)? {
            return Ok(StepOutcome::Goal(id));
        }
        self.expand(id, &state)?;
        Ok(StepOutcome::Expanded(id))
    }

    /// Step until a goal is selected, open empties, or `termination` fires.
    ///
    /// The open-list check comes first, so a search that runs out of nodes
    /// at the same moment its budget runs out reports
    /// [`SearchError::GoalNotReachable`].
    ///
    /// # Errors
    ///
    /// [`SearchError::GoalNotReachable`], [`SearchError::BudgetExhausted`],
    /// and everything [`step`](Self::step) can return.
    pub fn run(
        mut self,
        mut termination: impl TerminationCheckerV1,
    ) -> Result<PlanV1<D::Action>, SearchError> {
        debug!(
            domain = self.domain.domain_id(),
            weight = self.weight,
            "explicit estimation search started"
        );
        let result = loop {
            if self.open.is_empty() {
                break Err(SearchError::GoalNotReachable {
                    expanded: self.stats.expanded_nodes,
                });
            }
            if termination.reached_termination() {
                break Err(SearchError::BudgetExhausted {
                    expanded: self.stats.expanded_nodes,
                });
            }
            match self.step() {
                Ok(StepOutcome::Goal(id)) => break self.plan(id),
                Ok(StepOutcome::Expanded(_)) => termination.notify_expansion(),
                Ok(StepOutcome::Exhausted) => {}
                Err(err) => break Err(err),
            }
        };
        match &result {
            Ok(plan) => debug!(
                domain = self.domain.domain_id(),
                cost = plan.cost,
                steps = plan.actions.len(),
                expanded = plan.stats.expanded_nodes,
                generated = plan.stats.generated_nodes,
                reopened = plan.stats.reopened_nodes,
                "explicit estimation search found a plan"
            ),
            Err(err) => debug!(
                domain = self.domain.domain_id(),
                expanded = self.stats.expanded_nodes,
                error = %err,
                "explicit estimation search failed"
            ),
        }
        result
    }

    /// Reconstruct the plan ending at `goal`.
    ///
    /// # Errors
    ///
    /// [`InvariantViolationV1::ParentChainCorrupted`] if the parent chain
    /// does not lead back to the root.
    pub fn plan(&self, goal: NodeId) -> Result<PlanV1<D::Action>, SearchError> {
        let actions = self.arena.reconstruct_plan(goal, &self.root_state)?;
        Ok(PlanV1 {
            actions,
            cost: self.arena.get(goal).cost(),
            stats: self.stats,
        })
    }

    /// Check every structural invariant of the engine.
    ///
    /// # Errors
    ///
    /// The first violated invariant found.
    pub fn check_invariants(&self) -> Result<(), SearchError> {
        for node in self.arena.nodes() {
            node.check_estimates()?;
        }
        if self.open.len() != self.cleanup.len() {
            return Err(membership(format!(
                "open holds {} nodes, cleanup holds {}",
                self.open.len(),
                self.cleanup.len()
            )));
        }
        for id in &self.open {
            if !self.cleanup.contains(id) {
                return Err(membership(format!("{id:?} is open but not in cleanup")));
            }
            let admitted = self.arena.get(*id).f_hat() <= self.focal_bound;
            if admitted != self.focal.contains(id) {
                return Err(membership(format!(
                    "{id:?} focal membership is {}, admission is {admitted}",
                    self.focal.contains(id)
                )));
            }
        }
        for id in &self.focal {
            if !self.open.contains(id) {
                return Err(membership(format!("{id:?} is in focal but not open")));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    fn select(&mut self) -> Result<NodeId, SearchError> {
        let nodes = self.arena.nodes();
        let cleanup_best = *self
            .cleanup
            .peek()
            .ok_or(InvariantViolationV1::EmptyQueue {
                queue: QueueKindV1::Cleanup,
            })?;
        let threshold = self.weight * nodes[cleanup_best.0].base_f();
        let within = |id: &&NodeId| nodes[id.0].f_hat() <= threshold;

        let (id, selection) = if let Some(&id) = self.focal.peek().filter(within) {
            (id, Selection::Focal)
        } else if let Some(&id) = self.open.peek().filter(within) {
            (id, Selection::Open)
        } else {
            (cleanup_best, Selection::Cleanup)
        };
        match selection {
            Selection::Focal => self.stats.focal_selections += 1,
            Selection::Open => self.stats.open_selections += 1,
            Selection::Cleanup => self.stats.cleanup_selections += 1,
        }
        trace!(
            node = id.0,
            from = ?selection,
            threshold,
            f_hat = nodes[id.0].f_hat(),
            d_hat = nodes[id.0].d_hat(),
            "selected"
        );

        self.close_node(id)?;
        self.sync_focal()?;
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    fn expand(&mut self, id: NodeId, state: &D::State) -> Result<(), SearchError> {
        self.stats.expanded_nodes += 1;
        let (cost, stats, parent_state) = {
            let node = self.arena.get(id);
            let parent_state = node.parent().map(|p| self.arena.get(p).state().clone());
            (node.cost(), node.path_stats(), parent_state)
        };

        for successor in contract::successors(self.domain, state)? {
            if parent_state.as_ref() == Some(&successor.state) {
                continue;
            }
            self.stats.generated_nodes += 1;

            let edge = EdgeV1 {
                action: successor.action,
                action_cost: successor.action_cost,
            };
            let child = match self.arena.lookup(&successor.state) {
                Some(child) => child,
                None => {
                    let estimate = contract::estimate(self.domain, &successor.state)?;
                    self.arena.insert(SearchNodeV1::new(
                        successor.state,
                        NodeEstimate {
                            heuristic: self.weight * estimate.heuristic,
                            raw_heuristic: estimate.heuristic,
                            d: estimate.distance,
                        },
                        f64::INFINITY,
                        Some(edge.clone()),
                        Some((id, stats)),
                    ))
                }
            };

            let new_cost = cost + edge.action_cost;
            let known_cost = self.arena.get(child).cost();
            if new_cost >= known_cost {
                continue;
            }
            let was_open = self.open.contains(&child);
            self.arena.get_mut(child).relax(new_cost, edge, (id, stats));
            self.arena.get(child).check_estimates()?;
            if was_open {
                self.reposition_node(child)?;
            } else {
                if known_cost.is_finite() {
                    self.stats.reopened_nodes += 1;
                    trace!(node = child.0, cost = new_cost, "reopened");
                }
                self.open_node(child)?;
            }
        }

        self.sync_focal()
    }

    // -----------------------------------------------------------------------
    // Queue bookkeeping
    // -----------------------------------------------------------------------

    /// Put a node that is on no queue onto cleanup and open, and onto focal
    /// if it meets the current admission threshold.
    fn open_node(&mut self, id: NodeId) -> Result<(), SearchError> {
        let nodes = self.arena.nodes();
        self.cleanup.add(id, &ArenaOrder::new(nodes, cleanup_order))?;
        self.open.add(id, &ArenaOrder::new(nodes, open_order))?;
        if nodes[id.0].f_hat() <= self.focal_bound {
            self.focal.add(id, &ArenaOrder::new(nodes, focal_order))?;
        }
        Ok(())
    }

    /// Restore heap order after an open node was re-costed.
    fn reposition_node(&mut self, id: NodeId) -> Result<(), SearchError> {
        let nodes = self.arena.nodes();
        self.cleanup.update(id, &ArenaOrder::new(nodes, cleanup_order))?;
        self.open.update(id, &ArenaOrder::new(nodes, open_order))?;
        let focal = ArenaOrder::new(nodes, focal_order);
        let admitted = nodes[id.0].f_hat() <= self.focal_bound;
        match (self.focal.contains(&id), admitted) {
            (true, true) => self.focal.update(id, &focal)?,
            (true, false) => {
                self.focal.remove(&id, &focal)?;
            }
            (false, true) => self.focal.add(id, &focal)?,
            (false, false) => {}
        }
        Ok(())
    }

    /// Take a node off every queue.
    fn close_node(&mut self, id: NodeId) -> Result<(), SearchError> {
        let nodes = self.arena.nodes();
        self.cleanup.remove(&id, &ArenaOrder::new(nodes, cleanup_order))?;
        self.open.remove(&id, &ArenaOrder::new(nodes, open_order))?;
        if self.focal.contains(&id) {
            self.focal.remove(&id, &ArenaOrder::new(nodes, focal_order))?;
        }
        Ok(())
    }

    /// Move the focal admission threshold to `weight × best open fHat` and
    /// admit or evict nodes accordingly.
    fn sync_focal(&mut self) -> Result<(), SearchError> {
        let nodes = self.arena.nodes();
        let Some(best) = self.open.peek() else {
            self.focal.clear();
            self.focal_bound = f64::INFINITY;
            return Ok(());
        };
        let bound = self.weight * nodes[best.0].f_hat();
        let order = ArenaOrder::new(nodes, focal_order);

        if bound > self.focal_bound {
            for id in &self.open {
                let f_hat = nodes[id.0].f_hat();
                if f_hat > self.focal_bound && f_hat <= bound {
                    self.focal.add(*id, &order)?;
                }
            }
        } else if bound < self.focal_bound {
            let evicted: Vec<NodeId> = self
                .focal
                .iter()
                .copied()
                .filter(|id| nodes[id.0].f_hat() > bound)
                .collect();
            for id in evicted {
                self.focal.remove(&id, &order)?;
            }
        }
        self.focal_bound = bound;
        Ok(())
    }
}

fn membership(detail: String) -> SearchError {
    InvariantViolationV1::QueueMembership { detail }.into()
}

/// Run Explicit Estimation Search from `root`.
///
/// Returns a plan whose cost is at most `policy.weight ×` the optimal cost
/// when the domain heuristic is admissible.
///
/// # Errors
///
/// - [`SearchError::Config`] before any domain call if the policy is invalid.
/// - [`SearchError::GoalNotReachable`] if open empties.
/// - [`SearchError::BudgetExhausted`] if `termination` fires first.
/// - [`SearchError::DomainContractViolation`] / [`SearchError::DomainPanic`]
///   for misbehaving domains.
/// - [`SearchError::InvariantViolation`] on internal defects.
pub fn explicit_estimation_search<D>(
    domain: &D,
    root: D::State,
    policy: &SearchPolicyV1,
    termination: impl TerminationCheckerV1,
) -> Result<PlanV1<D::Action>, SearchError>
where
    D: SearchDomainV1,
{
    ExplicitEstimationSearch::new(domain, root, policy)?.run(termination)
}
