//! Potential search: weighted best-first search driven by a
//! [`BucketOpenList`].
//!
//! Open nodes are filed by their `(g, h)` pair with the unweighted domain
//! heuristic and popped from the bucket with the highest potential
//! `(weight × fMin − g) / h`. Goal-adjacent buckets (`h = 0`) go first.
//! Shares the node arena, domain guards, trivial-cycle pruning, and error
//! taxonomy with [`crate::search`].

use tracing::{debug, trace};

use crate::bucket::{BucketNode, BucketOpenList};
use crate::contract::{self, SearchDomainV1};
use crate::error::{InvariantViolationV1, QueueKindV1, SearchError};
use crate::node::{EdgeV1, NodeArena, NodeEstimate, NodeId, SearchNodeV1};
use crate::policy::SearchPolicyV1;
use crate::search::{PlanV1, SearchStatsV1};
use crate::termination::TerminationCheckerV1;

/// A node as filed on the bucket open list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenEntry {
    pub id: NodeId,
    pub g: f64,
    pub h: f64,
}

impl BucketNode for OpenEntry {
    fn g_value(&self) -> f64 {
        self.g
    }

    fn h_value(&self) -> f64 {
        self.h
    }
}

fn entry_of<S, A>(node: &SearchNodeV1<S, A>) -> OpenEntry {
    OpenEntry {
        id: node.id(),
        g: node.cost(),
        h: node.raw_heuristic(),
    }
}

/// Run potential search from `root` with `policy.weight` as the bucket
/// bound.
///
/// # Errors
///
/// Same taxonomy as [`crate::search::explicit_estimation_search`].
pub fn potential_search<D>(
    domain: &D,
    root: D::State,
    policy: &SearchPolicyV1,
    mut termination: impl TerminationCheckerV1,
) -> Result<PlanV1<D::Action>, SearchError>
where
    D: SearchDomainV1,
{
    policy.validate()?;
    debug!(
        domain = domain.domain_id(),
        weight = policy.weight,
        "potential search started"
    );

    let estimate = contract::estimate(domain, &root)?;
    let mut arena: NodeArena<D::State, D::Action> = NodeArena::new();
    let mut open: BucketOpenList<OpenEntry> = BucketOpenList::new(policy.weight);
    let mut stats = SearchStatsV1::default();

    let root_id = arena.insert(SearchNodeV1::root(
        root.clone(),
        NodeEstimate {
            heuristic: policy.weight * estimate.heuristic,
            raw_heuristic: estimate.heuristic,
            d: estimate.distance,
        },
    ));
    open.add(entry_of(arena.get(root_id)))?;

    loop {
        if open.is_empty() {
            debug!(expanded = stats.expanded_nodes, "potential search exhausted open");
            return Err(SearchError::GoalNotReachable {
                expanded: stats.expanded_nodes,
            });
        }
        if termination.reached_termination() {
            debug!(expanded = stats.expanded_nodes, "potential search out of budget");
            return Err(SearchError::BudgetExhausted {
                expanded: stats.expanded_nodes,
            });
        }

        let entry = open.choose_node()?.ok_or(InvariantViolationV1::EmptyQueue {
            queue: QueueKindV1::Bucket,
        })?;
        trace!(
            node = entry.id.0,
            g = entry.g,
            h = entry.h,
            f_min = open.min_f_value(),
            "selected"
        );

        let state = arena.get(entry.id).state().clone();
        if contract::is_goal(domain, &state)? {
            let actions = arena.reconstruct_plan(entry.id, &root)?;
            let cost = arena.get(entry.id).cost();
            debug!(
                domain = domain.domain_id(),
                cost,
                steps = actions.len(),
                expanded = stats.expanded_nodes,
                "potential search found a plan"
            );
            return Ok(PlanV1 {
                actions,
                cost,
                stats,
            });
        }

        expand(domain, policy.weight, &mut arena, &mut open, &mut stats, entry.id, &state)?;
        termination.notify_expansion();
    }
}

fn expand<D: SearchDomainV1>(
    domain: &D,
    weight: f64,
    arena: &mut NodeArena<D::State, D::Action>,
    open: &mut BucketOpenList<OpenEntry>,
    stats: &mut SearchStatsV1,
    id: NodeId,
    state: &D::State,
) -> Result<(), SearchError> {
    stats.expanded_nodes += 1;
    let (cost, path, parent_state) = {
        let node = arena.get(id);
        let parent_state = node.parent().map(|p| arena.get(p).state().clone());
        (node.cost(), node.path_stats(), parent_state)
    };

    for successor in contract::successors(domain, state)? {
        if parent_state.as_ref() == Some(&successor.state) {
            continue;
        }
        stats.generated_nodes += 1;

        let edge = EdgeV1 {
            action: successor.action,
            action_cost: successor.action_cost,
        };
        let child = match arena.lookup(&successor.state) {
            Some(child) => child,
            None => {
                let estimate = contract::estimate(domain, &successor.state)?;
                arena.insert(SearchNodeV1::new(
                    successor.state,
                    NodeEstimate {
                        heuristic: weight * estimate.heuristic,
                        raw_heuristic: estimate.heuristic,
                        d: estimate.distance,
                    },
                    f64::INFINITY,
                    Some(edge.clone()),
                    Some((id, path)),
                ))
            }
        };

        let new_cost = cost + edge.action_cost;
        let before = entry_of(arena.get(child));
        if new_cost >= before.g {
            continue;
        }
        let was_open = open.contains(&before);
        arena.get_mut(child).relax(new_cost, edge, (id, path));
        arena.get(child).check_estimates()?;
        let after = entry_of(arena.get(child));
        if was_open {
            open.replace(&before, after)?;
        } else {
            if before.g.is_finite() {
                stats.reopened_nodes += 1;
                trace!(node = child.0, cost = new_cost, "reopened");
            }
            open.add(after)?;
        }
    }
    Ok(())
}
