//! Brute-force optimal-cost oracle.
//!
//! Uniform-cost search (Dijkstra) over any [`SearchDomainV1`]. Used by tests
//! to check the suboptimality bound and by the explicit graph builder to
//! derive exact heuristics. Ignores the domain heuristic entirely.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use metronome_search::SearchDomainV1;

/// Heap entry: tentative cost, then insertion order for determinism.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tentative {
    cost: f64,
    seq: u64,
    slot: usize,
}

impl Eq for Tentative {}

impl PartialOrd for Tentative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tentative {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Outcome of an exhaustive uniform-cost sweep.
#[derive(Debug, Clone)]
pub struct Sweep<S> {
    /// Settled cost of every state reached within the limit.
    pub costs: HashMap<S, f64>,
    /// Cost of the cheapest goal, if one was settled.
    pub goal_cost: Option<f64>,
    /// `true` if the sweep stopped because it hit `max_states`.
    pub truncated: bool,
}

/// Settle states from `root` in cost order.
///
/// Stops at the first settled goal when `stop_at_goal` is set, or after
/// `max_states` states have been settled.
pub fn sweep<D: SearchDomainV1>(
    domain: &D,
    root: &D::State,
    max_states: usize,
    stop_at_goal: bool,
) -> Sweep<D::State> {
    let mut states: Vec<D::State> = vec![root.clone()];
    let mut best: HashMap<D::State, f64> = HashMap::from([(root.clone(), 0.0)]);
    let mut settled: HashMap<D::State, f64> = HashMap::new();
    let mut heap = BinaryHeap::from([Reverse(Tentative {
        cost: 0.0,
        seq: 0,
        slot: 0,
    })]);
    let mut seq = 1_u64;
    let mut goal_cost = None;

    while let Some(Reverse(entry)) = heap.pop() {
        let state = states[entry.slot].clone();
        if settled.contains_key(&state) {
            continue;
        }
        if settled.len() >= max_states {
            return Sweep {
                costs: settled,
                goal_cost,
                truncated: true,
            };
        }
        settled.insert(state.clone(), entry.cost);
        if domain.is_goal(&state) {
            goal_cost.get_or_insert(entry.cost);
            if stop_at_goal {
                break;
            }
        }
        for successor in domain.successors(&state) {
            if settled.contains_key(&successor.state) {
                continue;
            }
            let cost = entry.cost + successor.action_cost;
            let known_cheaper =
                matches!(best.get(&successor.state), Some(known) if *known <= cost);
            if !known_cheaper {
                best.insert(successor.state.clone(), cost);
                states.push(successor.state);
                heap.push(Reverse(Tentative {
                    cost,
                    seq,
                    slot: states.len() - 1,
                }));
                seq += 1;
            }
        }
    }

    Sweep {
        costs: settled,
        goal_cost,
        truncated: false,
    }
}

/// Cheapest cost from `root` to any goal, or `None` if no goal is settled
/// within `max_states` states.
pub fn optimal_cost<D: SearchDomainV1>(
    domain: &D,
    root: &D::State,
    max_states: usize,
) -> Option<f64> {
    sweep(domain, root, max_states, true).goal_cost
}
