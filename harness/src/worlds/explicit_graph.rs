//! `ExplicitGraph`: a directed weighted graph given edge by edge.
//!
//! Vertices carry a label, a heuristic, and a distance-to-go estimate. The
//! hand-built fixtures (the diamond and its misleading variant) pin down
//! exact selection behavior; [`ExplicitGraph::random`] produces seeded
//! graphs with exact or scaled-down heuristics for property tests.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use metronome_search::{SearchDomainV1, SuccessorV1};

use crate::oracle;

/// Traversal of one edge, `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
struct Vertex {
    label: String,
    heuristic: f64,
    distance: f64,
    out: Vec<(usize, f64)>,
}

/// Directed weighted graph over vertex indices.
#[derive(Debug, Clone)]
pub struct ExplicitGraph {
    vertices: Vec<Vertex>,
    start: usize,
    goals: HashSet<usize>,
}

impl ExplicitGraph {
    /// Graph with `labels.len()` vertices, no edges, zero estimates, and
    /// vertex 0 as start.
    #[must_use]
    pub fn with_labels(labels: &[&str]) -> Self {
        Self {
            vertices: labels
                .iter()
                .map(|label| Vertex {
                    label: (*label).to_string(),
                    heuristic: 0.0,
                    distance: 0.0,
                    out: Vec::new(),
                })
                .collect(),
            start: 0,
            goals: HashSet::new(),
        }
    }

    /// Add the edge `from → to`. Later edges are listed after earlier ones.
    pub fn add_edge(&mut self, from: usize, to: usize, cost: f64) {
        self.vertices[from].out.push((to, cost));
    }

    pub fn add_goal(&mut self, vertex: usize) {
        self.goals.insert(vertex);
    }

    pub fn set_estimates(&mut self, vertex: usize, heuristic: f64, distance: f64) {
        self.vertices[vertex].heuristic = heuristic;
        self.vertices[vertex].distance = distance;
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Index of the vertex labeled `label`.
    #[must_use]
    pub fn vertex(&self, label: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v.label == label)
    }

    #[must_use]
    pub fn label(&self, vertex: usize) -> &str {
        &self.vertices[vertex].label
    }

    /// Labels visited by `plan`, starting with the start vertex.
    #[must_use]
    pub fn route(&self, plan: &[GraphEdge]) -> Vec<&str> {
        std::iter::once(self.start)
            .chain(plan.iter().map(|edge| edge.to))
            .map(|v| self.label(v))
            .collect()
    }

    /// `start → {a, b} → goal` with edge costs 1, 1, 5, 1 and a perfect
    /// heuristic. The optimal route is `start, a, goal` at cost 2.
    #[must_use]
    pub fn diamond() -> Self {
        let mut graph = Self::with_labels(&["start", "a", "b", "goal"]);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(0, 2, 1.0);
        graph.add_edge(2, 3, 5.0);
        graph.add_edge(1, 3, 1.0);
        graph.add_goal(3);
        graph.set_estimates(0, 2.0, 2.0);
        graph.set_estimates(1, 1.0, 1.0);
        graph.set_estimates(2, 5.0, 1.0);
        graph.set_estimates(3, 0.0, 0.0);
        graph
    }

    /// The diamond with an admissible heuristic that underestimates `b`
    /// (h = 0, one step to go) and overestimates the distance from `a`.
    /// With a large weight `b` enters focal first.
    #[must_use]
    pub fn misleading_diamond() -> Self {
        let mut graph = Self::diamond();
        graph.set_estimates(1, 1.0, 3.0);
        graph.set_estimates(2, 0.0, 1.0);
        graph
    }

    /// Seeded random graph on `vertices` vertices (at least 2).
    ///
    /// A spine `0 → 1 → … → n-1` of random-cost edges guarantees the goal
    /// `n-1` is reachable from every vertex; `extra_edges` more random
    /// edges are added on top. Costs are integers in `1..=9`. The heuristic
    /// is the exact cost-to-go times `heuristic_scale` (clamped to `0..=1`,
    /// so it stays admissible) and the distance is the exact hop count.
    #[must_use]
    pub fn random(seed: u64, vertices: usize, extra_edges: usize, heuristic_scale: f64) -> Self {
        let n = vertices.max(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let labels: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let mut graph = Self::with_labels(&label_refs);
        for from in 0..n - 1 {
            graph.add_edge(from, from + 1, f64::from(rng.gen_range(1_u8..=9)));
        }
        for _ in 0..extra_edges {
            let from = rng.gen_range(0..n);
            let to = rng.gen_range(0..n);
            if from != to {
                graph.add_edge(from, to, f64::from(rng.gen_range(1_u8..=9)));
            }
        }
        graph.add_goal(n - 1);

        let scale = heuristic_scale.clamp(0.0, 1.0);
        let cost_to_go = oracle::sweep(&graph.reversed(false), &(n - 1), n, false).costs;
        let hops_to_go = oracle::sweep(&graph.reversed(true), &(n - 1), n, false).costs;
        for v in 0..n {
            let heuristic = cost_to_go.get(&v).map_or(0.0, |c| c * scale);
            let distance = hops_to_go.get(&v).copied().unwrap_or(0.0);
            graph.set_estimates(v, heuristic, distance);
        }
        graph
    }

    /// The same graph with every edge reversed and no goals. With
    /// `unit_costs` every edge costs 1.
    fn reversed(&self, unit_costs: bool) -> Self {
        let labels: Vec<&str> = self.vertices.iter().map(|v| v.label.as_str()).collect();
        let mut reversed = Self::with_labels(&labels);
        for (from, vertex) in self.vertices.iter().enumerate() {
            for &(to, cost) in &vertex.out {
                reversed.add_edge(to, from, if unit_costs { 1.0 } else { cost });
            }
        }
        reversed
    }
}

impl SearchDomainV1 for ExplicitGraph {
    type State = usize;
    type Action = GraphEdge;

    #[allow(clippy::unnecessary_literal_bound)]
    fn domain_id(&self) -> &str {
        "explicit_graph"
    }

    fn successors(&self, state: &usize) -> Vec<SuccessorV1<usize, GraphEdge>> {
        self.vertices[*state]
            .out
            .iter()
            .map(|&(to, cost)| SuccessorV1 {
                state: to,
                action: GraphEdge { from: *state, to },
                action_cost: cost,
            })
            .collect()
    }

    fn heuristic(&self, state: &usize) -> f64 {
        self.vertices[*state].heuristic
    }

    fn distance(&self, state: &usize) -> f64 {
        self.vertices[*state].distance
    }

    fn is_goal(&self, state: &usize) -> bool {
        self.goals.contains(state)
    }

    fn random_state(&self, seed: u64) -> usize {
        StdRng::seed_from_u64(seed).gen_range(0..self.vertices.len())
    }
}
