//! Open list that groups nodes by identical `(g, h)` and orders the groups
//! by potential.
//!
//! The potential of a bucket is `(bound × fMin − g) / h`: how much cost
//! slack remains under the suboptimality bound per unit of remaining
//! heuristic distance. Higher potential pops first; `h = 0` buckets have
//! maximal potential. Ties go to the smaller `g`, then the smaller `h`.
//!
//! The ordering depends on `fMin`, the smallest `f` on the list. Whenever
//! `fMin` changes, a new [`PotentialOrder`] is built and the bucket queue is
//! rebuilt under it. `fMin` is recomputed by a full scan of the queued
//! buckets when the node that defined it leaves the list.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::indexed_heap::{HeapKey, IndexedHeap, QueueError, QueueOrder};

/// A node that can be filed on a [`BucketOpenList`].
///
/// Equality identifies the node inside its bucket; two nodes with the
/// same `(g, h)` but different identity share a bucket.
pub trait BucketNode: Clone + PartialEq {
    fn g_value(&self) -> f64;
    fn h_value(&self) -> f64;
    fn f_value(&self) -> f64 {
        self.g_value() + self.h_value()
    }
}

/// Misuse of a [`BucketOpenList`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    #[error("no node with g={g} h={h} is on the bucket open list")]
    NodeNotFound { g: f64, h: f64 },
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// All nodes currently sharing one `(g, h)` pair, in insertion order.
#[derive(Debug, Clone)]
pub struct Bucket<T> {
    pub f: f64,
    pub g: f64,
    pub h: f64,
    nodes: Vec<T>,
}

impl<T> Bucket<T> {
    #[must_use]
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The `(g, h)` pair of a bucket as stored in the bucket queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhPair {
    pub bucket: usize,
    pub g: f64,
    pub h: f64,
}

impl GhPair {
    #[must_use]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

impl HeapKey for GhPair {
    fn heap_key(&self) -> usize {
        self.bucket
    }
}

/// Potential ordering captured for one `(bound, fMin)`.
///
/// Never mutated: a change of `fMin` produces a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotentialOrder {
    bound: f64,
    f_min: f64,
}

impl PotentialOrder {
    #[must_use]
    pub fn new(bound: f64, f_min: f64) -> Self {
        Self { bound, f_min }
    }

    /// `(bound × fMin − g) / h`, or `f64::MAX` when `h = 0`.
    #[must_use]
    pub fn potential(&self, g: f64, h: f64) -> f64 {
        if h == 0.0 {
            f64::MAX
        } else {
            (self.bound * self.f_min - g) / h
        }
    }
}

impl QueueOrder<GhPair> for PotentialOrder {
    fn compare(&self, a: &GhPair, b: &GhPair) -> Ordering {
        let pa = self.potential(a.g, a.h);
        let pb = self.potential(b.g, b.h);
        pb.total_cmp(&pa)
            .then(a.g.total_cmp(&b.g))
            .then(a.h.total_cmp(&b.h))
            .then(a.bucket.cmp(&b.bucket))
    }
}

/// Exact-match lookup key for a `(g, h)` pair. `-0.0` files with `0.0`.
fn gh_key(g: f64, h: f64) -> (u64, u64) {
    ((g + 0.0).to_bits(), (h + 0.0).to_bits())
}

/// Potential-ordered open list of `(g, h)` buckets.
#[derive(Debug, Clone)]
pub struct BucketOpenList<T> {
    bound: f64,
    f_min: f64,
    queue: IndexedHeap<GhPair>,
    buckets: Vec<Bucket<T>>,
    lookup: HashMap<(u64, u64), usize>,
    free: Vec<usize>,
    len: usize,
}

impl<T: BucketNode> BucketOpenList<T> {
    /// Empty list for suboptimality factor `bound`.
    #[must_use]
    pub fn new(bound: f64) -> Self {
        Self {
            bound,
            f_min: f64::MAX,
            queue: IndexedHeap::new(),
            buckets: Vec::new(),
            lookup: HashMap::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    #[must_use]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Smallest `f` on the list, `f64::MAX` when empty.
    #[must_use]
    pub fn min_f_value(&self) -> f64 {
        self.f_min
    }

    /// Number of non-empty buckets.
    #[must_use]
    pub fn number_of_buckets(&self) -> usize {
        self.lookup.len()
    }

    /// Number of nodes across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bucket the node would be filed in, if one currently exists.
    #[must_use]
    pub fn bucket_of(&self, node: &T) -> Option<&Bucket<T>> {
        self.lookup
            .get(&gh_key(node.g_value(), node.h_value()))
            .map(|&id| &self.buckets[id])
    }

    #[must_use]
    pub fn contains(&self, node: &T) -> bool {
        self.bucket_of(node).is_some_and(|b| b.nodes.contains(node))
    }

    /// Buckets in queue slot order (diagnostics).
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket<T>> {
        self.queue.iter().map(|pair| &self.buckets[pair.bucket])
    }

    fn order(&self) -> PotentialOrder {
        PotentialOrder::new(self.bound, self.f_min)
    }

    /// File `node` in the bucket for its `(g, h)`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Queue`] if the bucket queue is inconsistent.
    pub fn add(&mut self, node: T) -> Result<(), BucketError> {
        let (g, h) = (node.g_value(), node.h_value());
        let f = node.f_value();
        if f < self.f_min {
            self.f_min = f;
            let order = self.order();
            self.queue.reorder(&order);
        }

        let key = gh_key(g, h);
        if let Some(&id) = self.lookup.get(&key) {
            self.buckets[id].nodes.push(node);
        } else {
            let bucket = Bucket {
                f,
                g,
                h,
                nodes: vec![node],
            };
            let id = match self.free.pop() {
                Some(id) => {
                    self.buckets[id] = bucket;
                    id
                }
                None => {
                    self.buckets.push(bucket);
                    self.buckets.len() - 1
                }
            };
            self.lookup.insert(key, id);
            let order = self.order();
            self.queue.add(GhPair { bucket: id, g, h }, &order)?;
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest node of the highest-potential bucket.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Queue`] if the bucket queue is inconsistent.
    pub fn choose_node(&mut self) -> Result<Option<T>, BucketError> {
        let Some(top) = self.queue.peek().copied() else {
            return Ok(None);
        };
        self.take(top.bucket, 0).map(Some)
    }

    /// Remove a specific node, wherever it is filed.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::NodeNotFound`] if the node is not on the list.
    pub fn remove(&mut self, node: &T) -> Result<T, BucketError> {
        let (g, h) = (node.g_value(), node.h_value());
        let not_found = || BucketError::NodeNotFound { g, h };
        let id = *self.lookup.get(&gh_key(g, h)).ok_or_else(not_found)?;
        let position = self.buckets[id]
            .nodes
            .iter()
            .position(|n| n == node)
            .ok_or_else(not_found)?;
        self.take(id, position)
    }

    /// Remove `node` and file `replacement`, used when a node's `(g, h)`
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::NodeNotFound`] if `node` is not on the list.
    pub fn replace(&mut self, node: &T, replacement: T) -> Result<(), BucketError> {
        self.remove(node)?;
        self.add(replacement)
    }

    #[allow(clippy::float_cmp)]
    fn take(&mut self, id: usize, position: usize) -> Result<T, BucketError> {
        let bucket = &mut self.buckets[id];
        let node = bucket.nodes.remove(position);
        let emptied = bucket.nodes.is_empty();
        let (g, h) = (bucket.g, bucket.h);
        self.len -= 1;

        if emptied {
            self.lookup.remove(&gh_key(g, h));
            self.free.push(id);
            let order = self.order();
            self.queue.remove(&GhPair { bucket: id, g, h }, &order)?;
        }

        if node.f_value() == self.f_min {
            self.recompute_min_f_value();
        }
        Ok(node)
    }

    fn recompute_min_f_value(&mut self) {
        self.f_min = self
            .queue
            .iter()
            .map(GhPair::f)
            .fold(f64::MAX, f64::min);
        let order = self.order();
        self.queue.reorder(&order);
    }
}

impl<T: BucketNode + fmt::Debug> fmt::Display for BucketOpenList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fMin: {}", self.f_min)?;
        writeln!(f, "buckets: {} nodes: {}", self.number_of_buckets(), self.len)?;
        for bucket in self.buckets() {
            writeln!(
                f,
                "f: {} | g: {} | h: {} | nodes: {:?}",
                bucket.f, bucket.g, bucket.h, bucket.nodes
            )?;
        }
        Ok(())
    }
}
