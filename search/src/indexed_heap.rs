//! Binary min-heap whose elements know their own slot.
//!
//! Every element exposes a dense integer key ([`HeapKey`]). The heap keeps a
//! key → slot table next to the backing vector, so arbitrary removal and
//! in-place re-prioritisation are O(log n) instead of a linear scan.
//!
//! The ordering is not stored in the heap. Every mutating call receives a
//! [`QueueOrder`], which lets the ordering borrow external data (a node
//! arena) or capture parameters that change over time (`bound`, `fMin`).
//! When those parameters change, call [`IndexedHeap::reorder`] with the new
//! ordering to rebuild the heap.

use std::cmp::Ordering;

use thiserror::Error;

/// An element that can be tracked by slot.
///
/// Keys must be unique among the elements simultaneously present in one
/// heap. They index a dense table, so small consecutive integers are best.
pub trait HeapKey {
    fn heap_key(&self) -> usize;
}

/// Strict weak ordering used by an [`IndexedHeap`]. `Less` pops first.
pub trait QueueOrder<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> QueueOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Misuse of an [`IndexedHeap`]. Always a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("element {key} is already queued")]
    AlreadyQueued { key: usize },
    #[error("element {key} is not queued")]
    NotQueued { key: usize },
}

/// Index-tracked binary min-heap.
#[derive(Debug, Clone)]
pub struct IndexedHeap<T> {
    items: Vec<T>,
    slots: Vec<Option<usize>>,
}

impl<T: HeapKey> IndexedHeap<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            slots: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slot currently occupied by the element with this key, `None` when absent.
    #[must_use]
    pub fn slot_of_key(&self, key: usize) -> Option<usize> {
        self.slots.get(key).copied().flatten()
    }

    /// Slot currently occupied by `item`, `None` when absent.
    #[must_use]
    pub fn slot_of(&self, item: &T) -> Option<usize> {
        self.slot_of_key(item.heap_key())
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.slot_of(item).is_some()
    }

    /// Element stored at `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.items.get(slot)
    }

    /// Highest-priority element without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Elements in slot order (heap order, not sorted). Diagnostics only.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Insert `item`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AlreadyQueued`] if an element with the same key
    /// is present.
    pub fn add(&mut self, item: T, order: &impl QueueOrder<T>) -> Result<(), QueueError> {
        let key = item.heap_key();
        if self.slot_of_key(key).is_some() {
            return Err(QueueError::AlreadyQueued { key });
        }
        if key >= self.slots.len() {
            self.slots.resize(key + 1, None);
        }
        let slot = self.items.len();
        self.items.push(item);
        self.slots[key] = Some(slot);
        self.sift_up(slot, order);
        Ok(())
    }

    /// Remove and return the highest-priority element.
    pub fn pop(&mut self, order: &impl QueueOrder<T>) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.take_slot(0, order))
    }

    /// Remove the element with the same key as `item`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotQueued`] if no such element is present.
    pub fn remove(&mut self, item: &T, order: &impl QueueOrder<T>) -> Result<T, QueueError> {
        let key = item.heap_key();
        let slot = self
            .slot_of_key(key)
            .ok_or(QueueError::NotQueued { key })?;
        Ok(self.take_slot(slot, order))
    }

    /// Replace the stored element with `item` (same key) and restore heap
    /// order after its priority changed.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::NotQueued`] if no element with that key is present.
    pub fn update(&mut self, item: T, order: &impl QueueOrder<T>) -> Result<(), QueueError> {
        let key = item.heap_key();
        let slot = self
            .slot_of_key(key)
            .ok_or(QueueError::NotQueued { key })?;
        self.items[slot] = item;
        let slot = self.sift_up(slot, order);
        self.sift_down(slot, order);
        Ok(())
    }

    /// Rebuild the whole heap under `order`.
    pub fn reorder(&mut self, order: &impl QueueOrder<T>) {
        let len = self.items.len();
        for slot in (0..len / 2).rev() {
            self.sift_down(slot, order);
        }
    }

    /// Remove every element. All keys report `None` afterwards.
    pub fn clear(&mut self) {
        for item in &self.items {
            let key = item.heap_key();
            self.slots[key] = None;
        }
        self.items.clear();
    }

    fn take_slot(&mut self, slot: usize, order: &impl QueueOrder<T>) -> T {
        let item = self.items.swap_remove(slot);
        self.slots[item.heap_key()] = None;
        if slot < self.items.len() {
            let moved = self.items[slot].heap_key();
            self.slots[moved] = Some(slot);
            let slot = self.sift_up(slot, order);
            self.sift_down(slot, order);
        }
        item
    }

    fn sift_up(&mut self, mut slot: usize, order: &impl QueueOrder<T>) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if order.compare(&self.items[slot], &self.items[parent]) != Ordering::Less {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize, order: &impl QueueOrder<T>) -> usize {
        let len = self.items.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && order.compare(&self.items[right], &self.items[left]) == Ordering::Less
            {
                best = right;
            }
            if order.compare(&self.items[best], &self.items[slot]) != Ordering::Less {
                break;
            }
            self.swap(slot, best);
            slot = best;
        }
        slot
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        let key_a = self.items[a].heap_key();
        let key_b = self.items[b].heap_key();
        self.slots[key_a] = Some(a);
        self.slots[key_b] = Some(b);
    }
}

impl<T: HeapKey> Default for IndexedHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: HeapKey> IntoIterator for &'a IndexedHeap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
