//! Binary heap with in-place key changes.
//!
//! Entries are ordered by a [`Compare`] strategy over their keys; ties are
//! broken by insertion order (FIFO). Every queued item maps to a dense
//! index ([`HeapItem`]), and the heap keeps a slot table indexed by it so
//! that [`IndexedHeap::modify`] can re-sift an entry without searching for
//! it.

use std::cmp::Ordering;

use crate::error::QueueError;

/// Sentinel for "no slot".
const NO_SLOT: usize = usize::MAX;

/// An item that can live in an [`IndexedHeap`].
///
/// `heap_index` must be small and dense: the heap sizes its slot table by
/// the largest index it has seen.
pub trait HeapItem: Copy {
    fn heap_index(self) -> usize;
}

impl HeapItem for usize {
    #[inline]
    fn heap_index(self) -> usize {
        self
    }
}

/// Ordering strategy for heap keys.
///
/// `Ordering::Less` means `a` is dequeued before `b`. The relation must be
/// a total preorder.
pub trait Compare<K> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Smallest key first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinFirst;

impl<K: Ord> Compare<K> for MinFirst {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Largest key first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFirst;

impl<K: Ord> Compare<K> for MaxFirst {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[derive(Debug, Clone)]
struct Entry<T, K> {
    item: T,
    key: K,
    /// Insertion counter; lower = enqueued earlier.
    seq: u64,
}

/// A binary heap supporting `enqueue`, `dequeue`, and `modify` in
/// O(log n).
///
/// ```
/// use waypath_paths::IndexedHeap;
///
/// let mut heap: IndexedHeap<usize, i32> = IndexedHeap::new();
/// heap.enqueue(0, 30).unwrap();
/// heap.enqueue(1, 20).unwrap();
/// heap.modify(0, 10).unwrap();
/// assert_eq!(heap.dequeue(), Ok((0, 10)));
/// assert_eq!(heap.dequeue(), Ok((1, 20)));
/// assert!(heap.dequeue().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IndexedHeap<T, K, C = MinFirst> {
    entries: Vec<Entry<T, K>>,
    /// `slots[item.heap_index()]` is the entry position of a queued item.
    /// Stale values are allowed; see [`IndexedHeap::slot_of`].
    slots: Vec<usize>,
    cmp: C,
    seq: u64,
}

impl<T: HeapItem, K, C: Compare<K> + Default> Default for IndexedHeap<T, K, C> {
    fn default() -> Self {
        Self::with_compare(C::default())
    }
}

impl<T: HeapItem, K: Ord> IndexedHeap<T, K, MinFirst> {
    /// Create an empty min-heap.
    pub fn new() -> Self {
        Self::with_compare(MinFirst)
    }
}

impl<T: HeapItem, K, C: Compare<K>> IndexedHeap<T, K, C> {
    /// Create an empty heap ordered by `cmp`.
    pub fn with_compare(cmp: C) -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
            cmp,
            seq: 0,
        }
    }

    /// Create an empty heap with room for `capacity` entries and item
    /// indices below `capacity`.
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: vec![NO_SLOT; capacity],
            cmp,
            seq: 0,
        }
    }

    /// Number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `item` is currently queued.
    #[inline]
    pub fn contains(&self, item: T) -> bool {
        self.slot_of(item).is_some()
    }

    /// The key `item` is queued with.
    pub fn key(&self, item: T) -> Option<&K> {
        self.slot_of(item).map(|s| &self.entries[s].key)
    }

    /// The entry that the next `dequeue` returns.
    pub fn peek(&self) -> Option<(T, &K)> {
        self.entries.first().map(|e| (e.item, &e.key))
    }

    /// Insert `item` with priority `key`.
    pub fn enqueue(&mut self, item: T, key: K) -> Result<(), QueueError> {
        let idx = item.heap_index();
        if self.slot_of(item).is_some() {
            return Err(QueueError::AlreadyQueued(idx));
        }
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, NO_SLOT);
        }
        let pos = self.entries.len();
        self.entries.push(Entry {
            item,
            key,
            seq: self.seq,
        });
        self.seq += 1;
        self.slots[idx] = pos;
        self.sift_up(pos);
        Ok(())
    }

    /// Remove and return the best entry.
    pub fn dequeue(&mut self) -> Result<(T, K), QueueError> {
        if self.entries.is_empty() {
            return Err(QueueError::Empty);
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop().ok_or(QueueError::Empty)?;
        self.slots[entry.item.heap_index()] = NO_SLOT;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.item, entry.key))
    }

    /// Replace the key of a queued item and restore heap order from its
    /// current slot. The item keeps its original insertion rank for ties.
    pub fn modify(&mut self, item: T, key: K) -> Result<(), QueueError> {
        let pos = self
            .slot_of(item)
            .ok_or(QueueError::NotQueued(item.heap_index()))?;
        self.entries[pos].key = key;
        let pos = self.sift_up(pos);
        self.sift_down(pos);
        Ok(())
    }

    /// Drop every entry. The slot table is left as is: stale slots fail the
    /// cross-check in `slot_of`, so this is O(1) for trivially droppable
    /// items and keys.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Validated slot lookup.
    #[inline]
    fn slot_of(&self, item: T) -> Option<usize> {
        let idx = item.heap_index();
        let pos = *self.slots.get(idx)?;
        match self.entries.get(pos) {
            Some(e) if e.item.heap_index() == idx => Some(pos),
            _ => None,
        }
    }

    /// Whether the entry at `i` must be dequeued before the one at `j`.
    #[inline]
    fn before(&self, i: usize, j: usize) -> bool {
        let (a, b) = (&self.entries[i], &self.entries[j]);
        self.cmp
            .compare(&a.key, &b.key)
            .then(a.seq.cmp(&b.seq))
            .is_lt()
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.entries.swap(i, j);
        self.slots[self.entries[i].item.heap_index()] = i;
        self.slots[self.entries[j].item.heap_index()] = j;
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.before(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;
            if left < len && self.before(left, best) {
                best = left;
            }
            if right < len && self.before(right, best) {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        for i in 1..self.entries.len() {
            assert!(!self.before(i, (i - 1) / 2), "heap order broken at {i}");
        }
        for (pos, e) in self.entries.iter().enumerate() {
            assert_eq!(self.slots[e.item.heap_index()], pos, "slot table out of sync");
        }
    }
}
