//! Iterators over [`PersistentTreeMap`] entries.
//!
//! Borrowing iterators walk the tree with two explicit stacks, one per end,
//! so they can be driven from either side. Neither stack outgrows the tree
//! height, which stays logarithmic in the number of entries.

use std::borrow::Borrow;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use smallvec::SmallVec;

use crate::persistent::ReferenceCounter;

use super::PersistentTreeMap;
use super::node::Node;

/// Inline stack capacity. Tree height stays below this until roughly 2^24
/// entries, after which the stacks spill to the heap.
const STACK_CAPACITY: usize = 48;

type NodeStack<'a, K, V> = SmallVec<[&'a Node<K, V>; STACK_CAPACITY]>;

/// An iterator over key-value pairs of a [`PersistentTreeMap`] in ascending
/// key order.
///
/// Created by [`PersistentTreeMap::iter`].
pub struct PersistentTreeMapIterator<'a, K, V> {
    forward: NodeStack<'a, K, V>,
    backward: NodeStack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> PersistentTreeMapIterator<'a, K, V> {
    pub(super) fn new(root: Option<&'a ReferenceCounter<Node<K, V>>>, length: usize) -> Self {
        let mut iterator = Self {
            forward: SmallVec::new(),
            backward: SmallVec::new(),
            remaining: length,
        };
        iterator.descend_left(root);
        iterator.descend_right(root);
        iterator
    }

    fn descend_left(&mut self, mut link: Option<&'a ReferenceCounter<Node<K, V>>>) {
        while let Some(node) = link {
            self.forward.push(node);
            link = node.left.as_ref();
        }
    }

    fn descend_right(&mut self, mut link: Option<&'a ReferenceCounter<Node<K, V>>>) {
        while let Some(node) = link {
            self.backward.push(node);
            link = node.right.as_ref();
        }
    }
}

impl<'a, K, V> Iterator for PersistentTreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.forward.pop()?;
        self.descend_left(node.right.as_ref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for PersistentTreeMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.backward.pop()?;
        self.descend_right(node.left.as_ref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentTreeMapIterator<'_, K, V> {}

impl<K, V> Clone for PersistentTreeMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            backward: self.backward.clone(),
            remaining: self.remaining,
        }
    }
}

/// An iterator over the entries of a [`PersistentTreeMap`] whose keys fall
/// within a range.
///
/// Created by [`PersistentTreeMap::range`].
pub struct PersistentTreeMapRangeIterator<'a, K, V> {
    entries: std::vec::IntoIter<(&'a K, &'a V)>,
}

impl<'a, K, V> Iterator for PersistentTreeMapRangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for PersistentTreeMapRangeIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapRangeIterator<'_, K, V> {}

impl<K, V> FusedIterator for PersistentTreeMapRangeIterator<'_, K, V> {}

/// An owning iterator over the entries of a [`PersistentTreeMap`].
///
/// Nodes may be shared with other map versions, so entries are cloned out
/// of the tree.
pub struct PersistentTreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentTreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for PersistentTreeMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for PersistentTreeMapIntoIterator<K, V> {}

impl<K, V> FusedIterator for PersistentTreeMapIntoIterator<K, V> {}

impl<K, V> PersistentTreeMap<K, V> {
    /// Returns an iterator over entries in ascending key order.
    ///
    /// The iterator is double-ended, so `.rev()` walks in descending order.
    ///
    /// # Complexity
    ///
    /// O(log N) to create, O(1) amortized per step
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// let ascending: Vec<_> = map.iter().map(|(key, _)| *key).collect();
    /// assert_eq!(ascending, vec![1, 2, 3]);
    ///
    /// let descending: Vec<_> = map.iter().rev().map(|(key, _)| *key).collect();
    /// assert_eq!(descending, vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentTreeMapIterator<'_, K, V> {
        PersistentTreeMapIterator::new(self.root.as_ref(), self.length)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }
}

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Returns an iterator over the entries whose keys fall within `range`.
    ///
    /// Subtrees entirely outside the range are never visited.
    ///
    /// # Complexity
    ///
    /// O(log N + k) where k is the number of entries in range
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, char> =
    ///     (1..=5).zip("abcde".chars()).collect();
    ///
    /// let middle: Vec<_> = map.range(2..=4).map(|(_, value)| *value).collect();
    /// assert_eq!(middle, vec!['b', 'c', 'd']);
    /// ```
    pub fn range<R, Q>(&self, range: R) -> PersistentTreeMapRangeIterator<'_, K, V>
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut entries = Vec::new();
        collect_range(self.root.as_ref(), &range, &mut entries);
        PersistentTreeMapRangeIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentTreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        PersistentTreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentTreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn collect_range<'a, K, V, Q, R>(
    link: Option<&'a ReferenceCounter<Node<K, V>>>,
    range: &R,
    entries: &mut Vec<(&'a K, &'a V)>,
) where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    let Some(node) = link else {
        return;
    };
    let key: &Q = node.key.borrow();

    let above_start = match range.start_bound() {
        Bound::Included(start) => key >= start,
        Bound::Excluded(start) => key > start,
        Bound::Unbounded => true,
    };
    let below_end = match range.end_bound() {
        Bound::Included(end) => key <= end,
        Bound::Excluded(end) => key < end,
        Bound::Unbounded => true,
    };

    if above_start {
        collect_range(node.left.as_ref(), range, entries);
    }
    if above_start && below_end {
        entries.push((&node.key, &node.value));
    }
    if below_end {
        collect_range(node.right.as_ref(), range, entries);
    }
}
