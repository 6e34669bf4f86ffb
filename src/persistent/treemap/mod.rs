//! Persistent (immutable) ordered map based on a Red-Black Tree.
//!
//! This module provides [`PersistentTreeMap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentTreeMap` is a balanced binary search tree that keeps the
//! red-black invariants:
//!
//! 1. Every node is either red or black
//! 2. The root is black
//! 3. Empty leaves count as black
//! 4. A red node has no red child
//! 5. Every path from a node down to its empty leaves contains the same
//!    number of black nodes
//!
//! These rules bound the height by 2 log2(N + 1). Every update rebuilds only
//! the path from the root to the touched node and shares every other subtree
//! with the map it was derived from.
//!
//! # Examples
//!
//! ```rust
//! use persistent_ordmap::persistent::PersistentTreeMap;
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing preserves the original
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(updated.get(&1), Some(&"ONE"));
//! ```

mod insert;
mod invariant;
mod iter;
mod merge;
mod node;
mod remove;
#[cfg(feature = "serde")]
mod serde;
mod traversal;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::InvariantViolation;

use insert::insert_into_node;
use invariant::validate_link;
use node::{Link, blacken_root};
use remove::{max_node, min_node, remove_from_node, remove_min_from_node};

pub use iter::{
    PersistentTreeMapIntoIterator, PersistentTreeMapIterator, PersistentTreeMapRangeIterator,
};
pub use traversal::Branch;

/// A persistent (immutable) ordered map based on a Red-Black Tree.
///
/// All operations return new maps without modifying the original, sharing
/// every untouched subtree between versions.
///
/// Keys must implement `Ord` for ordering. The map keeps its entries in
/// sorted key order, enabling range queries, ordered iteration from both
/// ends and early-terminating folds.
///
/// # Time Complexity
///
/// | Operation                      | Complexity            |
/// |--------------------------------|-----------------------|
/// | `new`                          | O(1)                  |
/// | `get` / `contains_key`         | O(log N)              |
/// | `insert` / `update`            | O(log N)              |
/// | `remove`                       | O(log N)              |
/// | `min` / `max`                  | O(log N)              |
/// | `pop_min` / `pop_max`          | O(log N)              |
/// | `range`                        | O(log N + k)          |
/// | `fold_left` / `fold_right`     | O(N)                  |
/// | `fold_left_until` and friends  | O(log N + k) visited  |
/// | `merge`                        | O(N + M)              |
/// | `union`                        | O(min(N, M) log(N + M)) |
/// | `map_values`                   | O(N)                  |
/// | `filter` / `partition`         | O(N log N)            |
/// | `len` / `is_empty`             | O(1)                  |
///
/// # Examples
///
/// ```rust
/// use persistent_ordmap::persistent::PersistentTreeMap;
///
/// let map = PersistentTreeMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// let map = PersistentTreeMap::new()
///     .insert(3, "three")
///     .insert(1, "one")
///     .insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
/// ```
#[derive(Clone)]
pub struct PersistentTreeMap<K, V> {
    /// Root node of the tree
    root: Link<K, V>,
    /// Number of entries
    length: usize,
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let empty: PersistentTreeMap<i32, String> = PersistentTreeMap::new();
    /// assert!(empty.is_empty());
    ///
    /// let non_empty = empty.insert(1, "one".to_string());
    /// assert!(!non_empty.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one");
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        min_node(self.root.as_ref()).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        max_node(self.root.as_ref()).map(|node| (&node.key, &node.value))
    }
}

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Returns `true` if the map contains the given key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Verifies the red-black invariants and the cached length.
    ///
    /// Every map built through this API passes; the check exists for tests
    /// and for debugging code that builds many versions.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found in a depth-first walk.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (0..1_000).map(|key| (key, key)).collect();
    /// let map = (0..500).fold(map, |map, key| map.remove(&(key * 2)));
    /// assert_eq!(map.check_invariants(), Ok(()));
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let result = validate_link(self.root.as_ref()).and_then(|counted| {
            if counted == self.length {
                Ok(())
            } else {
                Err(InvariantViolation::LengthMismatch {
                    cached: self.length,
                    counted,
                })
            }
        });

        if let Err(violation) = &result {
            tracing::debug!(
                %violation,
                length = self.length,
                "persistent tree map failed invariant check"
            );
        }
        result
    }
}

impl<K: Clone + Ord, V: Clone> PersistentTreeMap<K, V> {
    /// Creates a map containing a single key-value pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::singleton(42, "answer");
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&42), Some(&"answer"));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If an equal key already exists, only its value is replaced: the
    /// stored key is kept, `key` is dropped, and the tree shape and length
    /// stay the same.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map1 = PersistentTreeMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE"));
    /// assert_eq!(map2.len(), 1);
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (root, added) = insert_into_node(self.root.as_ref(), key, value);
        Self {
            root: blacken_root(root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Updates the entry for `key` through a function of its current value.
    ///
    /// `Some` from the function inserts or replaces the value, `None`
    /// removes the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let counts = PersistentTreeMap::new().insert("a", 1);
    ///
    /// let counts = counts.update("a", |count| count.map(|count| count + 1));
    /// let counts = counts.update("b", |count| Some(count.map_or(1, |count| count + 1)));
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    ///
    /// let counts = counts.update("a", |_| None);
    /// assert!(!counts.contains_key("a"));
    /// ```
    #[must_use]
    pub fn update<F>(&self, key: K, function: F) -> Self
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        match function(self.get(&key)) {
            Some(value) => self.insert(key, value),
            None => self.remove(&key),
        }
    }

    /// Removes a key from the map.
    ///
    /// Removing an absent key returns a map that shares the whole tree with
    /// `self`; no node is allocated.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2); // Original unchanged
    /// assert_eq!(removed.len(), 1);
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return self.clone();
        }
        Self {
            root: blacken_root(remove_from_node(self.root.as_ref(), key)),
            length: self.length - 1,
        }
    }

    /// Removes the smallest entry, returning it with the remaining map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new().insert(2, 'b').insert(1, 'a');
    /// let ((key, value), rest) = map.pop_min().unwrap();
    /// assert_eq!((key, value), (1, 'a'));
    /// assert_eq!(rest.len(), 1);
    ///
    /// assert!(PersistentTreeMap::<i32, char>::new().pop_min().is_none());
    /// ```
    #[must_use]
    pub fn pop_min(&self) -> Option<((K, V), Self)> {
        let root = self.root.as_ref()?;
        let minimum = min_node(Some(root))?;
        let entry = (minimum.key.clone(), minimum.value.clone());
        let rest = Self {
            root: blacken_root(remove_min_from_node(root)),
            length: self.length - 1,
        };
        Some((entry, rest))
    }

    /// Removes the largest entry, returning it with the remaining map.
    #[must_use]
    pub fn pop_max(&self) -> Option<((K, V), Self)> {
        let maximum = max_node(self.root.as_ref())?;
        let entry = (maximum.key.clone(), maximum.value.clone());
        let rest = Self {
            root: blacken_root(remove_from_node(self.root.as_ref(), &maximum.key)),
            length: self.length - 1,
        };
        Some((entry, rest))
    }

    /// Keeps only the entries for which the predicate holds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (1..=6).map(|key| (key, key * key)).collect();
    /// let even = map.filter(|key, _| key % 2 == 0);
    /// assert_eq!(even.keys().copied().collect::<Vec<_>>(), vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.fold_left(Self::new(), |kept, key, value| {
            if predicate(key, value) {
                kept.insert(key.clone(), value.clone())
            } else {
                kept
            }
        })
    }

    /// Splits the map into the entries that satisfy the predicate and those
    /// that do not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, &str> =
    ///     [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
    /// let (short, long) = map.partition(|_, name| name.len() == 3);
    /// assert_eq!(short.len(), 2);
    /// assert_eq!(long.get(&3), Some(&"three"));
    /// ```
    #[must_use]
    pub fn partition<F>(&self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.fold_left((Self::new(), Self::new()), |(matching, rest), key, value| {
            if predicate(key, value) {
                (matching.insert(key.clone(), value.clone()), rest)
            } else {
                (matching, rest.insert(key.clone(), value.clone()))
            }
        })
    }

    /// Transforms values and drops the entries mapped to `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "1".to_string())
    ///     .insert(2, "abc".to_string())
    ///     .insert(3, "42".to_string());
    /// let parsed = map.filter_map(|_, text| text.parse::<i32>().ok());
    /// assert_eq!(parsed.len(), 2);
    /// assert_eq!(parsed.get(&3), Some(&42));
    /// ```
    #[must_use]
    pub fn filter_map<W, F>(&self, mut transform: F) -> PersistentTreeMap<K, W>
    where
        W: Clone,
        F: FnMut(&K, &V) -> Option<W>,
    {
        self.fold_left(PersistentTreeMap::new(), |kept, key, value| {
            match transform(key, value) {
                Some(new_value) => kept.insert(key.clone(), new_value),
                None => kept,
            }
        })
    }

    /// Collects the entries in ascending key order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Collects the entries in descending key order.
    #[must_use]
    pub fn to_vec_descending(&self) -> Vec<(K, V)> {
        self.iter()
            .rev()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for PersistentTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for PersistentTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for PersistentTreeMap<K, V> {}

/// Hashes the length, then every entry in ascending key order, so equal
/// maps hash equally whatever their insertion history.
impl<K: Hash, V: Hash> Hash for PersistentTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for PersistentTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

impl<K: Clone + Ord, V: Clone> From<BTreeMap<K, V>> for PersistentTreeMap<K, V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Clone + Ord, V: Clone> From<&PersistentTreeMap<K, V>> for BTreeMap<K, V> {
    fn from(map: &PersistentTreeMap<K, V>) -> Self {
        map.fold_left(Self::new(), |mut target, key, value| {
            target.insert(key.clone(), value.clone());
            target
        })
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================


#[cfg(all(test, not(feature = "arc")))]
mod local_only_tests {
    use super::*;
    use static_assertions::assert_not_impl_any;

    assert_not_impl_any!(PersistentTreeMap<i32, String>: Send, Sync);
}

// =============================================================================
// Multithread Tests (arc feature only)
// =============================================================================

#[cfg(all(test, feature = "arc"))]
mod multithread_tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn test_versions_built_on_other_threads_leave_base_untouched() {
        let base: Arc<PersistentTreeMap<i32, i32>> =
            Arc::new((0..100).map(|key| (key, key)).collect());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let base = Arc::clone(&base);
                thread::spawn(move || {
                    let derived = (0..25).fold((*base).clone(), |map, offset| {
                        map.remove(&(worker * 25 + offset))
                    });
                    assert_eq!(derived.check_invariants(), Ok(()));
                    derived.len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("worker panicked"), 75);
        }
        assert_eq!(base.len(), 100);
        assert_eq!(base.check_invariants(), Ok(()));
    }
}
