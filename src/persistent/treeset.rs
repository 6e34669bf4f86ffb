//! Persistent (immutable) ordered set.
//!
//! [`PersistentTreeSet`] is a [`PersistentTreeMap`] whose values are `()`.
//! It offers the same complexity guarantees and the same traversal
//! combinators, with element-only callbacks.
//!
//! # Examples
//!
//! ```rust
//! use persistent_ordmap::persistent::PersistentTreeSet;
//!
//! let primes: PersistentTreeSet<u32> = [7, 2, 5, 3].into_iter().collect();
//! let odd_primes = primes.remove(&2);
//!
//! assert_eq!(primes.to_vec(), vec![2, 3, 5, 7]);
//! assert_eq!(odd_primes.to_vec(), vec![3, 5, 7]);
//! ```

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeBounds;

use crate::control::FoldStep;

use super::treemap::{
    Branch, PersistentTreeMap, PersistentTreeMapIntoIterator, PersistentTreeMapIterator,
    PersistentTreeMapRangeIterator,
};
use super::InvariantViolation;

/// A deferred fold over one subtree of a [`PersistentTreeSet`].
///
/// See [`PersistentTreeSet::restructure`].
pub type SetBranch<'t, 'f, T, B> = Branch<'t, 'f, T, (), B>;

/// A persistent (immutable) ordered set based on a Red-Black Tree.
///
/// # Time Complexity
///
/// | Operation                 | Complexity            |
/// |---------------------------|-----------------------|
/// | `contains`                | O(log N)              |
/// | `insert` / `remove`       | O(log N)              |
/// | `min` / `max`             | O(log N)              |
/// | `pop_min` / `pop_max`     | O(log N)              |
/// | `range`                   | O(log N + k)          |
/// | `fold_left` / `fold_right`| O(N)                  |
/// | `union`                   | O(min(N, M) log(N + M)) |
/// | `len` / `is_empty`        | O(1)                  |
///
/// # Examples
///
/// ```rust
/// use persistent_ordmap::persistent::PersistentTreeSet;
///
/// let set = PersistentTreeSet::new().insert(3).insert(1).insert(2).insert(1);
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&2));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PersistentTreeSet<T> {
    map: PersistentTreeMap<T, ()>,
}

impl<T> PersistentTreeSet<T> {
    /// Creates a new empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: PersistentTreeMap::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.map.min().map(|(element, ())| element)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.map.max().map(|(element, ())| element)
    }

    /// Returns an iterator over the elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> PersistentTreeSetIterator<'_, T> {
        PersistentTreeSetIterator {
            inner: self.map.iter(),
        }
    }

    /// Folds over the elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (1..=4).collect();
    /// assert_eq!(set.fold_left(0, |total, element| total * 10 + element), 1234);
    /// ```
    pub fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.map
            .fold_left(init, |accumulator, element, ()| function(accumulator, element))
    }

    /// Folds over the elements in descending order.
    pub fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        self.map
            .fold_right(init, |element, (), accumulator| function(element, accumulator))
    }

    /// Folds in ascending order until `function` returns [`FoldStep::Stop`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<u64> = (1..=10_000).collect();
    /// let first_square_over_1000 =
    ///     set.fold_left_until(None, |_, element| {
    ///         let square = element * element;
    ///         FoldStep::stop_if(square > 1000, Some(square))
    ///     });
    /// assert_eq!(first_square_over_1000, Some(1024));
    /// ```
    pub fn fold_left_until<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> FoldStep<B>,
    {
        self.map
            .fold_left_until(init, |accumulator, element, ()| function(accumulator, element))
    }

    /// Folds in descending order until `function` returns [`FoldStep::Stop`].
    pub fn fold_right_until<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> FoldStep<B>,
    {
        self.map
            .fold_right_until(init, |element, (), accumulator| function(element, accumulator))
    }

    /// Folds over the tree shape; see [`PersistentTreeMap::restructure`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (0..1_000).collect();
    ///
    /// // Membership test that only walks one path.
    /// let has_500 = set.restructure(false, |element, left, right| {
    ///     match element.cmp(&500) {
    ///         std::cmp::Ordering::Greater => left.evaluate(),
    ///         std::cmp::Ordering::Equal => true,
    ///         std::cmp::Ordering::Less => right.evaluate(),
    ///     }
    /// });
    /// assert!(has_500);
    /// ```
    pub fn restructure<'t, B, F>(&'t self, leaf: B, function: F) -> B
    where
        B: Clone,
        F: for<'f> Fn(&'t T, SetBranch<'t, 'f, T, B>, SetBranch<'t, 'f, T, B>) -> B,
    {
        self.map
            .restructure(leaf, |element, _, left, right| function(element, left, right))
    }
}

impl<T: Ord> PersistentTreeSet<T> {
    /// Returns `true` if the set contains `element`.
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(element)
    }

    /// Returns an iterator over the elements within `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = (0..100).step_by(10).collect();
    /// let middle: Vec<_> = set.range(25..=60).copied().collect();
    /// assert_eq!(middle, vec![30, 40, 50, 60]);
    /// ```
    pub fn range<R, Q>(&self, range: R) -> PersistentTreeSetRangeIterator<'_, T>
    where
        R: RangeBounds<Q>,
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        PersistentTreeSetRangeIterator {
            inner: self.map.range(range),
        }
    }

    /// Verifies the red-black invariants of the underlying tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.map.check_invariants()
    }
}

impl<T: Clone + Ord> PersistentTreeSet<T> {
    /// Creates a set with a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().insert(element)
    }

    /// Adds an element. Adding an existing element changes nothing
    /// observable.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        Self {
            map: self.map.insert(element, ()),
        }
    }

    /// Removes an element. Removing an absent element shares the whole tree
    /// with `self`.
    #[must_use]
    pub fn remove<Q>(&self, element: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Self {
            map: self.map.remove(element),
        }
    }

    /// Removes the smallest element, returning it with the remaining set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let set: PersistentTreeSet<i32> = [1, 2].into_iter().collect();
    /// let (smallest, rest) = set.pop_min().unwrap();
    /// assert_eq!(smallest, 1);
    /// assert_eq!(rest.to_vec(), vec![2]);
    ///
    /// assert!(PersistentTreeSet::<i32>::new().pop_min().is_none());
    /// ```
    #[must_use]
    pub fn pop_min(&self) -> Option<(T, Self)> {
        self.map
            .pop_min()
            .map(|((element, ()), map)| (element, Self { map }))
    }

    /// Removes the largest element, returning it with the remaining set.
    #[must_use]
    pub fn pop_max(&self) -> Option<(T, Self)> {
        self.map
            .pop_max()
            .map(|((element, ()), map)| (element, Self { map }))
    }

    /// Keeps the elements for which the predicate holds.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self {
            map: self.map.filter(|element, ()| predicate(element)),
        }
    }

    /// Splits the set by a predicate into `(matching, rest)`.
    #[must_use]
    pub fn partition<F>(&self, mut predicate: F) -> (Self, Self)
    where
        F: FnMut(&T) -> bool,
    {
        let (matching, rest) = self.map.partition(|element, ()| predicate(element));
        (Self { map: matching }, Self { map: rest })
    }

    /// Applies a function to every element, collecting the results into a
    /// new set. Results that compare equal collapse into one element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeSet;
    ///
    /// let words: PersistentTreeSet<&str> = ["pear", "plum", "fig"].into_iter().collect();
    /// let lengths = words.map(|word| word.len());
    /// assert_eq!(lengths.to_vec(), vec![3, 4]);
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, mut function: F) -> PersistentTreeSet<U>
    where
        U: Clone + Ord,
        F: FnMut(&T) -> U,
    {
        self.fold_left(PersistentTreeSet::new(), |mapped, element| {
            mapped.insert(function(element))
        })
    }

    /// Elements in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            map: self.map.union(&other.map),
        }
    }

    /// Elements in both sets.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            map: self.map.intersect(&other.map),
        }
    }

    /// Elements of `self` that are not in `other`.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Self {
        Self {
            map: self.map.diff(&other.map),
        }
    }

    /// Collects the elements in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// An iterator over the elements of a [`PersistentTreeSet`] in ascending
/// order.
pub struct PersistentTreeSetIterator<'a, T> {
    inner: PersistentTreeMapIterator<'a, T, ()>,
}

impl<T> Clone for PersistentTreeSetIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for PersistentTreeSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for PersistentTreeSetIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(element, ())| element)
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetIterator<'_, T> {}

impl<T> FusedIterator for PersistentTreeSetIterator<'_, T> {}

/// An iterator over the elements of a [`PersistentTreeSet`] within a range.
pub struct PersistentTreeSetRangeIterator<'a, T> {
    inner: PersistentTreeMapRangeIterator<'a, T, ()>,
}

impl<'a, T> Iterator for PersistentTreeSetRangeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for PersistentTreeSetRangeIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(element, ())| element)
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetRangeIterator<'_, T> {}

impl<T> FusedIterator for PersistentTreeSetRangeIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentTreeSet`].
pub struct PersistentTreeSetIntoIterator<T> {
    inner: PersistentTreeMapIntoIterator<T, ()>,
}

impl<T> Iterator for PersistentTreeSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(element, ())| element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for PersistentTreeSetIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(element, ())| element)
    }
}

impl<T> ExactSizeIterator for PersistentTreeSetIntoIterator<T> {}

impl<T> FusedIterator for PersistentTreeSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentTreeSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Ord> FromIterator<T> for PersistentTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|element| (element, ())).collect(),
        }
    }
}

impl<T: Clone> IntoIterator for PersistentTreeSet<T> {
    type Item = T;
    type IntoIter = PersistentTreeSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentTreeSetIntoIterator {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentTreeSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentTreeSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

impl<T: Clone + Ord> From<BTreeSet<T>> for PersistentTreeSet<T> {
    fn from(set: BTreeSet<T>) -> Self {
        set.into_iter().collect()
    }
}

impl<T: Clone + Ord> From<&PersistentTreeSet<T>> for BTreeSet<T> {
    fn from(set: &PersistentTreeSet<T>) -> Self {
        set.fold_left(Self::new(), |mut target, element| {
            target.insert(element.clone());
            target
        })
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentTreeSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct PersistentTreeSetVisitor<T> {
    marker: std::marker::PhantomData<fn() -> PersistentTreeSet<T>>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentTreeSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    type Value = PersistentTreeSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentTreeSet::new();
        while let Some(element) = access.next_element()? {
            set = set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentTreeSet<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentTreeSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
