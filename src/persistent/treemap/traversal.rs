//! Ordered folds, early-terminating folds and the shape-exposing
//! restructuring fold.
//!
//! None of these allocate tree nodes; [`PersistentTreeMap::map_values`] is the
//! only one that builds a new tree, and it copies the existing shape.

use crate::control::FoldStep;
use crate::persistent::ReferenceCounter;

use super::PersistentTreeMap;
use super::node::{Link, Node};

/// The restructuring function behind every [`Branch`], type-erased so that
/// a branch does not carry the caller's closure type.
type RestructureFunction<'t, 'f, K, V, B> =
    dyn Fn(&'t K, &'t V, Branch<'t, 'f, K, V, B>, Branch<'t, 'f, K, V, B>) -> B + 'f;

/// A deferred fold over one subtree, handed out by
/// [`PersistentTreeMap::restructure`].
///
/// Nothing below the branch is visited until [`Branch::evaluate`] is called.
/// Dropping a branch skips its subtree entirely.
///
/// # Type Parameters
///
/// * `'t` - Lifetime of the borrowed tree
/// * `'f` - Lifetime of the borrowed restructuring function and leaf value
/// * `B` - The result type
pub struct Branch<'t, 'f, K, V, B> {
    node: Option<&'t ReferenceCounter<Node<K, V>>>,
    leaf: &'f B,
    function: &'f RestructureFunction<'t, 'f, K, V, B>,
}

impl<'t, 'f, K, V, B: Clone> Branch<'t, 'f, K, V, B> {
    /// Runs the restructuring fold over this subtree.
    ///
    /// An empty subtree yields a clone of the leaf value.
    pub fn evaluate(self) -> B {
        match self.node {
            None => self.leaf.clone(),
            Some(node) => (self.function)(
                &node.key,
                &node.value,
                self.below(node.left.as_ref()),
                self.below(node.right.as_ref()),
            ),
        }
    }

    const fn below(&self, node: Option<&'t ReferenceCounter<Node<K, V>>>) -> Self {
        Self {
            node,
            leaf: self.leaf,
            function: self.function,
        }
    }
}

impl<K, V> PersistentTreeMap<K, V> {
    /// Folds over all entries in ascending key order.
    ///
    /// # Arguments
    ///
    /// * `init` - The initial accumulator
    /// * `function` - Receives the accumulator, a key and its value
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
    /// let map = PersistentTreeMap::new()
    ///     .insert(2, "b")
    ///     .insert(1, "a")
    ///     .insert(3, "c");
    ///
    /// let joined = map.fold_left(String::new(), |mut text, _, value| {
    ///     text.push_str(value);
    ///     text
    /// });
    /// assert_eq!(joined, "abc");
    /// ```
    pub fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &K, &V) -> B,
    {
        fold_left_node(self.root.as_ref(), init, &mut function)
    }

    /// Folds over all entries in descending key order.
    ///
    /// # Arguments
    ///
    /// * `init` - The initial accumulator
    /// * `function` - Receives a key, its value and the accumulator
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
    /// let map: PersistentTreeMap<i32, i32> = (1..=3).map(|key| (key, key)).collect();
    ///
    /// let keys = map.fold_right(Vec::new(), |key, _, mut keys| {
    ///     keys.push(*key);
    ///     keys
    /// });
    /// assert_eq!(keys, vec![3, 2, 1]);
    /// ```
    pub fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&K, &V, B) -> B,
    {
        fold_right_node(self.root.as_ref(), init, &mut function)
    }

    /// Folds in ascending key order until `function` returns
    /// [`FoldStep::Stop`].
    ///
    /// After a stop no further node is visited, so a fold that finds its
    /// answer early costs O(log N + k) for the k entries seen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, ()> = (1..=10_000).map(|key| (key, ())).collect();
    ///
    /// let sum = map.fold_left_until(0, |sum, key, _| FoldStep::stop_if(*key >= 10, sum + key));
    /// assert_eq!(sum, 55);
    /// ```
    pub fn fold_left_until<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &K, &V) -> FoldStep<B>,
    {
        fold_left_until_node(self.root.as_ref(), init, &mut function).into_inner()
    }

    /// Folds in descending key order until `function` returns
    /// [`FoldStep::Stop`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::control::FoldStep;
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, ()> = (1..=10_000).map(|key| (key, ())).collect();
    ///
    /// // The three largest keys.
    /// let top = map.fold_right_until(Vec::new(), |key, _, mut top| {
    ///     top.push(*key);
    ///     FoldStep::stop_if(top.len() == 3, top)
    /// });
    /// assert_eq!(top, vec![10_000, 9_999, 9_998]);
    /// ```
    pub fn fold_right_until<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&K, &V, B) -> FoldStep<B>,
    {
        fold_right_until_node(self.root.as_ref(), init, &mut function).into_inner()
    }

    /// Folds over the tree shape, letting the caller choose which subtrees
    /// to visit.
    ///
    /// For every filled node, `function` receives its key and value plus one
    /// [`Branch`] per child. Calling [`Branch::evaluate`] computes the fold of
    /// that child; a branch that is never evaluated is never walked. Empty
    /// subtrees evaluate to a clone of `leaf`.
    ///
    /// The caller sees keys, values and child results only; the tree itself
    /// stays untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map: PersistentTreeMap<i32, i32> = (1..=100).map(|key| (key, key * key)).collect();
    ///
    /// // Count the keys below 10, skipping every right subtree rooted at or
    /// // above the bound.
    /// let below = map.restructure(0, |key, _, left, right| {
    ///     if *key < 10 {
    ///         left.evaluate() + 1 + right.evaluate()
    ///     } else {
    ///         left.evaluate()
    ///     }
    /// });
    /// assert_eq!(below, 9);
    /// ```
    pub fn restructure<'t, B, F>(&'t self, leaf: B, function: F) -> B
    where
        B: Clone,
        F: for<'f> Fn(&'t K, &'t V, Branch<'t, 'f, K, V, B>, Branch<'t, 'f, K, V, B>) -> B,
    {
        Branch {
            node: self.root.as_ref(),
            leaf: &leaf,
            function: &function,
        }
        .evaluate()
    }

    /// Applies a function to all values, keeping keys and tree shape.
    ///
    /// The function is called once per entry in ascending key order. No
    /// rebalancing happens because the shape is copied as-is.
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
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20);
    /// let doubled = map.map_values(|value| value * 2);
    /// assert_eq!(doubled.get(&1), Some(&20));
    /// assert_eq!(doubled.get(&2), Some(&40));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> PersistentTreeMap<K, W>
    where
        K: Clone,
        F: FnMut(&V) -> W,
    {
        self.map_with_key(|_, value| transform(value))
    }

    /// Applies a function to every entry, keeping keys and tree shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let map = PersistentTreeMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let labelled = map.map_with_key(|key, value| format!("{key}={value}"));
    /// assert_eq!(labelled.get(&2), Some(&"2=two".to_string()));
    /// ```
    #[must_use]
    pub fn map_with_key<W, F>(&self, mut transform: F) -> PersistentTreeMap<K, W>
    where
        K: Clone,
        F: FnMut(&K, &V) -> W,
    {
        PersistentTreeMap {
            root: map_node(self.root.as_ref(), &mut transform),
            length: self.length,
        }
    }
}

fn fold_left_node<K, V, B, F>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    init: B,
    function: &mut F,
) -> B
where
    F: FnMut(B, &K, &V) -> B,
{
    match node {
        None => init,
        Some(node) => {
            let accumulator = fold_left_node(node.left.as_ref(), init, function);
            let accumulator = function(accumulator, &node.key, &node.value);
            fold_left_node(node.right.as_ref(), accumulator, function)
        }
    }
}

fn fold_right_node<K, V, B, F>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    init: B,
    function: &mut F,
) -> B
where
    F: FnMut(&K, &V, B) -> B,
{
    match node {
        None => init,
        Some(node) => {
            let accumulator = fold_right_node(node.right.as_ref(), init, function);
            let accumulator = function(&node.key, &node.value, accumulator);
            fold_right_node(node.left.as_ref(), accumulator, function)
        }
    }
}

fn fold_left_until_node<K, V, B, F>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    init: B,
    function: &mut F,
) -> FoldStep<B>
where
    F: FnMut(B, &K, &V) -> FoldStep<B>,
{
    let Some(node) = node else {
        return FoldStep::Continue(init);
    };

    fold_left_until_node(node.left.as_ref(), init, function)
        .and_then(|accumulator| function(accumulator, &node.key, &node.value))
        .and_then(|accumulator| fold_left_until_node(node.right.as_ref(), accumulator, function))
}

fn fold_right_until_node<K, V, B, F>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    init: B,
    function: &mut F,
) -> FoldStep<B>
where
    F: FnMut(&K, &V, B) -> FoldStep<B>,
{
    let Some(node) = node else {
        return FoldStep::Continue(init);
    };

    fold_right_until_node(node.right.as_ref(), init, function)
        .and_then(|accumulator| function(&node.key, &node.value, accumulator))
        .and_then(|accumulator| fold_right_until_node(node.left.as_ref(), accumulator, function))
}

fn map_node<K: Clone, V, W, F>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    transform: &mut F,
) -> Link<K, W>
where
    F: FnMut(&K, &V) -> W,
{
    let node = node?;
    let left = map_node(node.left.as_ref(), transform);
    let value = transform(&node.key, &node.value);
    let right = map_node(node.right.as_ref(), transform);
    Node::new(node.color, node.key.clone(), value, left, right).into_link()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    fn numbers(size: i32) -> PersistentTreeMap<i32, i32> {
        (1..=size).map(|key| (key, key)).collect()
    }

    #[rstest]
    fn test_fold_left_and_right_are_reverses() {
        let map = numbers(50);
        let ascending = map.fold_left(Vec::new(), |mut keys, key, _| {
            keys.push(*key);
            keys
        });
        let mut descending = map.fold_right(Vec::new(), |key, _, mut keys| {
            keys.push(*key);
            keys
        });
        descending.reverse();
        assert_eq!(ascending, descending);
        assert_eq!(ascending, (1..=50).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_fold_on_empty_map_returns_init() {
        let map: PersistentTreeMap<i32, i32> = PersistentTreeMap::new();
        assert_eq!(map.fold_left(7, |total, _, value| total + value), 7);
        assert_eq!(map.fold_right(7, |_, value, total| total + value), 7);
        assert_eq!(map.fold_left_until(7, |total, _, _| FoldStep::Stop(total + 1)), 7);
        assert_eq!(map.restructure(7, |_, _, _, _| 0), 7);
    }

    #[rstest]
    fn test_fold_left_until_stops_ascending() {
        let map = numbers(10_000);
        let visited = Cell::new(0);
        let sum = map.fold_left_until(0, |sum, key, _| {
            visited.set(visited.get() + 1);
            FoldStep::stop_if(*key >= 10, sum + key)
        });
        assert_eq!(sum, 55);
        assert_eq!(visited.get(), 10);
    }

    #[rstest]
    fn test_fold_right_until_stops_descending() {
        let map = numbers(10_000);
        let visited = Cell::new(0);
        let sum = map.fold_right_until(0, |key, _, sum| {
            visited.set(visited.get() + 1);
            FoldStep::stop_if(*key <= 9_992, sum + key)
        });
        assert_eq!(sum, 89_964);
        assert_eq!(visited.get(), 9);
    }

    #[rstest]
    fn test_fold_until_without_stop_visits_everything() {
        let map = numbers(100);
        let sum = map.fold_left_until(0, |sum, key, _| FoldStep::Continue(sum + key));
        assert_eq!(sum, 5_050);
        let sum = map.fold_right_until(0, |key, _, sum| FoldStep::Continue(sum + key));
        assert_eq!(sum, 5_050);
    }

    #[rstest]
    fn test_restructure_full_walk_counts_entries() {
        let map = numbers(257);
        let count = map.restructure(0usize, |_, _, left, right| {
            left.evaluate() + 1 + right.evaluate()
        });
        assert_eq!(count, 257);
    }

    #[rstest]
    fn test_restructure_rebuilds_in_order_sequence() {
        let map = numbers(20);
        let keys = map.restructure(Vec::new(), |key, _, left, right| {
            let mut keys = left.evaluate();
            keys.push(*key);
            keys.extend(right.evaluate());
            keys
        });
        assert_eq!(keys, (1..=20).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_restructure_skips_unrequested_branches() {
        let map = numbers(1_000);
        let visited = Cell::new(0);

        // Descend toward 1 only: a single root-to-leaf path.
        let found = map.restructure(false, |key, _, left, _| {
            visited.set(visited.get() + 1);
            *key == 1 || left.evaluate()
        });
        assert!(found);
        assert!(visited.get() <= 20, "visited {} nodes", visited.get());
    }

    #[rstest]
    fn test_restructure_can_evaluate_right_before_left() {
        let map = numbers(5);
        let keys = map.restructure(Vec::new(), |key, _, left, right| {
            let mut keys = right.evaluate();
            keys.push(*key);
            keys.extend(left.evaluate());
            keys
        });
        assert_eq!(keys, vec![5, 4, 3, 2, 1]);
    }

    #[rstest]
    fn test_map_with_key_keeps_shape_and_length() {
        let map = numbers(64);
        let mapped = map.map_with_key(|key, value| key + value);
        assert_eq!(mapped.len(), 64);
        assert_eq!(mapped.get(&10), Some(&20));
        assert_eq!(mapped.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_map_values_calls_in_ascending_order() {
        let map = numbers(10);
        let mut seen = Vec::new();
        let _ = map.map_values(|value| seen.push(*value));
        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    }
}
