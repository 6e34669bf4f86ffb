//! Property-based tests for PersistentTreeMap.
//!
//! These tests verify that PersistentTreeMap satisfies the expected laws
//! and invariants using proptest, with `std::collections::BTreeMap` as the
//! reference model.

use persistent_ordmap::control::FoldStep;
use persistent_ordmap::persistent::PersistentTreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating a PersistentTreeMap from a vector of key-value pairs.
fn arbitrary_treemap(max_size: usize) -> impl Strategy<Value = PersistentTreeMap<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<PersistentTreeMap<i32, i32>>())
}

/// One step of a random edit script.
#[derive(Debug, Clone)]
enum Operation {
    Insert(i16, i32),
    Remove(i16),
    PopMin,
    PopMax,
}

/// Keys come from a small domain so removals usually hit present keys.
fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (any::<i16>().prop_map(|key| key % 64), any::<i32>())
            .prop_map(|(key, value)| Operation::Insert(key, value)),
        3 => any::<i16>().prop_map(|key| Operation::Remove(key % 64)),
        1 => Just(Operation::PopMin),
        1 => Just(Operation::PopMax),
    ]
}

// =============================================================================
// Invariant Preservation Laws
// =============================================================================

proptest! {
    /// Law: every version reached by an edit script is a valid red-black tree
    /// that agrees with the model.
    #[test]
    fn prop_edit_script_preserves_invariants(
        operations in prop::collection::vec(arbitrary_operation(), 0..200)
    ) {
        let mut map = PersistentTreeMap::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    map = map.insert(key, value);
                    model.insert(key, value);
                }
                Operation::Remove(key) => {
                    map = map.remove(&key);
                    model.remove(&key);
                }
                Operation::PopMin => {
                    let popped = map.pop_min();
                    prop_assert_eq!(popped.as_ref().map(|(entry, _)| *entry), model.pop_first());
                    if let Some((_, rest)) = popped {
                        map = rest;
                    }
                }
                Operation::PopMax => {
                    let popped = map.pop_max();
                    prop_assert_eq!(popped.as_ref().map(|(entry, _)| *entry), model.pop_last());
                    if let Some((_, rest)) = popped {
                        map = rest;
                    }
                }
            }
            prop_assert_eq!(map.check_invariants(), Ok(()));
            prop_assert_eq!(map.len(), model.len());
        }

        prop_assert_eq!(BTreeMap::from(&map), model);
    }

    /// Law: removing any present key in any order keeps the tree valid.
    #[test]
    fn prop_drain_in_random_order(
        keys in prop::collection::btree_set(any::<i32>(), 0..100),
        seed in any::<u64>()
    ) {
        let map: PersistentTreeMap<i32, ()> = keys.iter().map(|key| (*key, ())).collect();
        let mut order: Vec<i32> = keys.into_iter().collect();
        let rotation = usize::try_from(seed % (order.len() as u64 + 1)).unwrap_or(0);
        let order_len = order.len();
        order.rotate_left(rotation.min(order_len));
        order.reverse();

        let drained = order.iter().try_fold(map, |map, key| {
            let next = map.remove(key);
            prop_assert_eq!(next.len() + 1, map.len());
            prop_assert_eq!(next.check_invariants(), Ok(()));
            Ok(next)
        })?;
        prop_assert!(drained.is_empty());
    }
}

// =============================================================================
// Ordering and Count Laws
// =============================================================================

proptest! {
    /// Law: ascending traversal is strictly increasing and descending
    /// traversal is its exact reverse.
    #[test]
    fn prop_traversal_ordering(map in arbitrary_treemap(100)) {
        let ascending: Vec<i32> = map.keys().copied().collect();
        let mut descending: Vec<i32> = map.iter().rev().map(|(key, _)| *key).collect();

        prop_assert!(ascending.windows(2).all(|pair| pair[0] < pair[1]));
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    /// Law: len equals the number of entries produced by a full traversal.
    #[test]
    fn prop_count_coherence(map in arbitrary_treemap(100)) {
        prop_assert_eq!(map.len(), map.iter().count());
        prop_assert_eq!(map.len(), map.fold_left(0, |count, _, _| count + 1));
        let restructured = map.restructure(0, |_, _, left, right| {
            left.evaluate() + 1 + right.evaluate()
        });
        prop_assert_eq!(map.len(), restructured);
    }

    /// Law: inserting a key twice keeps the second value and grows the map
    /// by at most one.
    #[test]
    fn prop_insert_twice_keeps_second_value(
        map in arbitrary_treemap(50),
        key: i32,
        first: i32,
        second: i32
    ) {
        let updated = map.insert(key, first).insert(key, second);
        prop_assert_eq!(updated.get(&key), Some(&second));
        prop_assert!(updated.len() <= map.len() + 1);
    }

    /// Law: removing an absent key leaves an equal map.
    #[test]
    fn prop_remove_absent_key_is_identity(map in arbitrary_treemap(50), key: i32) {
        prop_assume!(!map.contains_key(&key));
        prop_assert_eq!(map.remove(&key), map);
    }

    /// Law: converting to an ascending list and back is observationally
    /// the same map.
    #[test]
    fn prop_round_trip_through_vec(map in arbitrary_treemap(100)) {
        let rebuilt: PersistentTreeMap<i32, i32> = map.to_vec().into_iter().collect();
        prop_assert_eq!(rebuilt.len(), map.len());
        prop_assert_eq!(rebuilt.to_vec(), map.to_vec());
        for (key, value) in &map {
            prop_assert_eq!(rebuilt.get(key), Some(value));
        }
    }
}

// =============================================================================
// Fold Laws
// =============================================================================

proptest! {
    /// Law: a fold that never stops equals the plain fold.
    #[test]
    fn prop_fold_until_without_stop_is_fold(map in arbitrary_treemap(100)) {
        let plain = map.fold_left(Vec::new(), |mut keys, key, _| { keys.push(*key); keys });
        let until = map.fold_left_until(Vec::new(), |mut keys, key, _| {
            keys.push(*key);
            FoldStep::Continue(keys)
        });
        prop_assert_eq!(plain, until);
    }

    /// Law: stopping after k entries sees exactly the k smallest keys.
    #[test]
    fn prop_fold_until_sees_prefix(map in arbitrary_treemap(100), limit in 1usize..20) {
        let seen = map.fold_left_until(Vec::new(), |mut keys, key, _| {
            keys.push(*key);
            FoldStep::stop_if(keys.len() == limit, keys)
        });
        let expected: Vec<i32> = map.keys().copied().take(limit).collect();
        prop_assert_eq!(seen, expected);
    }

    /// Law: stopping after k entries from the right sees the k largest keys.
    #[test]
    fn prop_fold_right_until_sees_suffix(map in arbitrary_treemap(100), limit in 1usize..20) {
        let seen = map.fold_right_until(Vec::new(), |key, _, mut keys| {
            keys.push(*key);
            FoldStep::stop_if(keys.len() == limit, keys)
        });
        let expected: Vec<i32> = map.keys().rev().copied().take(limit).collect();
        prop_assert_eq!(seen, expected);
    }
}

// =============================================================================
// Merge Laws
// =============================================================================

proptest! {
    /// Law: merge reports every key of either map exactly once, in
    /// ascending order, on the right branch.
    #[test]
    fn prop_merge_matches_model(left in arbitrary_treemap(60), right in arbitrary_treemap(60)) {
        #[derive(Debug, PartialEq)]
        enum Side { Left, Both, Right }

        let merged = left.merge(
            &right,
            Vec::new(),
            |mut log, key, _| { log.push((*key, Side::Left)); log },
            |mut log, key, _, _| { log.push((*key, Side::Both)); log },
            |mut log, key, _| { log.push((*key, Side::Right)); log },
        );

        let left_model = BTreeMap::from(&left);
        let right_model = BTreeMap::from(&right);
        let expected: Vec<(i32, Side)> = left_model
            .keys()
            .chain(right_model.keys())
            .copied()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .map(|key| {
                let side = match (left_model.contains_key(&key), right_model.contains_key(&key)) {
                    (true, true) => Side::Both,
                    (true, false) => Side::Left,
                    _ => Side::Right,
                };
                (key, side)
            })
            .collect();

        prop_assert_eq!(merged, expected);
    }

    /// Law: union is left-biased and matches the model.
    #[test]
    fn prop_union_matches_model(left in arbitrary_treemap(60), right in arbitrary_treemap(60)) {
        let mut model = BTreeMap::from(&right);
        model.extend(BTreeMap::from(&left));
        let union = left.union(&right);
        prop_assert_eq!(union.check_invariants(), Ok(()));
        prop_assert_eq!(BTreeMap::from(&union), model);
    }

    /// Law: intersect and diff split `left` by membership in `right`.
    #[test]
    fn prop_intersect_and_diff_partition_left(
        left in arbitrary_treemap(60),
        right in arbitrary_treemap(60)
    ) {
        let common = left.intersect(&right);
        let only_left = left.diff(&right);

        prop_assert_eq!(common.len() + only_left.len(), left.len());
        prop_assert!(common.keys().all(|key| right.contains_key(key)));
        prop_assert!(only_left.keys().all(|key| !right.contains_key(key)));
        prop_assert_eq!(common.union(&only_left), left);
    }
}
