//! Combining two maps: the three-way merge-join and the set-like
//! combinators built from lookups and insertions.

use super::PersistentTreeMap;

impl<K: Ord, V> PersistentTreeMap<K, V> {
    /// Walks two maps together in ascending key order.
    ///
    /// Every key of either map is reported exactly once, in ascending order:
    ///
    /// - `left_only` for keys only in `self`,
    /// - `both` for keys present in both maps,
    /// - `right_only` for keys only in `other`.
    ///
    /// The accumulator is threaded through all three callbacks.
    ///
    /// # Complexity
    ///
    /// O(N + M)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let stock: PersistentTreeMap<&str, u32> =
    ///     [("apple", 3), ("pear", 1)].into_iter().collect();
    /// let orders: PersistentTreeMap<&str, u32> =
    ///     [("pear", 2), ("plum", 1)].into_iter().collect();
    ///
    /// let shortfall = stock.merge(
    ///     &orders,
    ///     0,
    ///     |missing, _, _| missing,
    ///     |missing, _, have, want| missing + want.saturating_sub(*have),
    ///     |missing, _, want| missing + want,
    /// );
    /// assert_eq!(shortfall, 2);
    /// ```
    pub fn merge<W, B, L, T, R>(
        &self,
        other: &PersistentTreeMap<K, W>,
        init: B,
        mut left_only: L,
        mut both: T,
        mut right_only: R,
    ) -> B
    where
        L: FnMut(B, &K, &V) -> B,
        T: FnMut(B, &K, &V, &W) -> B,
        R: FnMut(B, &K, &W) -> B,
    {
        let mut left = self.iter().peekable();

        let accumulator = other.fold_left(init, |mut accumulator, right_key, right_value| {
            while let Some((key, value)) = left.next_if(|(key, _)| *key < right_key) {
                accumulator = left_only(accumulator, key, value);
            }
            match left.next_if(|(key, _)| *key == right_key) {
                Some((key, value)) => both(accumulator, key, value, right_value),
                None => right_only(accumulator, right_key, right_value),
            }
        });

        left.fold(accumulator, |accumulator, (key, value)| {
            left_only(accumulator, key, value)
        })
    }
}

impl<K: Clone + Ord, V: Clone> PersistentTreeMap<K, V> {
    /// Combines two maps, preferring the values of `self` on shared keys.
    ///
    /// The smaller map is inserted into the larger one, so the cost is
    /// O(min(N, M) log(N + M)) and the larger map's untouched subtrees are
    /// shared with the result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let first = PersistentTreeMap::new().insert(1, "first").insert(2, "first");
    /// let second = PersistentTreeMap::new().insert(2, "second").insert(3, "second");
    ///
    /// let combined = first.union(&second);
    /// assert_eq!(combined.get(&1), Some(&"first"));
    /// assert_eq!(combined.get(&2), Some(&"first"));
    /// assert_eq!(combined.get(&3), Some(&"second"));
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.length >= other.length {
            other.fold_left(self.clone(), |map, key, value| {
                if map.contains_key(key) {
                    map
                } else {
                    map.insert(key.clone(), value.clone())
                }
            })
        } else {
            self.fold_left(other.clone(), |map, key, value| {
                map.insert(key.clone(), value.clone())
            })
        }
    }

    /// Keeps the entries of `self` whose keys also appear in `other`.
    ///
    /// Values always come from `self`; `other` only contributes its keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let prices: PersistentTreeMap<&str, u32> =
    ///     [("apple", 3), ("pear", 5), ("plum", 2)].into_iter().collect();
    /// let basket: PersistentTreeMap<&str, ()> =
    ///     [("pear", ()), ("plum", ()), ("kiwi", ())].into_iter().collect();
    ///
    /// let due = prices.intersect(&basket);
    /// assert_eq!(due.keys().copied().collect::<Vec<_>>(), vec!["pear", "plum"]);
    /// ```
    #[must_use]
    pub fn intersect<W>(&self, other: &PersistentTreeMap<K, W>) -> Self {
        self.filter(|key, _| other.contains_key(key))
    }

    /// Keeps the entries of `self` whose keys do not appear in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_ordmap::persistent::PersistentTreeMap;
    ///
    /// let all: PersistentTreeMap<i32, char> = (1..=4).zip("abcd".chars()).collect();
    /// let seen: PersistentTreeMap<i32, ()> = [(2, ()), (4, ()), (9, ())].into_iter().collect();
    ///
    /// let unseen = all.diff(&seen);
    /// assert_eq!(unseen.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    /// ```
    #[must_use]
    pub fn diff<W>(&self, other: &PersistentTreeMap<K, W>) -> Self {
        if other.length < self.length {
            other.fold_left(self.clone(), |map, key, _| map.remove(key))
        } else {
            self.filter(|key, _| !other.contains_key(key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Side {
        Left(i32),
        Both(i32),
        Right(i32),
    }

    fn record_merge(
        left: &PersistentTreeMap<i32, &str>,
        right: &PersistentTreeMap<i32, &str>,
    ) -> Vec<Side> {
        left.merge(
            right,
            Vec::new(),
            |mut log, key, _| {
                log.push(Side::Left(*key));
                log
            },
            |mut log, key, _, _| {
                log.push(Side::Both(*key));
                log
            },
            |mut log, key, _| {
                log.push(Side::Right(*key));
                log
            },
        )
    }

    #[rstest]
    fn test_merge_reports_each_key_once_in_order() {
        let left: PersistentTreeMap<i32, &str> =
            [(1, "a"), (3, "c"), (5, "e")].into_iter().collect();
        let right: PersistentTreeMap<i32, &str> =
            [(2, "b"), (3, "x"), (4, "d")].into_iter().collect();

        assert_eq!(
            record_merge(&left, &right),
            vec![
                Side::Left(1),
                Side::Right(2),
                Side::Both(3),
                Side::Right(4),
                Side::Left(5),
            ]
        );
    }

    #[rstest]
    fn test_merge_with_empty_sides() {
        let empty = PersistentTreeMap::new();
        let some: PersistentTreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();

        assert_eq!(record_merge(&empty, &empty), Vec::new());
        assert_eq!(record_merge(&some, &empty), vec![Side::Left(1), Side::Left(2)]);
        assert_eq!(record_merge(&empty, &some), vec![Side::Right(1), Side::Right(2)]);
    }

    #[rstest]
    fn test_merge_passes_both_values() {
        let left: PersistentTreeMap<i32, &str> = [(7, "left")].into_iter().collect();
        let right: PersistentTreeMap<i32, u8> = [(7, 9)].into_iter().collect();

        let seen = left.merge(
            &right,
            None,
            |seen, _, _| seen,
            |_, key, value, other| Some((*key, *value, *other)),
            |seen, _, _| seen,
        );
        assert_eq!(seen, Some((7, "left", 9)));
    }

    #[rstest]
    #[case(10, 3)]
    #[case(3, 10)]
    fn test_union_prefers_left_values_regardless_of_size(
        #[case] left_size: i32,
        #[case] right_size: i32,
    ) {
        let left: PersistentTreeMap<i32, char> = (0..left_size).map(|key| (key, 'l')).collect();
        let right: PersistentTreeMap<i32, char> = (0..right_size).map(|key| (key, 'r')).collect();

        let combined = left.union(&right);
        assert_eq!(combined.len() as i32, left_size.max(right_size));
        for key in 0..left_size {
            assert_eq!(combined.get(&key), Some(&'l'));
        }
        for key in left_size..right_size {
            assert_eq!(combined.get(&key), Some(&'r'));
        }
        assert_eq!(combined.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_intersect_keeps_left_values() {
        let left: PersistentTreeMap<i32, char> = (0..10).map(|key| (key, 'l')).collect();
        let right: PersistentTreeMap<i32, u8> = (5..15).map(|key| (key, 0)).collect();

        let common = left.intersect(&right);
        assert_eq!(common.keys().copied().collect::<Vec<_>>(), (5..10).collect::<Vec<_>>());
        assert!(common.values().all(|value| *value == 'l'));
    }

    #[rstest]
    #[case(20, 5)]
    #[case(5, 20)]
    fn test_diff_removes_shared_keys(#[case] left_size: i32, #[case] right_size: i32) {
        let left: PersistentTreeMap<i32, i32> = (0..left_size).map(|key| (key, key)).collect();
        let right: PersistentTreeMap<i32, ()> = (0..right_size)
            .filter(|key| key % 2 == 0)
            .map(|key| (key, ()))
            .collect();

        let rest = left.diff(&right);
        let expected: Vec<i32> = (0..left_size)
            .filter(|key| key % 2 == 1 || *key >= right_size)
            .collect();
        assert_eq!(rest.keys().copied().collect::<Vec<_>>(), expected);
        assert_eq!(rest.check_invariants(), Ok(()));
    }
}
