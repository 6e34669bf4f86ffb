//! Persistent (immutable) ordered containers.
//!
//! - [`PersistentTreeMap`]: ordered map on a Red-Black Tree
//! - [`PersistentTreeSet`]: ordered set, a map with `()` values
//!
//! # Structural Sharing
//!
//! Every operation returns a new container and leaves its input untouched.
//! Only the path from the root to the changed node is rebuilt; all other
//! subtrees are shared between the old and the new version, so keeping old
//! versions around is cheap.
//!
//! # Examples
//!
//! ```rust
//! use persistent_ordmap::persistent::{PersistentTreeMap, PersistentTreeSet};
//!
//! let map = PersistentTreeMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));     // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//!
//! let range: Vec<(&i32, &&str)> = map.range(1..=2).collect();
//! assert_eq!(range.len(), 2);
//!
//! let set: PersistentTreeSet<i32> = map.keys().copied().collect();
//! assert_eq!(set.to_vec(), vec![1, 2, 3]);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod error;
mod treemap;
mod treeset;

pub use error::InvariantViolation;
pub use treemap::Branch;
pub use treemap::PersistentTreeMap;
pub use treemap::PersistentTreeMapIntoIterator;
pub use treemap::PersistentTreeMapIterator;
pub use treemap::PersistentTreeMapRangeIterator;
pub use treeset::PersistentTreeSet;
pub use treeset::PersistentTreeSetIntoIterator;
pub use treeset::PersistentTreeSetIterator;
pub use treeset::PersistentTreeSetRangeIterator;
pub use treeset::SetBranch;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_clone_shares_allocation() {
        let original: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let shared = ReferenceCounter::clone(&original);
        assert!(ReferenceCounter::ptr_eq(&original, &shared));
    }

    #[rstest]
    fn test_strong_count_tracks_versions() {
        let original: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&original), 1);
        let shared = ReferenceCounter::clone(&original);
        assert_eq!(ReferenceCounter::strong_count(&original), 2);
        drop(shared);
        assert_eq!(ReferenceCounter::strong_count(&original), 1);
    }
}
