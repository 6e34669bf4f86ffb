//! Error types for the persistent containers.
//!
//! Lookups and removals of absent keys are not errors; they surface as
//! `None` or as an unchanged container. The only failure this module
//! describes is a tree whose structure breaks one of the red-black
//! invariants, as reported by
//! [`PersistentTreeMap::check_invariants`](super::PersistentTreeMap::check_invariants).

use thiserror::Error;

/// A structural invariant of the red-black tree that does not hold.
///
/// Depths count edges from the root, so the root itself is at depth 0.
///
/// # Examples
///
/// ```rust
/// use persistent_ordmap::persistent::InvariantViolation;
///
/// let violation = InvariantViolation::BlackHeightMismatch { depth: 2, left: 1, right: 2 };
/// assert_eq!(
///     violation.to_string(),
///     "black height differs below depth 2: left 1, right 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root of a non-empty tree is red.
    #[error("root node is red")]
    RedRoot,

    /// A red node has a red child.
    #[error("red node at depth {depth} has a red child")]
    RedRedViolation {
        /// Depth of the red parent.
        depth: usize,
    },

    /// Two paths below the same node pass through a different number of
    /// black nodes.
    #[error("black height differs below depth {depth}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Depth of the node whose subtrees disagree.
        depth: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },

    /// A key is not strictly between the keys of its ancestors.
    #[error("key at depth {depth} is out of order")]
    OrderViolation {
        /// Depth of the misplaced node.
        depth: usize,
    },

    /// The cached element count disagrees with the number of nodes.
    #[error("cached length {cached} does not match {counted} reachable entries")]
    LengthMismatch {
        /// Length stored in the container.
        cached: usize,
        /// Number of filled nodes reachable from the root.
        counted: usize,
    },
}
