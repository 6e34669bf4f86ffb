//! Structural validation of the red-black invariants.

use crate::persistent::{InvariantViolation, ReferenceCounter};

use super::node::{Node, is_red};

/// Aborts on a tree shape the balancing algorithms cannot produce.
///
/// Reaching this means an invariant was broken elsewhere or the algorithm
/// itself is wrong; neither is recoverable by the caller.
#[cold]
#[track_caller]
pub(super) fn invariant_violation(context: &str) -> ! {
    tracing::error!(context, "red-black tree invariant violated");
    panic!("invariant violation: {context}");
}

/// Checks ordering, the red rules and black balance below `root`.
///
/// Returns the number of filled nodes on success.
pub(super) fn validate_link<K: Ord, V>(
    root: Option<&ReferenceCounter<Node<K, V>>>,
) -> Result<usize, InvariantViolation> {
    if is_red(root) {
        return Err(InvariantViolation::RedRoot);
    }
    validate_subtree(root, None, None, 0).map(|(count, _)| count)
}

/// Returns `(node count, black height)` for a valid subtree.
fn validate_subtree<'a, K: Ord, V>(
    node: Option<&'a ReferenceCounter<Node<K, V>>>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
    depth: usize,
) -> Result<(usize, usize), InvariantViolation> {
    let Some(node) = node else {
        return Ok((0, 0));
    };

    if lower.is_some_and(|lower| node.key <= *lower)
        || upper.is_some_and(|upper| node.key >= *upper)
    {
        return Err(InvariantViolation::OrderViolation { depth });
    }

    if node.is_red() && (is_red(node.left.as_ref()) || is_red(node.right.as_ref())) {
        return Err(InvariantViolation::RedRedViolation { depth });
    }

    let (left_count, left_height) =
        validate_subtree(node.left.as_ref(), lower, Some(&node.key), depth + 1)?;
    let (right_count, right_height) =
        validate_subtree(node.right.as_ref(), Some(&node.key), upper, depth + 1)?;

    if left_height != right_height {
        return Err(InvariantViolation::BlackHeightMismatch {
            depth,
            left: left_height,
            right: right_height,
        });
    }

    Ok((
        left_count + right_count + 1,
        left_height + usize::from(node.is_black()),
    ))
}
