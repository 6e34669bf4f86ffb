//! Removal with pre-emptive red pushing.
//!
//! Deleting a black node shortens every path through it. The engine avoids
//! ever having to repair that after the fact: before it descends into a
//! child it makes sure the child is not *thin* (black with no red left child)
//! by borrowing a red node from the sibling or from the current node. The
//! node that finally disappears is therefore always red, or the removal is
//! absorbed by a red link next to it, and [`balance`] restores the remaining
//! local shape on the way back up.
//!
//! ```text
//!   move_red_left, sibling has a red left child:
//!
//!         (h)                     [rl]
//!        /   \                   /    \
//!      [l]    [r]      =>     (h)      (r)
//!            /                /  \      \
//!         [rl]              [l]  rl.l   ...
//!
//!   () black, [] red, shown after recoloring
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

use super::insert::balance;
use super::invariant::invariant_violation;
use super::node::{Color, Link, Node};
use crate::persistent::ReferenceCounter;

/// Removes `key` from the subtree rooted at `node`.
///
/// The caller guarantees the key is present; the facade checks membership
/// first so that an absent key never allocates.
pub(super) fn remove_from_node<K, V, Q>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    key: &Q,
) -> Link<K, V>
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: Ord + ?Sized,
{
    let node_ref = node?;

    if key.cmp(node_ref.key.borrow()) == Ordering::Less {
        match node_ref.left.as_ref() {
            Some(left) if left.is_thin() => {
                let Node {
                    color,
                    key: node_key,
                    value,
                    left,
                    right,
                } = move_red_left(node_ref);
                let new_left = remove_from_node(left.as_ref(), key);
                balance(color, node_key, value, new_left, right).into_link()
            }
            left => {
                let new_left = remove_from_node(left, key);
                node_ref
                    .with_children(new_left, node_ref.right.clone())
                    .into_link()
            }
        }
    } else {
        let prepared = prepare_right_descent(node_ref);
        remove_here_or_right(&prepared, key)
    }
}

/// Second half of the `key >= node.key` case, run on an already prepared node.
fn remove_here_or_right<K, V, Q>(node: &ReferenceCounter<Node<K, V>>, key: &Q) -> Link<K, V>
where
    K: Clone + Borrow<Q>,
    V: Clone,
    Q: Ord + ?Sized,
{
    if key.cmp(node.key.borrow()) == Ordering::Equal {
        // Splice in the in-order successor; a node without one is a leaf.
        let successor = min_node(node.right.as_ref())?;
        let new_right = node.right.as_ref().and_then(remove_min_from_node);
        balance(
            node.color,
            successor.key.clone(),
            successor.value.clone(),
            node.left.clone(),
            new_right,
        )
        .into_link()
    } else {
        let new_right = remove_from_node(node.right.as_ref(), key);
        balance(
            node.color,
            node.key.clone(),
            node.value.clone(),
            node.left.clone(),
            new_right,
        )
        .into_link()
    }
}

/// Makes it safe to terminate at `node` or to descend into its right child.
///
/// A red left child is rotated up so that the red link sits on the right
/// side. Otherwise a thin right child receives a red node through
/// [`move_red_right`]. Any other shape is shared unchanged.
fn prepare_right_descent<K: Clone, V: Clone>(
    node: &ReferenceCounter<Node<K, V>>,
) -> ReferenceCounter<Node<K, V>> {
    if let Some(left) = node.left.as_ref().filter(|left| left.is_red()) {
        let lowered = Node::new(
            Color::Red,
            node.key.clone(),
            node.value.clone(),
            left.right.clone(),
            node.right.clone(),
        );
        return ReferenceCounter::new(Node::new(
            node.color,
            left.key.clone(),
            left.value.clone(),
            left.left.clone(),
            lowered.into_link(),
        ));
    }

    match node.right.as_ref() {
        Some(right) if right.is_thin() => ReferenceCounter::new(move_red_right(node)),
        _ => ReferenceCounter::clone(node),
    }
}

/// Removes the minimum entry of the subtree rooted at `node`.
///
/// The root of the result may be red; callers blacken it.
pub(super) fn remove_min_from_node<K: Clone, V: Clone>(
    node: &ReferenceCounter<Node<K, V>>,
) -> Link<K, V> {
    match node.left.as_ref() {
        // No left child: at most a red right child, which takes its place.
        None => node.right.clone(),
        Some(left) if left.is_thin() => {
            let Node {
                color,
                key,
                value,
                left,
                right,
            } = move_red_left(node);
            let new_left = left.as_ref().and_then(remove_min_from_node);
            balance(color, key, value, new_left, right).into_link()
        }
        Some(left) => node
            .with_children(remove_min_from_node(left), node.right.clone())
            .into_link(),
    }
}

/// Returns the node holding the minimum key of a subtree.
pub(super) fn min_node<K, V>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
) -> Option<&ReferenceCounter<Node<K, V>>> {
    let mut current = node?;
    while let Some(left) = current.left.as_ref() {
        current = left;
    }
    Some(current)
}

/// Returns the node holding the maximum key of a subtree.
pub(super) fn max_node<K, V>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
) -> Option<&ReferenceCounter<Node<K, V>>> {
    let mut current = node?;
    while let Some(right) = current.right.as_ref() {
        current = right;
    }
    Some(current)
}

/// Pushes a red node into the thin left child of `node`.
///
/// Takes it from the right sibling's red left child when there is one
/// (double rotation), otherwise pairs both children into a red 4-node by
/// recoloring. The result is always a filled node.
///
/// # Panics
///
/// Panics when `node` has no right child. A thin left child has a black
/// height of at least one, so a black-balanced tree always has a sibling.
pub(super) fn move_red_left<K: Clone, V: Clone>(node: &Node<K, V>) -> Node<K, V> {
    let (Some(left), Some(right)) = (node.left.as_ref(), node.right.as_ref()) else {
        invariant_violation("moving red left through a node without a right sibling");
    };

    if let Some(right_left) = right.left.as_ref().filter(|right_left| right_left.is_red()) {
        let new_left = Node::new(
            Color::Black,
            node.key.clone(),
            node.value.clone(),
            Some(Node::repainted(left, Color::Red)),
            right_left.left.clone(),
        );
        let new_right = Node::new(
            Color::Black,
            right.key.clone(),
            right.value.clone(),
            right_left.right.clone(),
            right.right.clone(),
        );
        Node::new(
            Color::Red,
            right_left.key.clone(),
            right_left.value.clone(),
            new_left.into_link(),
            new_right.into_link(),
        )
    } else {
        Node::new(
            Color::Black,
            node.key.clone(),
            node.value.clone(),
            Some(Node::repainted(left, Color::Red)),
            Some(Node::repainted(right, Color::Red)),
        )
    }
}

/// Pushes a red node into the thin right child of `node`.
///
/// Rotates right when the left child has a red left child, otherwise pairs
/// both children by recoloring.
///
/// # Panics
///
/// Panics when `node` has no left child, which a black-balanced tree with a
/// thin right child cannot produce.
pub(super) fn move_red_right<K: Clone, V: Clone>(node: &Node<K, V>) -> Node<K, V> {
    let (Some(left), Some(right)) = (node.left.as_ref(), node.right.as_ref()) else {
        invariant_violation("moving red right through a node without a left sibling");
    };

    if let Some(left_left) = left.left.as_ref().filter(|left_left| left_left.is_red()) {
        let new_right = Node::new(
            Color::Black,
            node.key.clone(),
            node.value.clone(),
            left.right.clone(),
            Some(Node::repainted(right, Color::Red)),
        );
        Node::new(
            Color::Red,
            left.key.clone(),
            left.value.clone(),
            Some(Node::repainted(left_left, Color::Black)),
            new_right.into_link(),
        )
    } else {
        Node::new(
            Color::Black,
            node.key.clone(),
            node.value.clone(),
            Some(Node::repainted(left, Color::Red)),
            Some(Node::repainted(right, Color::Red)),
        )
    }
}
