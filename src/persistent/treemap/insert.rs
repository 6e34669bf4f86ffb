//! Insertion and the bottom-up rebalancing step shared with removal.

use std::cmp::Ordering;

use super::node::{Color, Link, Node};
use crate::persistent::ReferenceCounter;

/// Inserts `key` below `node`, returning the rebuilt subtree and whether a
/// new entry was added.
///
/// The root of the result may be red; callers blacken it.
pub(super) fn insert_into_node<K: Clone + Ord, V: Clone>(
    node: Option<&ReferenceCounter<Node<K, V>>>,
    key: K,
    value: V,
) -> (Link<K, V>, bool) {
    let Some(node_ref) = node else {
        return (Node::new_red(key, value).into_link(), true);
    };

    match key.cmp(&node_ref.key) {
        Ordering::Less => {
            let (new_left, added) = insert_into_node(node_ref.left.as_ref(), key, value);
            let balanced = balance(
                node_ref.color,
                node_ref.key.clone(),
                node_ref.value.clone(),
                new_left,
                node_ref.right.clone(),
            );
            (balanced.into_link(), added)
        }
        Ordering::Greater => {
            let (new_right, added) = insert_into_node(node_ref.right.as_ref(), key, value);
            let balanced = balance(
                node_ref.color,
                node_ref.key.clone(),
                node_ref.value.clone(),
                node_ref.left.clone(),
                new_right,
            );
            (balanced.into_link(), added)
        }
        Ordering::Equal => {
            // Key exists: the stored key, shape and color stay.
            let replaced = Node::new(
                node_ref.color,
                node_ref.key.clone(),
                value,
                node_ref.left.clone(),
                node_ref.right.clone(),
            );
            (replaced.into_link(), false)
        }
    }
}

/// Rebuilds a node from its parts, repairing the one local violation a child
/// update can leave behind.
///
/// - both children red: split the 4-node by turning the children black and
///   this node red, pushing the problem one level up;
/// - only the right child red: rotate it to the left, the pivot keeps
///   `color`;
/// - red left child with a red left grandchild: rotate right and paint the
///   two outer nodes black.
///
/// Every other shape is returned as-is.
pub(super) fn balance<K: Clone, V: Clone>(
    color: Color,
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
) -> Node<K, V> {
    if let Some(right_node) = right.as_ref().filter(|node| node.is_red()) {
        if let Some(left_node) = left.as_ref().filter(|node| node.is_red()) {
            return Node::new(
                Color::Red,
                key,
                value,
                Some(Node::repainted(left_node, Color::Black)),
                Some(Node::repainted(right_node, Color::Black)),
            );
        }

        let pivot = Node::new(Color::Red, key, value, left, right_node.left.clone());
        return Node::new(
            color,
            right_node.key.clone(),
            right_node.value.clone(),
            pivot.into_link(),
            right_node.right.clone(),
        );
    }

    if let Some(left_node) = left.as_ref().filter(|node| node.is_red())
        && let Some(outer) = left_node.left.as_ref().filter(|node| node.is_red())
    {
        let demoted = Node::new(Color::Black, key, value, left_node.right.clone(), right);
        return Node::new(
            Color::Red,
            left_node.key.clone(),
            left_node.value.clone(),
            Some(Node::repainted(outer, Color::Black)),
            demoted.into_link(),
        );
    }

    Node::new(color, key, value, left, right)
}
