//! Tree cells and the coloring helpers shared by the insert and remove engines.

use crate::persistent::ReferenceCounter;

/// The color of a Red-Black Tree node. Empty links count as black.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum Color {
    Red,
    Black,
}

/// A possibly empty subtree.
///
/// `None` is the empty leaf that terminates every path; `Some` is a filled
/// node shared between every map version that reaches it.
pub(super) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure for the Red-Black Tree.
///
/// Nodes are never mutated once they are behind a [`ReferenceCounter`].
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) color: Color,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub(super) const fn new(
        color: Color,
        key: K,
        value: V,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> Self {
        Self {
            key,
            value,
            color,
            left,
            right,
        }
    }

    /// Creates a new red node with no children.
    pub(super) const fn new_red(key: K, value: V) -> Self {
        Self::new(Color::Red, key, value, None, None)
    }

    /// Checks if this node is red.
    pub(super) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Checks if this node is black.
    pub(super) fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    /// A black node with no red child cannot lose a black level on its own.
    pub(super) fn is_thin(&self) -> bool {
        self.is_black() && !is_red(self.left.as_ref())
    }

    /// Wraps the node into a shared link.
    pub(super) fn into_link(self) -> Link<K, V> {
        Some(ReferenceCounter::new(self))
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Creates a copy of this node with a new color.
    pub(super) fn with_color(&self, color: Color) -> Self {
        Self::new(
            color,
            self.key.clone(),
            self.value.clone(),
            self.left.clone(),
            self.right.clone(),
        )
    }

    /// Creates a copy of this node with new children.
    pub(super) fn with_children(&self, left: Link<K, V>, right: Link<K, V>) -> Self {
        Self::new(self.color, self.key.clone(), self.value.clone(), left, right)
    }

    /// Returns a shared copy of this node painted `color`.
    ///
    /// Reuses the node itself when it already has that color.
    pub(super) fn repainted(this: &ReferenceCounter<Self>, color: Color) -> ReferenceCounter<Self> {
        if this.color == color {
            ReferenceCounter::clone(this)
        } else {
            ReferenceCounter::new(this.with_color(color))
        }
    }
}

/// Helper function to check if an optional node is red.
pub(super) fn is_red<K, V>(node: Option<&ReferenceCounter<Node<K, V>>>) -> bool {
    node.is_some_and(|node| node.is_red())
}

/// Forces a red root to black.
///
/// Only ever adds one black level to every path at once, so black balance
/// is preserved.
pub(super) fn blacken_root<K: Clone, V: Clone>(root: Link<K, V>) -> Link<K, V> {
    root.map(|node| Node::repainted(&node, Color::Black))
}
