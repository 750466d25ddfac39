use crate::treap::tree::{self, Tree};
use std::sync::Arc;

/// A struct representing an internal node of a persistent treap.
///
/// Nodes are never modified once they are shared. Operations that change a tree allocate copies
/// of the nodes on the affected paths and share every other subtree with the original.
#[derive(Debug)]
pub struct Node<T> {
    pub value: T,
    pub priority: u32,
    pub(crate) len: usize,
    pub left: Tree<T>,
    pub right: Tree<T>,
}

impl<T> Node<T> {
    pub fn new(value: T, priority: u32) -> Self {
        Node {
            value,
            priority,
            len: 1,
            left: None,
            right: None,
        }
    }

    pub fn with_children(value: T, priority: u32, left: Tree<T>, right: Tree<T>) -> Self {
        Node {
            value,
            priority,
            len: 1 + tree::len(&left) + tree::len(&right),
            left,
            right,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn into_tree(self) -> Tree<T> {
        Some(Arc::new(self))
    }
}

impl<T: Clone> Node<T> {
    /// Copies the value and priority of this node and attaches new children.
    pub fn rebuild(&self, left: Tree<T>, right: Tree<T>) -> Arc<Node<T>> {
        Arc::new(Node::with_children(self.value.clone(), self.priority, left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn test_len() {
        let left = Node::new(1, 1).into_tree();
        let right = Node::with_children(4, 2, Node::new(3, 1).into_tree(), None).into_tree();
        let node = Node::with_children(2, 3, left, right);
        assert_eq!(node.len(), 4);
        assert_eq!(node.value(), &2);
        assert_eq!(node.priority(), 3);
    }

    #[test]
    fn test_rebuild() {
        let node = Node::with_children(2, 3, Node::new(1, 1).into_tree(), None);
        let copy = node.rebuild(None, None);
        assert_eq!(copy.value, 2);
        assert_eq!(copy.priority, 3);
        assert_eq!(copy.len, 1);
        assert_eq!(node.len, 2);
    }
}
