use crate::treap::compare::Comparer;
use crate::treap::node::Node;
use crate::treap::{Error, Result};
use std::cmp::Ordering;
use std::sync::Arc;

pub type Tree<T> = Option<Arc<Node<T>>>;

enum Spine<'a, T: 'a> {
    Left(&'a Arc<Node<T>>),
    Right(&'a Arc<Node<T>>),
}

/// Returns the value in `tree` for which `f` returns `Ordering::Equal`. `f` orders a node's value
/// against the probe: `Ordering::Less` means the node's value is smaller than what is searched
/// for.
pub fn find_by<'a, T, F>(tree: &'a Tree<T>, mut f: F) -> Option<&'a T>
where
    F: FnMut(&T) -> Ordering,
{
    let mut curr = tree;
    while let Some(ref node) = *curr {
        match f(&node.value) {
            Ordering::Less => curr = &node.right,
            Ordering::Greater => curr = &node.left,
            Ordering::Equal => return Some(&node.value),
        }
    }
    None
}

pub fn find<'a, T, C>(tree: &'a Tree<T>, value: &T, comparer: &C) -> Option<&'a T>
where
    C: Comparer<T>,
{
    find_by(tree, |node_value| comparer.compare(node_value, value))
}

/// Splits `tree` into the values ordered before the probe, the node matching the probe and the
/// values ordered after it. Only the nodes on the search path are copied.
///
/// The middle tree is a single node holding the matched value and its priority.
pub fn split_by<T, F>(tree: &Tree<T>, f: F) -> (Tree<T>, Tree<T>, Tree<T>)
where
    T: Clone,
    F: FnMut(&T) -> Ordering,
{
    let (left, mid, right) = partition_by(tree, f);
    let mid = mid.and_then(|node| Node::new(node.value.clone(), node.priority).into_tree());
    (left, mid, right)
}

pub fn split<T, C>(tree: &Tree<T>, value: &T, comparer: &C) -> (Tree<T>, Tree<T>, Tree<T>)
where
    T: Clone,
    C: Comparer<T>,
{
    split_by(tree, |node_value| comparer.compare(node_value, value))
}

// Same as `split_by`, but the match is returned as the node of `tree` with its children attached.
fn partition_by<'a, T, F>(
    tree: &'a Tree<T>,
    mut f: F,
) -> (Tree<T>, Option<&'a Arc<Node<T>>>, Tree<T>)
where
    T: Clone,
    F: FnMut(&T) -> Ordering,
{
    let mut left_path = Vec::new();
    let mut right_path = Vec::new();
    let mut curr = tree;
    let (mut left, mid, mut right) = loop {
        match *curr {
            Some(ref node) => match f(&node.value) {
                Ordering::Less => {
                    left_path.push(node);
                    curr = &node.right;
                },
                Ordering::Greater => {
                    right_path.push(node);
                    curr = &node.left;
                },
                Ordering::Equal => {
                    break (node.left.clone(), Some(node), node.right.clone());
                },
            },
            None => break (None, None, None),
        }
    };

    for node in left_path.into_iter().rev() {
        left = Some(node.rebuild(node.left.clone(), left));
    }
    for node in right_path.into_iter().rev() {
        right = Some(node.rebuild(right, node.right.clone()));
    }
    (left, mid, right)
}

fn partition<'a, T, C>(
    tree: &'a Tree<T>,
    value: &T,
    comparer: &C,
) -> (Tree<T>, Option<&'a Arc<Node<T>>>, Tree<T>)
where
    T: Clone,
    C: Comparer<T>,
{
    partition_by(tree, |node_value| comparer.compare(node_value, value))
}

/// Joins two trees where every value of `left` is ordered before every value of `right`. The
/// precondition is not checked.
///
/// Walks the right spine of `left` and the left spine of `right`, taking the node with the higher
/// priority at each step. Ties go to `left`. Once a spine runs out, the rest of the other side is
/// attached without copying.
pub fn join<T: Clone>(left: &Tree<T>, right: &Tree<T>) -> Tree<T> {
    let mut path = Vec::new();
    let mut l_tree = left;
    let mut r_tree = right;
    let tail = loop {
        match (l_tree, r_tree) {
            (Some(l_node), Some(r_node)) => {
                if l_node.priority >= r_node.priority {
                    path.push(Spine::Left(l_node));
                    l_tree = &l_node.right;
                } else {
                    path.push(Spine::Right(r_node));
                    r_tree = &r_node.left;
                }
            },
            (_, None) => break l_tree.clone(),
            (None, _) => break r_tree.clone(),
        }
    };

    path.into_iter().rev().fold(tail, |tree, step| match step {
        Spine::Left(node) => Some(node.rebuild(node.left.clone(), tree)),
        Spine::Right(node) => Some(node.rebuild(tree, node.right.clone())),
    })
}

/// Returns the union of two trees.
///
/// When a value is in both trees, the value from `other` is kept if `overwrite` is set, and the
/// value from `tree` otherwise. Ties in priority make `tree` the root of the merge, the same way
/// `join` breaks ties.
pub fn union<T, C>(tree: &Tree<T>, other: &Tree<T>, comparer: &C, overwrite: bool) -> Tree<T>
where
    T: Clone,
    C: Comparer<T>,
{
    match (tree, other) {
        (Some(node), Some(other_node)) => {
            let (pivot, rest, overwrite) = if node.priority >= other_node.priority {
                (node, other, overwrite)
            } else {
                (other_node, tree, !overwrite)
            };

            let (left, dupe, right) = partition(rest, &pivot.value, comparer);
            let new_left = union(&pivot.left, &left, comparer, overwrite);
            let new_right = union(&pivot.right, &right, comparer, overwrite);
            let value = match dupe {
                Some(ref dupe_node) if overwrite => dupe_node.value.clone(),
                _ => pivot.value.clone(),
            };
            Node::with_children(value, pivot.priority, new_left, new_right).into_tree()
        },
        (None, _) => other.clone(),
        (_, None) => tree.clone(),
    }
}

/// Returns the values common to both trees. Values are taken from `tree`.
pub fn intersection<T, C>(tree: &Tree<T>, other: &Tree<T>, comparer: &C) -> Tree<T>
where
    T: Clone,
    C: Comparer<T>,
{
    inter(tree, other, comparer, false)
}

fn inter<T, C>(tree: &Tree<T>, other: &Tree<T>, comparer: &C, swapped: bool) -> Tree<T>
where
    T: Clone,
    C: Comparer<T>,
{
    if let (Some(node), Some(other_node)) = (tree, other) {
        let (pivot, rest, swapped) = if node.priority >= other_node.priority {
            (node, other, swapped)
        } else {
            (other_node, tree, !swapped)
        };

        let (left, dupe, right) = partition(rest, &pivot.value, comparer);
        let new_left = inter(&pivot.left, &left, comparer, swapped);
        let new_right = inter(&pivot.right, &right, comparer, swapped);
        match dupe {
            Some(dupe_node) => {
                let value = if swapped {
                    dupe_node.value.clone()
                } else {
                    pivot.value.clone()
                };
                Node::with_children(value, pivot.priority, new_left, new_right).into_tree()
            },
            None => join(&new_left, &new_right),
        }
    } else {
        None
    }
}

/// Returns the values of `tree` that are not in `other`.
pub fn difference<T, C>(tree: &Tree<T>, other: &Tree<T>, comparer: &C) -> Tree<T>
where
    T: Clone,
    C: Comparer<T>,
{
    match (tree, other) {
        (Some(node), Some(other_node)) => {
            if node.priority >= other_node.priority {
                let (left, dupe, right) = partition(other, &node.value, comparer);
                let new_left = difference(&node.left, &left, comparer);
                let new_right = difference(&node.right, &right, comparer);
                if dupe.is_some() {
                    join(&new_left, &new_right)
                } else if len(&new_left) + len(&new_right) + 1 == node.len {
                    // nothing removed below, keep the original subtree
                    tree.clone()
                } else {
                    Some(node.rebuild(new_left, new_right))
                }
            } else {
                let (left, _, right) = partition(tree, &other_node.value, comparer);
                let new_left = difference(&left, &other_node.left, comparer);
                let new_right = difference(&right, &other_node.right, comparer);
                join(&new_left, &new_right)
            }
        },
        (None, _) => None,
        (_, None) => tree.clone(),
    }
}

/// Removes the value matching the probe, returning the new tree and the removed value.
pub fn remove_by<T, F>(tree: &Tree<T>, f: F) -> (Tree<T>, Option<T>)
where
    T: Clone,
    F: FnMut(&T) -> Ordering,
{
    let (left, mid, right) = partition_by(tree, f);
    (join(&left, &right), mid.map(|node| node.value.clone()))
}

pub fn remove<T, C>(tree: &Tree<T>, value: &T, comparer: &C) -> (Tree<T>, Option<T>)
where
    T: Clone,
    C: Comparer<T>,
{
    remove_by(tree, |node_value| comparer.compare(node_value, value))
}

/// Removes `value` from `tree` if it exists. The search path is copied even if nothing is
/// removed.
pub fn delete<T, C>(tree: &Tree<T>, value: &T, comparer: &C) -> Tree<T>
where
    T: Clone,
    C: Comparer<T>,
{
    remove(tree, value, comparer).0
}

pub fn for_each<T, F>(tree: &Tree<T>, f: F)
where
    F: FnMut(&T),
{
    Iter::new(tree).for_each(f)
}

pub fn len<T>(tree: &Tree<T>) -> usize {
    tree.as_ref().map_or(0, |node| node.len)
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.value
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.value
    })
}

/// Verifies the binary search tree property under `comparer`, the heap property on priorities and
/// the cached subtree lengths.
pub fn check<T, C>(tree: &Tree<T>, comparer: &C) -> Result<()>
where
    C: Comparer<T>,
{
    check_node(tree)?;
    let mut iter = Iter::new(tree);
    if let Some(mut prev) = iter.next() {
        for (index, value) in iter.enumerate() {
            if comparer.compare(prev, value) != Ordering::Less {
                return Err(Error::Unordered { position: index + 1 });
            }
            prev = value;
        }
    }
    Ok(())
}

fn check_node<T>(tree: &Tree<T>) -> Result<()> {
    if let Some(ref node) = *tree {
        for child in &[&node.left, &node.right] {
            if let Some(ref child_node) = **child {
                if child_node.priority > node.priority {
                    return Err(Error::HeapViolation {
                        parent: node.priority,
                        child: child_node.priority,
                    });
                }
            }
        }
        let expected = 1 + len(&node.left) + len(&node.right);
        if node.len != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: node.len,
            });
        }
        check_node(&node.left)?;
        check_node(&node.right)?;
    }
    Ok(())
}

/// An in-order iterator over the values of a tree.
///
/// The iterator borrows the tree, so it can be restarted by creating a new one or by cloning it
/// before advancing.
pub struct Iter<'a, T: 'a> {
    current: &'a Tree<T>,
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub fn new(tree: &'a Tree<T>) -> Self {
        Iter {
            current: tree,
            stack: Vec::new(),
            remaining: len(tree),
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            current: self.current,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = *self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}
