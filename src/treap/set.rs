use crate::treap::compare::{Comparer, Natural};
use crate::treap::node::Node;
use crate::treap::tree::{self, Tree};
use crate::treap::Result;
use rand::{Rng, XorShiftRng};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Add, BitAnd, Sub};
use std::result;

/// A persistent ordered set implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a value and a priority. The value of any node is greater than all values in its left
/// subtree and less than all values occuring in its right subtree. The priority of a node is
/// greater than the priority of all nodes in its subtrees. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of values.
///
/// The set is persistent: cloning it is `O(1)` and the clone is an independent snapshot. Updates
/// copy only the nodes on the affected paths and share the rest of the tree with every other
/// version.
///
/// # Examples
///
/// ```
/// use persistent_treap::treap::PersistentSet;
///
/// let mut s = PersistentSet::new();
/// s.insert(0);
/// s.insert(3);
///
/// let snapshot = s.clone();
/// assert_eq!(s.remove(&0), Some(0));
///
/// assert_eq!(s.len(), 1);
/// assert_eq!(snapshot.len(), 2);
/// assert!(snapshot.contains(&0));
/// ```
pub struct PersistentSet<T, C = Natural> {
    root: Tree<T>,
    comparer: C,
    rng: XorShiftRng,
}

impl<T, C: Clone> Clone for PersistentSet<T, C> {
    fn clone(&self) -> Self {
        PersistentSet {
            root: self.root.clone(),
            comparer: self.comparer.clone(),
            rng: self.rng.clone().gen(),
        }
    }
}

impl<T: Ord + Clone> PersistentSet<T> {
    /// Constructs a new, empty `PersistentSet<T>` ordered by `Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let s: PersistentSet<u32> = PersistentSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparer(Natural)
    }
}

impl<T, C> PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone,
{
    /// Constructs a new, empty set ordered by `comparer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s: PersistentSet<u32, _> = PersistentSet::with_comparer(|l: &u32, r: &u32| r.cmp(l));
    /// s.insert(1);
    /// s.insert(2);
    /// assert_eq!(s.iter().collect::<Vec<&u32>>(), vec![&2, &1]);
    /// ```
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_rng(comparer, rand::weak_rng())
    }

    /// Constructs a new, empty set ordered by `comparer` that draws node priorities from `rng`.
    /// Clones and the results of set operations are given generators seeded from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// extern crate persistent_treap;
    /// extern crate rand;
    ///
    /// use persistent_treap::treap::{Natural, PersistentSet};
    /// use rand::{SeedableRng, XorShiftRng};
    ///
    /// # fn main() {
    /// let rng: XorShiftRng = SeedableRng::from_seed([1, 2, 3, 4]);
    /// let mut s = PersistentSet::with_rng(Natural, rng);
    /// s.insert(1);
    /// assert!(s.contains(&1));
    /// # }
    /// ```
    pub fn with_rng(comparer: C, rng: XorShiftRng) -> Self {
        PersistentSet {
            root: None,
            comparer,
            rng,
        }
    }

    /// Inserts a value into the set. If an equal value already exists, it is replaced and the old
    /// value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// assert_eq!(s.insert(1), None);
    /// assert_eq!(s.insert(1), Some(1));
    /// assert_eq!(s.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Option<T> {
        let &mut PersistentSet {
            ref mut root,
            ref comparer,
            ref mut rng,
        } = self;
        let old_value = tree::find(root, &value, comparer).cloned();
        let new_node = Node::new(value, rng.next_u32()).into_tree();
        *root = tree::union(root, &new_node, comparer, true);
        old_value
    }

    /// Removes a value from the set. Returns the removed value if it existed.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(1);
    /// assert_eq!(s.remove(&1), Some(1));
    /// assert_eq!(s.remove(&1), None);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let &mut PersistentSet {
            ref mut root,
            ref comparer,
            ..
        } = self;
        let (new_root, removed) = tree::remove(root, value, comparer);
        removed.map(|value| {
            *root = new_root;
            value
        })
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(1);
    /// assert!(!s.contains(&0));
    /// assert!(s.contains(&1));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        tree::find(&self.root, value, &self.comparer)
    }

    /// Returns the number of values in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(1);
    /// assert_eq!(s.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        tree::len(&self.root)
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the minimum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(1);
    /// s.insert(3);
    /// assert_eq!(s.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.root)
    }

    /// Returns the maximum value of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(1);
    /// s.insert(3);
    /// assert_eq!(s.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.root)
    }

    /// Splits the set into the values less than `value`, the value equal to it, and the values
    /// greater than it. The set itself is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let s = (1..6).collect::<PersistentSet<u32>>();
    /// let (less, equal, greater) = s.split(&3);
    /// assert_eq!(less.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
    /// assert_eq!(equal, Some(3));
    /// assert_eq!(greater.iter().collect::<Vec<&u32>>(), vec![&4, &5]);
    /// ```
    pub fn split(&self, value: &T) -> (Self, Option<T>, Self) {
        let (left, mid, right) = tree::split(&self.root, value, &self.comparer);
        let left = self.with_root(left);
        let right = left.with_root(right);
        (left, mid.map(|node| node.value.clone()), right)
    }

    /// Returns the union of two sets. If a value is found in both sets, the union contains the
    /// value from `self`. The `+` operator is implemented to take the union of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let n = vec![1, 2].into_iter().collect::<PersistentSet<u32>>();
    /// let m = vec![2, 3].into_iter().collect::<PersistentSet<u32>>();
    ///
    /// let union = n.union(&m);
    /// assert_eq!(union.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// ```
    pub fn union(&self, other: &Self) -> Self {
        self.with_root(tree::union(&self.root, &other.root, &self.comparer, false))
    }

    /// Returns the intersection of two sets. Values are taken from `self`. The `&` operator is
    /// implemented to take the intersection of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let n = vec![1, 2].into_iter().collect::<PersistentSet<u32>>();
    /// let m = vec![2, 3].into_iter().collect::<PersistentSet<u32>>();
    ///
    /// let inter = n.intersection(&m);
    /// assert_eq!(inter.iter().collect::<Vec<&u32>>(), vec![&2]);
    /// ```
    pub fn intersection(&self, other: &Self) -> Self {
        self.with_root(tree::intersection(&self.root, &other.root, &self.comparer))
    }

    /// Returns the values of `self` that are not in `other`. The `-` operator is implemented to
    /// take the difference of two sets.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let n = vec![1, 2].into_iter().collect::<PersistentSet<u32>>();
    /// let m = vec![2, 3].into_iter().collect::<PersistentSet<u32>>();
    ///
    /// let difference = n.difference(&m);
    /// assert_eq!(difference.iter().collect::<Vec<&u32>>(), vec![&1]);
    /// ```
    pub fn difference(&self, other: &Self) -> Self {
        self.with_root(tree::difference(&self.root, &other.root, &self.comparer))
    }

    /// Verifies the treap invariants of the set.
    pub fn check(&self) -> Result<()> {
        tree::check(&self.root, &self.comparer)
    }

    fn with_root(&self, root: Tree<T>) -> Self {
        PersistentSet {
            root,
            comparer: self.comparer.clone(),
            rng: self.rng.clone().gen(),
        }
    }
}

impl<T, C> PersistentSet<T, C> {
    /// Calls `f` on every value of the set in ascending order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        tree::for_each(&self.root, f)
    }

    /// Returns an iterator over the set. The iterator yields values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentSet;
    ///
    /// let mut s = PersistentSet::new();
    /// s.insert(3);
    /// s.insert(1);
    ///
    /// let mut iterator = s.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> PersistentSetIter<T> {
        PersistentSetIter {
            inner: tree::Iter::new(&self.root),
        }
    }

    /// Returns the root of the underlying tree.
    pub fn root(&self) -> &Tree<T> {
        &self.root
    }
}

impl<'a, T: 'a, C> IntoIterator for &'a PersistentSet<T, C> {
    type Item = &'a T;
    type IntoIter = PersistentSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `PersistentSet<T, C>`.
///
/// This iterator traverses the values of a set in-order and yields immutable references.
#[derive(Clone)]
pub struct PersistentSetIter<'a, T: 'a> {
    inner: tree::Iter<'a, T>,
}

impl<'a, T: 'a> Iterator for PersistentSetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T: 'a> ExactSizeIterator for PersistentSetIter<'a, T> {}

impl<T, C> Default for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone + Default,
{
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<T, C> Extend<T> for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C> FromIterator<T> for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C> PartialEq for PersistentSet<T, C>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().len() == other.iter().len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for PersistentSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for PersistentSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Add for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentSet<T, C>;

    fn add(self, other: PersistentSet<T, C>) -> PersistentSet<T, C> {
        self.union(&other)
    }
}

impl<T, C> Sub for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentSet<T, C>;

    fn sub(self, other: PersistentSet<T, C>) -> PersistentSet<T, C> {
        self.difference(&other)
    }
}

impl<T, C> BitAnd for PersistentSet<T, C>
where
    T: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentSet<T, C>;

    fn bitand(self, other: PersistentSet<T, C>) -> PersistentSet<T, C> {
        self.intersection(&other)
    }
}

impl<T: Serialize, C> Serialize for PersistentSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T, C> Deserialize<'de> for PersistentSet<T, C>
where
    T: Deserialize<'de> + Clone,
    C: Comparer<T> + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::PersistentSet;
    use crate::treap::Natural;
    use rand::{SeedableRng, XorShiftRng};
    use serde_test::{assert_tokens, Token};
    use std::cmp::Ordering;

    fn priority_of(set: &PersistentSet<u32>, value: u32) -> Option<u32> {
        let mut curr = set.root();
        while let Some(ref node) = *curr {
            match node.value().cmp(&value) {
                Ordering::Less => curr = &node.right,
                Ordering::Greater => curr = &node.left,
                Ordering::Equal => return Some(node.priority()),
            }
        }
        None
    }

    #[test]
    fn test_len_empty() {
        let set: PersistentSet<u32> = PersistentSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: PersistentSet<u32> = PersistentSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = PersistentSet::new();
        set.insert(1);
        assert!(set.contains(&1));
        assert_eq!(set.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut set = PersistentSet::new();
        let ret_1 = set.insert(1);
        let ret_2 = set.insert(1);
        assert_eq!(ret_1, None);
        assert_eq!(ret_2, Some(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = PersistentSet::new();
        set.insert(1);
        let ret = set.remove(&1);
        assert!(!set.contains(&1));
        assert_eq!(ret, Some(1));
        assert_eq!(set.remove(&1), None);
    }

    #[test]
    fn test_remove_absent_keeps_root() {
        let mut set = PersistentSet::new();
        set.insert(1);
        set.insert(2);
        let snapshot = set.clone();
        assert_eq!(set.remove(&3), None);
        assert!(std::ptr::eq(
            &**set.root().as_ref().unwrap(),
            &**snapshot.root().as_ref().unwrap(),
        ));
    }

    #[test]
    fn test_snapshot() {
        let mut set = PersistentSet::new();
        set.insert(1);
        set.insert(2);
        let snapshot = set.clone();
        set.insert(3);
        set.remove(&1);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &3]);
        assert_eq!(snapshot.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
    }

    #[test]
    fn test_min_max() {
        let mut set = PersistentSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_split() {
        let set = (1..10).collect::<PersistentSet<u32>>();
        let (less, equal, greater) = set.split(&4);
        assert_eq!(less.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3]);
        assert_eq!(equal, Some(4));
        assert_eq!(greater.len(), 5);
        assert!(less.check().is_ok());
        assert!(greater.check().is_ok());
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn test_union() {
        let n = vec![1, 2, 3].into_iter().collect::<PersistentSet<u32>>();
        let m = vec![3, 4, 5].into_iter().collect::<PersistentSet<u32>>();

        let union = n + m;

        assert_eq!(
            union.iter().collect::<Vec<&u32>>(),
            vec![&1, &2, &3, &4, &5],
        );
        assert_eq!(union.len(), 5);
    }

    #[test]
    fn test_intersection() {
        let n = vec![1, 2, 3].into_iter().collect::<PersistentSet<u32>>();
        let m = vec![3, 4, 5].into_iter().collect::<PersistentSet<u32>>();

        let inter = n & m;

        assert_eq!(inter.iter().collect::<Vec<&u32>>(), vec![&3]);
        assert_eq!(inter.len(), 1);
    }

    #[test]
    fn test_difference() {
        let n = vec![1, 2, 3].into_iter().collect::<PersistentSet<u32>>();
        let m = vec![3, 4, 5].into_iter().collect::<PersistentSet<u32>>();

        let sub = n - m;

        assert_eq!(sub.iter().collect::<Vec<&u32>>(), vec![&1, &2]);
        assert_eq!(sub.len(), 2);
    }

    #[test]
    fn test_operands_unchanged() {
        let n = vec![1, 2, 3].into_iter().collect::<PersistentSet<u32>>();
        let m = vec![3, 4, 5].into_iter().collect::<PersistentSet<u32>>();

        let _ = n.union(&m);
        let _ = n.intersection(&m);
        let _ = n.difference(&m);

        assert_eq!(n.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
        assert_eq!(m.iter().collect::<Vec<&u32>>(), vec![&3, &4, &5]);
    }

    #[test]
    fn test_for_each() {
        let set = vec![5, 3, 1].into_iter().collect::<PersistentSet<u32>>();
        let mut sum = 0;
        set.for_each(|value| sum += value);
        assert_eq!(sum, 9);
    }

    #[test]
    fn test_iter() {
        let set = vec![5, 3, 1].into_iter().collect::<PersistentSet<u32>>();
        assert_eq!(set.iter().len(), 3);
        assert_eq!((&set).into_iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_eq_debug() {
        let n = vec![2, 1].into_iter().collect::<PersistentSet<u32>>();
        let m = vec![1, 2].into_iter().collect::<PersistentSet<u32>>();
        assert_eq!(n, m);
        assert_eq!(format!("{:?}", n), "{1, 2}");
    }

    #[test]
    fn test_serde() {
        let set = vec![2, 1].into_iter().collect::<PersistentSet<u32>>();
        assert_tokens(
            &set,
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn test_snapshot_priorities_independent() {
        let rng: XorShiftRng = SeedableRng::from_seed([1, 2, 3, 4]);
        let mut set = PersistentSet::with_rng(Natural, rng);
        set.insert(0);
        let mut snapshot = set.clone();
        set.insert(1);
        snapshot.insert(1);
        assert_ne!(priority_of(&set, 1), priority_of(&snapshot, 1));
        assert_eq!(priority_of(&set, 0), priority_of(&snapshot, 0));
    }

    #[test]
    fn test_derived_set_priorities_independent() {
        let rng: XorShiftRng = SeedableRng::from_seed([1, 2, 3, 4]);
        let mut set = PersistentSet::with_rng(Natural, rng);
        set.insert(0);
        let mut union = set.union(&PersistentSet::new());
        set.insert(1);
        union.insert(1);
        assert_ne!(priority_of(&set, 1), priority_of(&union, 1));
    }

    #[test]
    fn test_split_halves_priorities_independent() {
        let rng: XorShiftRng = SeedableRng::from_seed([1, 2, 3, 4]);
        let set = PersistentSet::with_rng(Natural, rng);
        let (mut less, _, mut greater) = set.split(&0);
        less.insert(1);
        greater.insert(1);
        assert_ne!(priority_of(&less, 1), priority_of(&greater, 1));
    }

    #[test]
    fn test_new_sets_priorities_independent() {
        let mut left = PersistentSet::new();
        let mut right = PersistentSet::new();
        left.insert(1);
        right.insert(1);
        assert_ne!(priority_of(&left, 1), priority_of(&right, 1));
    }
}
