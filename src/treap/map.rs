use crate::entry::Entry;
use crate::treap::compare::{Comparer, KeyComparer, Natural};
use crate::treap::node::Node;
use crate::treap::tree::{self, Tree};
use crate::treap::Result;
use rand::{Rng, XorShiftRng};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Add, BitAnd, Index, Sub};
use std::result;

/// A persistent ordered map implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a key, a value, and a priority. The key of any node is greater than all keys in its
/// left subtree and less than all keys occuring in its right subtree. The priority of a node is
/// greater than the priority of all nodes in its subtrees. By randomly generating priorities, the
/// expected height of the tree is proportional to the logarithm of the number of keys.
///
/// Each key-value pair is stored as a single `Entry` ordered by its key. Cloning the map is `O(1)`
/// and gives an independent snapshot that shares all of its nodes with the original.
///
/// # Examples
///
/// ```
/// use persistent_treap::treap::PersistentMap;
///
/// let mut m = PersistentMap::new();
/// m.insert(52, "hello");
/// m.insert(53, "world");
/// m.insert(52, "Hello");
///
/// let mut snapshot = m.clone();
/// snapshot.insert(500, "five hundred");
/// m.remove(&53);
///
/// assert_eq!(m.get(&53), None);
/// assert_eq!(snapshot.get(&53), Some(&"world"));
/// assert_eq!(snapshot.get(&52), Some(&"Hello"));
/// assert_eq!(m.get(&500), None);
/// ```
pub struct PersistentMap<T, U, C = Natural> {
    root: Tree<Entry<T, U>>,
    comparer: KeyComparer<C>,
    rng: XorShiftRng,
}

impl<T, U, C: Clone> Clone for PersistentMap<T, U, C> {
    fn clone(&self) -> Self {
        PersistentMap {
            root: self.root.clone(),
            comparer: self.comparer.clone(),
            rng: self.rng.clone().gen(),
        }
    }
}

impl<T: Ord + Clone, U: Clone> PersistentMap<T, U> {
    /// Constructs a new, empty `PersistentMap<T, U>` ordered by the `Ord` implementation of its
    /// keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let m: PersistentMap<u32, u32> = PersistentMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_comparer(Natural)
    }
}

impl<T, U, C> PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    /// Constructs a new, empty map whose keys are ordered by `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_rng(comparer, rand::weak_rng())
    }

    /// Constructs a new, empty map whose keys are ordered by `comparer` and that draws node
    /// priorities from `rng`. Clones and the results of set operations are given generators seeded
    /// from `rng`.
    pub fn with_rng(comparer: C, rng: XorShiftRng) -> Self {
        PersistentMap {
            root: None,
            comparer: KeyComparer::new(comparer),
            rng,
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists, its value is replaced and
    /// the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// assert_eq!(m.insert(1, 1), None);
    /// assert_eq!(m.get(&1), Some(&1));
    /// assert_eq!(m.insert(1, 2), Some(1));
    /// assert_eq!(m.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U> {
        let old_value = self.get(&key).cloned();
        let &mut PersistentMap {
            ref mut root,
            ref comparer,
            ref mut rng,
        } = self;
        let new_node = Node::new(Entry { key, value }, rng.next_u32()).into_tree();
        *root = tree::union(root, &new_node, comparer, true);
        old_value
    }

    /// Removes a key-value pair from the map. If the key exists, the associated value is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(1, 1);
    /// assert_eq!(m.remove(&1), Some(1));
    /// assert_eq!(m.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<U> {
        let &mut PersistentMap {
            ref mut root,
            ref comparer,
            ..
        } = self;
        let (new_root, removed) =
            tree::remove_by(root, |entry| comparer.inner().compare(&entry.key, key));
        removed.map(|entry| {
            *root = new_root;
            entry.value
        })
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(1, 1);
    /// assert!(!m.contains_key(&0));
    /// assert!(m.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(1, 1);
    /// assert_eq!(m.get(&0), None);
    /// assert_eq!(m.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &T) -> Option<&U> {
        let &PersistentMap {
            ref root,
            ref comparer,
            ..
        } = self;
        tree::find_by(root, |entry| comparer.inner().compare(&entry.key, key))
            .map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        tree::len(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the entry with the minimum key. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(1, 1);
    /// m.insert(3, 3);
    /// assert_eq!(m.min(), Some((&1, &1)));
    /// ```
    pub fn min(&self) -> Option<(&T, &U)> {
        tree::min(&self.root).map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the entry with the maximum key. Returns `None` if the map is empty.
    pub fn max(&self) -> Option<(&T, &U)> {
        tree::max(&self.root).map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the union of two maps. If a key is found in both maps, the union contains the
    /// value from `other`. The `+` operator is implemented to take the union of two maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut n = PersistentMap::new();
    /// n.insert(1, 1);
    /// n.insert(2, 2);
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(2, 3);
    /// m.insert(3, 3);
    ///
    /// let union = n.union(&m);
    /// assert_eq!(
    ///     union.iter().collect::<Vec<(&u32, &u32)>>(),
    ///     vec![(&1, &1), (&2, &3), (&3, &3)],
    /// );
    /// ```
    pub fn union(&self, other: &Self) -> Self {
        self.with_root(tree::union(&self.root, &other.root, &self.comparer, true))
    }

    /// Returns the intersection of two maps. If a key is found in both maps, the intersection
    /// contains the value from `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut n = PersistentMap::new();
    /// n.insert(1, 1);
    /// n.insert(2, 2);
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(2, 3);
    /// m.insert(3, 3);
    ///
    /// let inter = n.intersection(&m);
    /// assert_eq!(inter.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&2, &2)]);
    /// ```
    pub fn intersection(&self, other: &Self) -> Self {
        self.with_root(tree::intersection(&self.root, &other.root, &self.comparer))
    }

    /// Returns the entries of `self` whose keys are not in `other`. The `-` operator is
    /// implemented to take the difference of two maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut n = PersistentMap::new();
    /// n.insert(1, 1);
    /// n.insert(2, 2);
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(2, 3);
    /// m.insert(3, 3);
    ///
    /// let difference = n.difference(&m);
    /// assert_eq!(difference.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&1, &1)]);
    /// ```
    pub fn difference(&self, other: &Self) -> Self {
        self.with_root(tree::difference(&self.root, &other.root, &self.comparer))
    }

    /// Verifies the treap invariants of the map.
    pub fn check(&self) -> Result<()> {
        tree::check(&self.root, &self.comparer)
    }

    fn with_root(&self, root: Tree<Entry<T, U>>) -> Self {
        PersistentMap {
            root,
            comparer: self.comparer.clone(),
            rng: self.rng.clone().gen(),
        }
    }
}

impl<T, U, C> PersistentMap<T, U, C> {
    /// Calls `f` on every key-value pair of the map in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(2, "b");
    /// m.insert(1, "a");
    ///
    /// let mut keys = Vec::new();
    /// m.for_each(|key, _| keys.push(*key));
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T, &U),
    {
        tree::for_each(&self.root, |entry| f(&entry.key, &entry.value))
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_treap::treap::PersistentMap;
    ///
    /// let mut m = PersistentMap::new();
    /// m.insert(1, 1);
    /// m.insert(3, 3);
    ///
    /// let mut iterator = m.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> PersistentMapIter<T, U> {
        PersistentMapIter {
            inner: tree::Iter::new(&self.root),
        }
    }

    /// Returns an iterator over the keys of the map in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values of the map in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &U> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns the root of the underlying tree.
    pub fn root(&self) -> &Tree<Entry<T, U>> {
        &self.root
    }
}

impl<'a, T: 'a, U: 'a, C> IntoIterator for &'a PersistentMap<T, U, C> {
    type Item = (&'a T, &'a U);
    type IntoIter = PersistentMapIter<'a, T, U>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `PersistentMap<T, U, C>`.
///
/// This iterator traverses the elements of a map in-order and yields immutable references.
#[derive(Clone)]
pub struct PersistentMapIter<'a, T: 'a, U: 'a> {
    inner: tree::Iter<'a, Entry<T, U>>,
}

impl<'a, T: 'a, U: 'a> Iterator for PersistentMapIter<'a, T, U> {
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T: 'a, U: 'a> ExactSizeIterator for PersistentMapIter<'a, T, U> {}

impl<T, U, C> Index<&T> for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Key does not exist.")
    }
}

impl<T, U, C> Default for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone + Default,
{
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<T, U, C> Extend<(T, U)> for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    fn extend<I: IntoIterator<Item = (T, U)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T, U, C> FromIterator<(T, U)> for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (T, U)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<T, U, C> PartialEq for PersistentMap<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().len() == other.iter().len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, U: Eq, C> Eq for PersistentMap<T, U, C> {}

impl<T: fmt::Debug, U: fmt::Debug, C> fmt::Debug for PersistentMap<T, U, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U, C> Add for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentMap<T, U, C>;

    fn add(self, other: PersistentMap<T, U, C>) -> PersistentMap<T, U, C> {
        self.union(&other)
    }
}

impl<T, U, C> Sub for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentMap<T, U, C>;

    fn sub(self, other: PersistentMap<T, U, C>) -> PersistentMap<T, U, C> {
        self.difference(&other)
    }
}

impl<T, U, C> BitAnd for PersistentMap<T, U, C>
where
    T: Clone,
    U: Clone,
    C: Comparer<T> + Clone,
{
    type Output = PersistentMap<T, U, C>;

    fn bitand(self, other: PersistentMap<T, U, C>) -> PersistentMap<T, U, C> {
        self.intersection(&other)
    }
}

impl<T: Serialize, U: Serialize, C> Serialize for PersistentMap<T, U, C> {
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

struct PersistentMapVisitor<T, U, C> {
    marker: PhantomData<fn() -> PersistentMap<T, U, C>>,
}

impl<'de, T, U, C> Visitor<'de> for PersistentMapVisitor<T, U, C>
where
    T: Deserialize<'de> + Clone,
    U: Deserialize<'de> + Clone,
    C: Comparer<T> + Clone + Default,
{
    type Value = PersistentMap<T, U, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = PersistentMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U, C> Deserialize<'de> for PersistentMap<T, U, C>
where
    T: Deserialize<'de> + Clone,
    U: Deserialize<'de> + Clone,
    C: Comparer<T> + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentMapVisitor {
            marker: PhantomData,
        })
    }
}
