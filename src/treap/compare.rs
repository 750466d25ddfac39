use crate::entry::Entry;
use std::cmp::Ordering;

/// A total order over values of type `T`.
///
/// Every treap operation takes a comparer and trusts it. Trees that are combined must have been
/// built with the same order; mixing orders produces trees whose contents are unspecified.
pub trait Comparer<T: ?Sized> {
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

/// Orders values by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparer<T> for Natural {
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}

/// Orders entries by key using an inner comparer. The values of the entries are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyComparer<C> {
    inner: C,
}

impl<C> KeyComparer<C> {
    pub fn new(inner: C) -> Self {
        KeyComparer { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, U, C> Comparer<Entry<T, U>> for KeyComparer<C>
where
    C: Comparer<T>,
{
    fn compare(&self, left: &Entry<T, U>, right: &Entry<T, U>) -> Ordering {
        self.inner.compare(&left.key, &right.key)
    }
}
