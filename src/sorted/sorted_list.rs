use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::dictionary::Dictionary;
use crate::error::{CollectionError, Result};
use crate::sequence::Sequence;
use crate::stamp::{Stamp, Tracker};

/// A sorted dictionary stored as two parallel arrays, keys and values.
///
/// Lookups are a binary search over the keys, O(log n). Inserting or removing
/// shifts everything after the affected position, O(n). In exchange the
/// entries are packed tightly and can be addressed by position, which the
/// tree-based [`SortedMap`](super::SortedMap) can only do in O(log n).
pub struct SortedList<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    tracker: Tracker,
}

impl<K, V> SortedList<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            tracker: Tracker::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn out_of_range(&self, index: usize) -> CollectionError {
        CollectionError::OutOfRange {
            index,
            len: self.keys.len(),
        }
    }

    /// The entry at sorted position `index`.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        Some((self.keys.get(index)?, self.values.get(index)?))
    }

    pub fn key_at(&self, index: usize) -> Result<&K> {
        self.keys.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn value_at(&self, index: usize) -> Result<&V> {
        self.values.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// Removes the entry at sorted position `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<(K, V)> {
        if index >= self.keys.len() {
            return Err(self.out_of_range(index));
        }

        self.tracker.bump();
        Ok((self.keys.remove(index), self.values.remove(index)))
    }

    /// Like [`remove_at`](Self::remove_at), but `None` when out of range.
    pub fn try_remove_at(&mut self, index: usize) -> Option<(K, V)> {
        if index < self.keys.len() {
            self.remove_at(index).ok()
        } else {
            None
        }
    }

    /// The position of the first value equal to `value`, by linear scan.
    pub fn index_of_value(&self, value: &V) -> Option<usize>
    where
        V: PartialEq,
    {
        self.values.iter().position(|v| v == value)
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_index(0)
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.get_index(self.keys.len().checked_sub(1)?)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            None
        } else {
            self.remove_at(0).ok()
        }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        self.tracker.bump();
        Some((key, value))
    }

    /// All keys, ascending.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// All values, in key order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.tracker.bump();
    }

    /// Ascending key order.
    pub fn iter(&self) -> std::iter::Zip<std::slice::Iter<'_, K>, std::slice::Iter<'_, V>> {
        self.keys.iter().zip(self.values.iter())
    }

    /// Copies the entries out, ascending.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Ord, V> SortedList<K, V> {
    /// `Ok` with the key's position, or `Err` with where it would go.
    fn search<Q>(&self, k: &Q) -> std::result::Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.keys.binary_search_by(|probe| probe.borrow().cmp(k))
    }

    /// Puts `v` at `k`, returning the value it replaced.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        match self.search(&k) {
            Ok(at) => Some(std::mem::replace(&mut self.values[at], v)),
            Err(at) => {
                self.keys.insert(at, k);
                self.values.insert(at, v);
                self.tracker.bump();
                None
            }
        }
    }

    /// Adds a new entry, failing with [`CollectionError::DuplicateKey`] if
    /// `k` is already present.
    pub fn add(&mut self, k: K, v: V) -> Result<()> {
        match self.search(&k) {
            Ok(_) => Err(CollectionError::DuplicateKey),
            Err(at) => {
                self.keys.insert(at, k);
                self.values.insert(at, v);
                self.tracker.bump();
                Ok(())
            }
        }
    }

    pub fn try_add(&mut self, k: K, v: V) -> bool {
        self.add(k, v).is_ok()
    }

    /// The sorted position of `k`.
    pub fn index_of_key<Q>(&self, k: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(k).ok()
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(k).ok().map(|at| &self.values[at])
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(k).ok().and_then(|at| self.get_index(at))
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let at = self.search(k).ok()?;
        self.values.get_mut(at)
    }

    /// Gets the value at `k` or fails with [`CollectionError::KeyNotFound`].
    pub fn at<Q>(&self, k: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(k).ok_or(CollectionError::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, k: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(k).ok_or(CollectionError::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(k).is_ok()
    }

    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let at = self.search(k).ok()?;
        self.remove_at(at).ok()
    }

    /// Removes the value at `k` or fails with
    /// [`CollectionError::KeyNotFound`].
    pub fn take<Q>(&mut self, k: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(k).ok_or(CollectionError::KeyNotFound)
    }
}

impl<K: Ord, V> Dictionary<K, V> for SortedList<K, V> {
    fn insert(&mut self, k: K, v: V) -> Option<V> {
        SortedList::insert(self, k, v)
    }

    fn get(&self, k: &K) -> Option<&V> {
        SortedList::get(self, k)
    }

    fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        SortedList::get_mut(self, k)
    }

    fn remove(&mut self, k: &K) -> Option<V> {
        SortedList::remove(self, k)
    }

    fn clear(&mut self) {
        SortedList::clear(self)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn add(&mut self, k: K, v: V) -> Result<()> {
        SortedList::add(self, k, v)
    }
}

impl<K, V> Default for SortedList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for SortedList<K, V> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            tracker: Tracker::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for SortedList<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.values == other.values
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedList<K, V> {
    /// Later duplicates overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SortedList::new();
        list.extend(iter);
        list
    }
}

impl<K: Ord, V> Extend<(K, V)> for SortedList<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, Q, V> Index<&Q> for SortedList<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, k: &Q) -> &V {
        match self.get(k) {
            Some(v) => v,
            None => panic!("{}", CollectionError::KeyNotFound),
        }
    }
}

impl<K, V> IntoIterator for SortedList<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

impl<'a, K, V> IntoIterator for &'a SortedList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = std::iter::Zip<std::slice::Iter<'a, K>, std::slice::Iter<'a, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Sequence for SortedList<K, V> {
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    type Position = usize;

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        if self.keys.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        match (position + 1).cmp(&self.keys.len()) {
            Ordering::Less => Some(position + 1),
            _ => None,
        }
    }

    fn item_at(&self, position: usize) -> Option<(&K, &V)> {
        self.get_index(position)
    }
}
