//! A growable array that manages its own growth.
//!
//! `Vec` would happily grow itself, but the point here is to be explicit
//! about it: when the buffer is full a new one is allocated at
//! [`GROWTH_FACTOR`] times the size, the elements are moved across, and the
//! old buffer is dropped. Anything holding a raw pointer or a detached cursor
//! into the old buffer is not told about this; cursors find out through the
//! stamp.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{CollectionError, Result};
use crate::indexed::IndexedCollection;
use crate::sequence::Sequence;
use crate::stamp::{Stamp, Tracker};

/// How much larger each new buffer is than the one it replaces.
pub const GROWTH_FACTOR: usize = 2;

/// The capacity of the first buffer allocated by growth.
pub const MIN_GROWTH_CAPACITY: usize = 4;

/// The capacity the next growth step should allocate, for a buffer of
/// `capacity` that must hold at least `required` elements.
pub(crate) fn grown_capacity(capacity: usize, required: usize) -> usize {
    capacity
        .saturating_mul(GROWTH_FACTOR)
        .max(MIN_GROWTH_CAPACITY)
        .max(required)
}

/// A resizable, contiguous, indexable list.
#[derive(Clone)]
pub struct ArrayList<T> {
    buf: Vec<T>,
    tracker: Tracker,
}

impl<T> ArrayList<T> {
    /// Creates an empty list. Nothing is allocated until the first push.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            tracker: Tracker::new(),
        }
    }

    /// The number of elements in the list.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// How many elements fit before the next growth.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Swaps in a larger buffer that holds at least `required` elements.
    fn grow(&mut self, required: usize) {
        let new_capacity = grown_capacity(self.buf.capacity(), required);
        log::trace!(
            "array list growing from {} to {} slots ({} in use)",
            self.buf.capacity(),
            new_capacity,
            self.buf.len()
        );

        let mut next = Vec::with_capacity(new_capacity);
        next.extend(self.buf.drain(..));
        self.buf = next;
        self.tracker.bump();
    }

    fn ensure_room(&mut self, additional: usize) {
        let required = self.buf.len().saturating_add(additional);
        if required > self.buf.capacity() {
            self.grow(required);
        }
    }

    fn out_of_range(&self, index: usize) -> CollectionError {
        CollectionError::OutOfRange {
            index,
            len: self.buf.len(),
        }
    }

    /// Appends an element, growing the buffer if it is full.
    pub fn push(&mut self, value: T) {
        self.ensure_room(1);
        self.buf.push(value);
        self.tracker.bump();
    }

    /// Removes the last element, if any.
    pub fn pop(&mut self) -> Option<T> {
        let value = self.buf.pop();
        if value.is_some() {
            self.tracker.bump();
        }
        value
    }

    /// Inserts at `index`, shifting the tail right. `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.buf.len() {
            return Err(self.out_of_range(index));
        }

        self.ensure_room(1);
        self.buf.insert(index, value);
        self.tracker.bump();
        Ok(())
    }

    /// Removes the element at `index`, shifting the tail left.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.buf.len() {
            return Err(self.out_of_range(index));
        }

        self.tracker.bump();
        Ok(self.buf.remove(index))
    }

    /// Removes the element at `index` by moving the last element into its
    /// place. O(1), but doesn't preserve order.
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        if index >= self.buf.len() {
            return Err(self.out_of_range(index));
        }

        self.tracker.bump();
        Ok(self.buf.swap_remove(index))
    }

    /// The element at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    /// A mutable reference to the element at `index`, if there is one.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buf.get_mut(index)
    }

    /// Gets the element at `index` or fails with
    /// [`CollectionError::OutOfRange`].
    pub fn at(&self, index: usize) -> Result<&T> {
        self.buf.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.buf.len();
        self.buf
            .get_mut(index)
            .ok_or(CollectionError::OutOfRange { index, len })
    }

    /// Replaces the element at `index`, returning the old one. Not a
    /// structural change; cursors stay valid.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.at_mut(index).map(|slot| std::mem::replace(slot, value))
    }

    /// The element at index 0.
    pub fn first(&self) -> Option<&T> {
        self.buf.first()
    }

    /// The element at `len - 1`.
    pub fn last(&self) -> Option<&T> {
        self.buf.last()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.buf.contains(value)
    }

    /// The index of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.buf.iter().position(|v| v == value)
    }

    /// The index of the last element equal to `value`.
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.buf.iter().rposition(|v| v == value)
    }

    pub fn reverse(&mut self) {
        self.buf.reverse();
        self.tracker.bump();
    }

    /// Stable sort in ascending order.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.buf.sort();
        self.tracker.bump();
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.buf.sort_by(compare);
        self.tracker.bump();
    }

    /// Binary search over a list that is already sorted. `Err` carries the
    /// index where `value` would be inserted to keep it sorted.
    pub fn binary_search(&self, value: &T) -> std::result::Result<usize, usize>
    where
        T: Ord,
    {
        self.buf.binary_search(value)
    }

    /// Drops everything past the first `len` elements.
    pub fn truncate(&mut self, len: usize) {
        if len < self.buf.len() {
            self.buf.truncate(len);
            self.tracker.bump();
        }
    }

    /// Removes every element. The buffer is kept.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.tracker.bump();
    }

    /// Makes sure at least `additional` more elements fit without growing.
    pub fn reserve(&mut self, additional: usize) {
        self.ensure_room(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        if self.buf.capacity() > self.buf.len() {
            self.buf.shrink_to_fit();
            self.tracker.bump();
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    /// Copies the contents out, in order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buf.clone()
    }

    /// Hands over the elements without copying.
    pub fn into_vec(self) -> Vec<T> {
        self.buf
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.buf.iter_mut()
    }
}

impl<T> Default for ArrayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.buf.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArrayList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<T: Eq> Eq for ArrayList<T> {}

impl<T> From<Vec<T>> for ArrayList<T> {
    fn from(buf: Vec<T>) -> Self {
        Self {
            buf,
            tracker: Tracker::new(),
        }
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = ArrayList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for ArrayList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.ensure_room(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for ArrayList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ArrayList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ArrayList<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter_mut()
    }
}

impl<T> Index<usize> for ArrayList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.buf[index]
    }
}

impl<T> IndexMut<usize> for ArrayList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.buf[index]
    }
}

impl<T> IndexedCollection<T> for ArrayList<T> {
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buf.get_mut(index)
    }

    fn push(&mut self, value: T) {
        ArrayList::push(self, value)
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        ArrayList::insert(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<T> {
        ArrayList::remove(self, index)
    }
}

impl<T> Sequence for ArrayList<T> {
    type Item<'a> = &'a T where Self: 'a;
    type Position = usize;

    fn len(&self) -> usize {
        self.buf.len()
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        if self.buf.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        let next = position + 1;
        if next < self.buf.len() {
            Some(next)
        } else {
            None
        }
    }

    fn item_at(&self, position: usize) -> Option<&T> {
        self.buf.get(position)
    }
}
