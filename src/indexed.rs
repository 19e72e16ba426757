use crate::error::{CollectionError, Result};

/// A collection addressed by position, `0..len`.
///
/// The `get`/`get_mut` pair is the try-style half of the API; `at`, `at_mut`,
/// `set`, `insert` and `remove` are the throwing-style half and report
/// [`CollectionError::OutOfRange`].
pub trait IndexedCollection<T> {
    /// The number of elements.
    fn len(&self) -> usize;

    /// Gets the element at `index`, if it exists.
    fn get(&self, index: usize) -> Option<&T>;

    /// Gets a mutable reference to the element at `index`, if it exists.
    fn get_mut(&mut self, index: usize) -> Option<&mut T>;

    /// Appends to the end.
    fn push(&mut self, value: T);

    /// Inserts at `index`, shifting everything after it. `index == len`
    /// appends.
    fn insert(&mut self, index: usize, value: T) -> Result<()>;

    /// Removes and returns the element at `index`, shifting everything after
    /// it.
    fn remove(&mut self, index: usize) -> Result<T>;

    /// Gets the element at `index` or fails.
    fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.get(index)
            .ok_or(CollectionError::OutOfRange { index, len })
    }

    /// Gets a mutable reference to the element at `index` or fails.
    fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.get_mut(index)
            .ok_or(CollectionError::OutOfRange { index, len })
    }

    /// Replaces the element at `index`, returning the previous one.
    fn set(&mut self, index: usize, value: T) -> Result<T> {
        self.at_mut(index).map(|slot| std::mem::replace(slot, value))
    }

    /// The position of the first element equal to `value`, by linear scan.
    fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        (0..self.len()).find(|&i| self.get(i) == Some(value))
    }
}
