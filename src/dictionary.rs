use crate::error::{CollectionError, Result};

/// Describes what a dictionary is: a mapping from unique keys to values.
///
/// Hash-based and ordered dictionaries want very different bounds on their
/// keys (`Hash + Eq` versus `Ord`), so the trait itself asks for nothing and
/// each implementation brings its own bounds. The inherent methods on each
/// dictionary accept borrowed key forms; the trait sticks to `&K`.
///
/// Every lookup comes in two flavors: a try-style one returning `Option`,
/// and a throwing-style one returning [`Result`] with
/// [`CollectionError::KeyNotFound`].
pub trait Dictionary<K, V> {
    /// Puts a value at a key, replacing and returning whatever was there.
    fn insert(&mut self, k: K, v: V) -> Option<V>;

    /// Gets the value at a key, if there is one.
    fn get(&self, k: &K) -> Option<&V>;

    /// Gets a mutable reference to the value at a key, if there is one.
    fn get_mut(&mut self, k: &K) -> Option<&mut V>;

    /// Bust a move, returning whatever was there.
    fn remove(&mut self, k: &K) -> Option<V>;

    /// Clears the dictionary entirely.
    fn clear(&mut self);

    /// The number of entries stored right now.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, k: &K) -> bool {
        self.get(k).is_some()
    }

    /// Adds a new entry, failing with [`CollectionError::DuplicateKey`]
    /// instead of replacing an existing one.
    fn add(&mut self, k: K, v: V) -> Result<()> {
        if self.contains_key(&k) {
            return Err(CollectionError::DuplicateKey);
        }

        self.insert(k, v);
        Ok(())
    }

    /// Like [`add`](Dictionary::add), reporting success as a `bool`.
    fn try_add(&mut self, k: K, v: V) -> bool {
        self.add(k, v).is_ok()
    }

    /// Gets the value at a key or fails with
    /// [`CollectionError::KeyNotFound`].
    fn at(&self, k: &K) -> Result<&V> {
        self.get(k).ok_or(CollectionError::KeyNotFound)
    }

    fn at_mut(&mut self, k: &K) -> Result<&mut V> {
        self.get_mut(k).ok_or(CollectionError::KeyNotFound)
    }

    /// Removes the value at a key or fails with
    /// [`CollectionError::KeyNotFound`].
    fn take(&mut self, k: &K) -> Result<V> {
        self.remove(k).ok_or(CollectionError::KeyNotFound)
    }
}
