//! LIFO on top of [`ArrayList`]. The top of the stack is the end of the
//! array, so neither push nor pop ever shifts anything.

use std::fmt;

use crate::array_list::ArrayList;
use crate::error::{Result, StateError};
use crate::sequence::Sequence;
use crate::stamp::Stamp;

/// A last-in, first-out stack. Push and pop are amortized O(1).
#[derive(Clone)]
pub struct ArrayStack<T> {
    items: ArrayList<T>,
}

impl<T> ArrayStack<T> {
    pub fn new() -> Self {
        Self {
            items: ArrayList::new(),
        }
    }

    /// An empty stack with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: ArrayList::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Takes the top element, failing with [`StateError::Empty`] on an empty
    /// stack.
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or_else(|| StateError::Empty.into())
    }

    /// Takes the top element, if any.
    pub fn try_pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Looks at the top element, failing with [`StateError::Empty`] on an
    /// empty stack.
    pub fn peek(&self) -> Result<&T> {
        self.items.last().ok_or_else(|| StateError::Empty.into())
    }

    pub fn try_peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Top to bottom.
    pub fn iter(&self) -> std::iter::Rev<std::slice::Iter<'_, T>> {
        self.items.iter().rev()
    }

    /// Copies the contents out, top first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Default for ArrayStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Pushes in iteration order, so the last element ends up on top.
impl<T> FromIterator<T> for ArrayStack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for ArrayStack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Pops until empty.
impl<T> IntoIterator for ArrayStack<T> {
    type Item = T;
    type IntoIter = std::iter::Rev<std::vec::IntoIter<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_vec().into_iter().rev()
    }
}

impl<T> Sequence for ArrayStack<T> {
    type Item<'a> = &'a T where Self: 'a;
    type Position = usize;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn stamp(&self) -> Stamp {
        self.items.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        position.checked_sub(1)
    }

    fn item_at(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayStack;
    use crate::error::{CollectionError, StateError};
    use crate::sequence::Sequence;

    #[test]
    fn last_in_first_out() {
        let mut stack = ArrayStack::new();
        stack.push("one");
        stack.push("two");
        stack.push("three");

        assert_eq!(Ok(&"three"), stack.peek());
        assert_eq!(vec!["three", "two", "one"], stack.to_vec());
        assert_eq!(Ok("three"), stack.pop());
        assert_eq!(Some("two"), stack.try_pop());
        assert_eq!(1, stack.len());
    }

    #[test]
    fn empty_stack_dual_api() {
        let mut stack: ArrayStack<u8> = ArrayStack::default();

        assert_eq!(None, stack.try_pop());
        assert_eq!(None, stack.try_peek());
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Empty)),
            stack.pop()
        );
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Empty)),
            stack.peek()
        );
    }

    #[test]
    fn cursor_goes_top_down() {
        let stack: ArrayStack<u8> = (1..=4).collect();
        let seen: Vec<u8> = stack.cursor().copied().collect();
        assert_eq!(vec![4, 3, 2, 1], seen);

        let drained: Vec<u8> = stack.into_iter().collect();
        assert_eq!(vec![4, 3, 2, 1], drained);
    }

    #[test]
    fn push_invalidates_detached_cursor() {
        let mut stack: ArrayStack<u8> = (1..=2).collect();
        let mut cursor = stack.detached_cursor();
        assert_eq!(Ok(true), cursor.advance(&stack));
        stack.push(3);
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Stale)),
            cursor.advance(&stack)
        );
    }
}
