//! FIFO over a circular buffer.
//!
//! The front of the queue is `head`; the back is `head + len`, wrapping.
//! Dequeuing only moves `head`, so nothing is ever shifted. Growth follows
//! the same schedule as [`ArrayList`](crate::ArrayList), and unrolls the
//! ring into the new buffer so the front lands back at slot 0.

use std::fmt;

use crate::array_list::grown_capacity;
use crate::error::{Result, StateError};
use crate::sequence::Sequence;
use crate::stamp::{Stamp, Tracker};

/// A first-in, first-out queue. Enqueue and dequeue are amortized O(1).
#[derive(Clone)]
pub struct RingQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
    tracker: Tracker,
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl<T> RingQueue<T> {
    /// Creates an empty queue. Nothing is allocated until the first enqueue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity),
            head: 0,
            len: 0,
            tracker: Tracker::new(),
        }
    }

    /// The number of elements waiting in the queue.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How many elements fit before the next growth.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Physical slot of the element `offset` places behind the front.
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.slots.len()
    }

    fn grow(&mut self) {
        let new_capacity = grown_capacity(self.slots.len(), self.len + 1);
        log::trace!(
            "ring queue growing from {} to {} slots ({} in use)",
            self.slots.len(),
            new_capacity,
            self.len
        );

        let mut next = Vec::with_capacity(new_capacity);
        for offset in 0..self.len {
            let at = self.slot(offset);
            next.push(self.slots[at].take());
        }
        next.resize_with(new_capacity, || None);

        self.slots = next;
        self.head = 0;
        self.tracker.bump();
    }

    /// Adds to the back.
    pub fn enqueue(&mut self, value: T) {
        if self.len == self.slots.len() {
            self.grow();
        }

        let at = self.slot(self.len);
        self.slots[at] = Some(value);
        self.len += 1;
        self.tracker.bump();
    }

    /// Takes from the front, failing with [`StateError::Empty`] on an empty
    /// queue.
    pub fn dequeue(&mut self) -> Result<T> {
        self.try_dequeue().ok_or_else(|| StateError::Empty.into())
    }

    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.head].take();
        self.head = self.slot(1);
        self.len -= 1;
        self.tracker.bump();
        value
    }

    /// Looks at the front, failing with [`StateError::Empty`] on an empty
    /// queue.
    pub fn peek(&self) -> Result<&T> {
        self.try_peek().ok_or_else(|| StateError::Empty.into())
    }

    pub fn try_peek(&self) -> Option<&T> {
        self.get(0)
    }

    /// The element `offset` places behind the front.
    pub fn get(&self, offset: usize) -> Option<&T> {
        if offset < self.len {
            self.slots[self.slot(offset)].as_ref()
        } else {
            None
        }
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
        self.tracker.bump();
    }

    /// Front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            offset: 0,
        }
    }

    /// Copies the contents out, front first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Default for RingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RingQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = RingQueue::new();
        queue.extend(iter);
        queue
    }
}

impl<T> Extend<T> for RingQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.enqueue(value);
        }
    }
}

pub struct Iter<'a, T> {
    queue: &'a RingQueue<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.queue.get(self.offset)?;
        self.offset += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len - self.offset.min(self.queue.len);
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a RingQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Dequeues until empty.
pub struct IntoIter<T>(RingQueue<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.try_dequeue()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> IntoIterator for RingQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<T> Sequence for RingQueue<T> {
    type Item<'a> = &'a T where Self: 'a;
    type Position = usize;

    fn len(&self) -> usize {
        self.len
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        if self.len > 0 {
            Some(0)
        } else {
            None
        }
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        let next = position + 1;
        if next < self.len {
            Some(next)
        } else {
            None
        }
    }

    fn item_at(&self, position: usize) -> Option<&T> {
        self.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::RingQueue;
    use crate::error::{CollectionError, StateError};
    use crate::sequence::Sequence;

    #[test]
    fn first_in_first_out() {
        let mut queue = RingQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(Ok(&1), queue.peek());
        assert_eq!(Ok(1), queue.dequeue());
        assert_eq!(Some(2), queue.try_dequeue());
        assert_eq!(1, queue.len());
        assert_eq!(vec![3], queue.to_vec());
    }

    #[test]
    fn empty_queue_dual_api() {
        let mut queue: RingQueue<u8> = RingQueue::default();

        assert_eq!(None, queue.try_dequeue());
        assert_eq!(None, queue.try_peek());
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Empty)),
            queue.dequeue()
        );
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Empty)),
            queue.peek()
        );
    }

    #[test]
    fn wraps_without_shifting_then_grows_in_order() {
        let mut queue = RingQueue::with_capacity(4);
        for i in 0..4 {
            queue.enqueue(i);
        }
        // move the head forward so the next two land at the start of the
        // buffer
        assert_eq!(Ok(0), queue.dequeue());
        assert_eq!(Ok(1), queue.dequeue());
        queue.enqueue(4);
        queue.enqueue(5);
        assert_eq!(4, queue.capacity());
        assert_eq!(2, queue.head);

        // full and wrapped; the next enqueue has to unroll the ring
        queue.enqueue(6);
        assert_eq!(8, queue.capacity());
        assert_eq!(0, queue.head);
        assert_eq!(vec![2, 3, 4, 5, 6], queue.to_vec());
        assert_eq!(vec![2, 3, 4, 5, 6], queue.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn clear_then_reuse() {
        let mut queue: RingQueue<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.contains(&"a".to_string()));

        queue.enqueue("c".to_string());
        assert_eq!(Ok(&"c".to_string()), queue.peek());
    }

    #[test]
    fn cursor_front_to_back() {
        let queue: RingQueue<char> = "abc".chars().collect();
        let seen: String = queue.cursor().collect();
        assert_eq!("abc", seen);
        assert_eq!(3, queue.iter().len());
    }
}
