//! A doubly linked list that flattens all its nodes onto a Vec for storage.
//!
//! Nodes address each other by their position in the Vec, and removed slots
//! go on a freelist to be reused by later pushes. The list is circular: the
//! head's `prev` is the tail and the tail's `next` is the head, so there is
//! never a "no neighbour" case while linking.
//!
//! Callers hold on to nodes through [`NodeHandle`]s. A handle names the list
//! that issued it and carries the serial number of the node it was issued
//! for. Serials come from a per-list counter that never repeats, so a handle
//! to a removed node stays dead even after its slot is reused.

use std::fmt;

use crate::error::{OwnershipError, Result};
use crate::sequence::Sequence;
use crate::stamp::{OwnerId, Stamp, Tracker};

/// Refers to one node of one [`LinkedList`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    owner: OwnerId,
    index: usize,
    serial: u64,
}

/// A node that lives in a linked list.
#[derive(Clone)]
struct Node<T> {
    /// The value being stored.
    value: T,

    /// The index of the node previous to this one.
    prev: usize,

    /// The index of the next node in the list.
    next: usize,

    /// Which allocation this is; handles must match it.
    serial: u64,
}

#[cold]
#[inline(never)]
fn vacant_slot() -> ! {
    panic!("linked list followed a link into a vacant slot");
}

/// A doubly linked list living in one contiguous Vec of nodes. Removed nodes
/// leave their slot to the freelist, and the store never compacts, so a
/// list that shrinks keeps its high-water allocation.
///
/// Inserting and removing next to a node you hold a handle to is O(1).
/// Finding a value is a linear scan; there is no positional indexing.
///
/// ```
/// use mysterious_collections::LinkedList;
///
/// let mut list = LinkedList::new();
/// let a = list.push_back('a');
/// let c = list.push_back('c');
/// list.insert_after(&a, 'b').unwrap();
///
/// assert_eq!(Some('c'), list.try_remove(&c));
/// assert_eq!(None, list.try_get(&c));
/// assert_eq!(vec!['a', 'b'], list.to_vec());
/// ```
#[derive(Clone)]
pub struct LinkedList<T> {
    /// The nodes in the list. `None` slots are on the freelist.
    store: Vec<Option<Node<T>>>,

    /// Slots in the store which aren't in use anymore. These will be reused.
    free: Vec<usize>,

    /// The first node in the list.
    head: Option<usize>,

    len: usize,
    next_serial: u64,
    tracker: Tracker,
}

impl<T> LinkedList<T> {
    /// Creates a new, empty linked list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new linked list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            len: 0,
            next_serial: 0,
            tracker: Tracker::new(),
        }
    }

    /// The length of this linked list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, index: usize) -> &Node<T> {
        match &self.store[index] {
            Some(node) => node,
            None => vacant_slot(),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.store[index] {
            Some(node) => node,
            None => vacant_slot(),
        }
    }

    fn handle(&self, index: usize) -> NodeHandle {
        NodeHandle {
            owner: self.tracker.owner(),
            index,
            serial: self.node(index).serial,
        }
    }

    /// Maps a handle to its slot, if this list owns it and the node is still
    /// linked in.
    fn resolve(&self, handle: &NodeHandle) -> Result<usize> {
        if handle.owner != self.tracker.owner() {
            log::debug!("rejecting {:?}: issued by another list", handle);
            return Err(OwnershipError::Foreign.into());
        }

        match self.store.get(handle.index) {
            Some(Some(node)) if node.serial == handle.serial => Ok(handle.index),
            _ => {
                log::debug!("rejecting {:?}: node was removed", handle);
                Err(OwnershipError::Detached.into())
            }
        }
    }

    /// Places a new node into the store between `prev` and `next` and fixes
    /// up their links. With `None` the node links to itself, forming a list
    /// of one.
    fn link(&mut self, value: T, between: Option<(usize, usize)>) -> usize {
        // use the first available location in the storage vec, or infer what
        // the next location will be on push.
        let index = self.free.pop().unwrap_or(self.store.len());
        let (prev, next) = between.unwrap_or((index, index));

        let node = Node {
            value,
            prev,
            next,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        if index == self.store.len() {
            self.store.push(Some(node));
        } else {
            self.store[index] = Some(node);
        }

        if between.is_some() {
            self.node_mut(prev).next = index;
            self.node_mut(next).prev = index;
        }

        self.len += 1;
        self.tracker.bump();
        index
    }

    /// Takes a node out of the chain and freelists its slot.
    fn unlink(&mut self, index: usize) -> T {
        let node = match self.store[index].take() {
            Some(node) => node,
            None => vacant_slot(),
        };

        if self.len == 1 {
            self.head = None;
        } else {
            // link prev to next and next to prev so node doesn't exist in
            // the chain anymore
            self.node_mut(node.prev).next = node.next;
            self.node_mut(node.next).prev = node.prev;

            if self.head == Some(index) {
                self.head = Some(node.next);
            }
        }

        self.free.push(index);
        self.len -= 1;
        self.tracker.bump();
        node.value
    }

    fn tail_index(&self) -> Option<usize> {
        self.head.map(|head| self.node(head).prev)
    }

    /// Appends to the back and returns a handle to the new node.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let index = match (self.head, self.tail_index()) {
            (Some(head), Some(tail)) => self.link(value, Some((tail, head))),
            _ => {
                let index = self.link(value, None);
                self.head = Some(index);
                index
            }
        };
        self.handle(index)
    }

    /// Prepends to the front and returns a handle to the new node.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let handle = self.push_back(value);
        // in a ring, the new tail becomes the head by moving the head back
        // one
        self.head = Some(handle.index);
        handle
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|head| self.unlink(head))
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.tail_index().map(|tail| self.unlink(tail))
    }

    /// Links a new node in just before `node`.
    pub fn insert_before(&mut self, node: &NodeHandle, value: T) -> Result<NodeHandle> {
        let at = self.resolve(node)?;
        let prev = self.node(at).prev;
        let index = self.link(value, Some((prev, at)));

        if self.head == Some(at) {
            self.head = Some(index);
        }

        Ok(self.handle(index))
    }

    /// Links a new node in just after `node`.
    pub fn insert_after(&mut self, node: &NodeHandle, value: T) -> Result<NodeHandle> {
        let at = self.resolve(node)?;
        let next = self.node(at).next;
        let index = self.link(value, Some((at, next)));
        Ok(self.handle(index))
    }

    /// Removes `node` and returns its value. The handle is dead afterwards.
    pub fn remove(&mut self, node: &NodeHandle) -> Result<T> {
        let at = self.resolve(node)?;
        Ok(self.unlink(at))
    }

    /// Like [`remove`](LinkedList::remove), giving `None` for a handle this
    /// list won't accept.
    pub fn try_remove(&mut self, node: &NodeHandle) -> Option<T> {
        self.remove(node).ok()
    }

    /// The value at `node`, failing with an [`OwnershipError`] for foreign
    /// or removed nodes.
    pub fn get(&self, node: &NodeHandle) -> Result<&T> {
        let at = self.resolve(node)?;
        Ok(&self.node(at).value)
    }

    pub fn try_get(&self, node: &NodeHandle) -> Option<&T> {
        self.get(node).ok()
    }

    pub fn get_mut(&mut self, node: &NodeHandle) -> Result<&mut T> {
        let at = self.resolve(node)?;
        Ok(&mut self.node_mut(at).value)
    }

    pub fn try_get_mut(&mut self, node: &NodeHandle) -> Option<&mut T> {
        self.get_mut(node).ok()
    }

    /// Whether `node` belongs to this list and is still linked in.
    pub fn contains_node(&self, node: &NodeHandle) -> bool {
        self.resolve(node).is_ok()
    }

    /// The head node.
    pub fn first(&self) -> Option<NodeHandle> {
        self.head.map(|head| self.handle(head))
    }

    /// The tail node.
    pub fn last(&self) -> Option<NodeHandle> {
        self.tail_index().map(|tail| self.handle(tail))
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|head| &self.node(head).value)
    }

    pub fn back(&self) -> Option<&T> {
        self.tail_index().map(|tail| &self.node(tail).value)
    }

    /// The node after `node`, or `None` at the tail.
    pub fn next(&self, node: &NodeHandle) -> Result<Option<NodeHandle>> {
        let at = self.resolve(node)?;
        let next = self.node(at).next;
        Ok(if Some(next) == self.head {
            None
        } else {
            Some(self.handle(next))
        })
    }

    /// The node before `node`, or `None` at the head.
    pub fn prev(&self, node: &NodeHandle) -> Result<Option<NodeHandle>> {
        let at = self.resolve(node)?;
        Ok(if Some(at) == self.head {
            None
        } else {
            Some(self.handle(self.node(at).prev))
        })
    }

    /// The node after `node`. `None` at the tail and for a handle this list
    /// won't accept.
    pub fn try_next(&self, node: &NodeHandle) -> Option<NodeHandle> {
        self.next(node).ok().flatten()
    }

    /// The node before `node`. `None` at the head and for a handle this list
    /// won't accept.
    pub fn try_prev(&self, node: &NodeHandle) -> Option<NodeHandle> {
        self.prev(node).ok().flatten()
    }

    /// The first node holding `value`, by linear scan from the front.
    pub fn find(&self, value: &T) -> Option<NodeHandle>
    where
        T: PartialEq,
    {
        self.indices()
            .find(|&i| &self.node(i).value == value)
            .map(|i| self.handle(i))
    }

    /// The last node holding `value`, by linear scan from the back.
    pub fn find_last(&self, value: &T) -> Option<NodeHandle>
    where
        T: PartialEq,
    {
        self.indices()
            .rev()
            .find(|&i| &self.node(i).value == value)
            .map(|i| self.handle(i))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    /// Removes every node. Every outstanding handle goes dead.
    pub fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
        self.head = None;
        self.len = 0;
        self.tracker.bump();
    }

    /// Store indices in list order.
    fn indices(&self) -> Indices<'_, T> {
        Indices {
            list: self,
            front: self.head,
            back: self.tail_index(),
            remaining: self.len,
        }
    }

    /// Front to back; `.rev()` walks back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            indices: self.indices(),
        }
    }

    /// Front to back, mutably.
    pub fn iter_mut(&mut self) -> std::vec::IntoIter<&mut T> {
        // the store is in allocation order, not list order; rank every slot
        // by its list position and hand the borrows out in rank order
        let mut rank = vec![usize::MAX; self.store.len()];
        for (position, index) in self.indices().enumerate() {
            rank[index] = position;
        }

        let mut ordered: Vec<Option<&mut T>> = Vec::with_capacity(self.len);
        ordered.resize_with(self.len, || None);
        for (index, slot) in self.store.iter_mut().enumerate() {
            if let Some(node) = slot {
                ordered[rank[index]] = Some(&mut node.value);
            }
        }

        ordered.into_iter().flatten().collect::<Vec<_>>().into_iter()
    }

    /// Copies the contents out, front first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

struct Indices<'a, T> {
    list: &'a LinkedList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Indices<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let at = self.front?;
        self.front = Some(self.list.node(at).next);
        self.remaining -= 1;
        Some(at)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Indices<'a, T> {
    fn next_back(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        let at = self.back?;
        self.back = Some(self.list.node(at).prev);
        self.remaining -= 1;
        Some(at)
    }
}

pub struct Iter<'a, T> {
    indices: Indices<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let list = self.indices.list;
        self.indices.next().map(|at| &list.node(at).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let list = self.indices.list;
        self.indices.next_back().map(|at| &list.node(at).value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct IntoIter<T>(LinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_back()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> Sequence for LinkedList<T> {
    type Item<'a> = &'a T where Self: 'a;
    type Position = usize;

    fn len(&self) -> usize {
        self.len
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        self.head
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        let next = self.store.get(position)?.as_ref()?.next;
        if Some(next) == self.head {
            None
        } else {
            Some(next)
        }
    }

    fn item_at(&self, position: usize) -> Option<&T> {
        self.store
            .get(position)
            .and_then(Option::as_ref)
            .map(|node| &node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::LinkedList;
    use crate::error::{CollectionError, OwnershipError};
    use crate::sequence::Sequence;

    fn contents(list: &LinkedList<u32>) -> Vec<u32> {
        list.iter().copied().collect()
    }

    /// Links are walked both ways after every change, so a broken prev or
    /// next pointer shows up as a mismatch between the two directions.
    fn continuity_test(list: &LinkedList<u32>) {
        let forward: Vec<u32> = list.iter().copied().collect();
        let mut backward: Vec<u32> = list.iter().rev().copied().collect();
        backward.reverse();

        assert_eq!(list.len(), forward.len());
        assert_eq!(forward, backward);

        let mut by_handle = Vec::new();
        let mut at = list.first();
        while let Some(node) = at {
            by_handle.push(*list.get(&node).unwrap());
            at = list.next(&node).unwrap();
        }
        assert_eq!(forward, by_handle);
    }

    #[test]
    fn pushes_at_both_ends() {
        let mut list = LinkedList::new();
        list.push_back(2);
        list.push_front(1);
        list.push_back(3);

        assert_eq!(vec![1, 2, 3], contents(&list));
        assert_eq!(Some(&1), list.front());
        assert_eq!(Some(&3), list.back());
        continuity_test(&list);

        assert_eq!(Some(1), list.pop_front());
        assert_eq!(Some(3), list.pop_back());
        assert_eq!(Some(2), list.pop_back());
        assert_eq!(None, list.pop_front());
        continuity_test(&list);
    }

    #[test]
    fn insert_around_nodes() {
        let mut list = LinkedList::new();
        let middle = list.push_back(20);

        let first = list.insert_before(&middle, 10).unwrap();
        let last = list.insert_after(&middle, 30).unwrap();
        list.insert_after(&first, 15).unwrap();
        list.insert_before(&last, 25).unwrap();

        assert_eq!(vec![10, 15, 20, 25, 30], contents(&list));
        assert_eq!(Some(first), list.first());
        assert_eq!(Some(last), list.last());
        assert_eq!(Ok(None), list.prev(&first));
        assert_eq!(Ok(None), list.next(&last));
        continuity_test(&list);
    }

    /// This test adds three elements to the list and removes the middle,
    /// then the head node, to make sure the structure stays consistent
    /// throughout.
    #[test]
    fn head_removal() {
        let mut list = LinkedList::new();
        let a = list.push_back(0);
        let b = list.push_back(1);
        let c = list.push_back(2);

        assert_eq!(Ok(1), list.remove(&b));
        continuity_test(&list);
        assert_eq!(Ok(0), list.remove(&a));
        continuity_test(&list);
        assert_eq!(Ok(2), list.remove(&c));
        continuity_test(&list);
        assert!(list.is_empty());
    }

    /// As above, but removes the tail second.
    #[test]
    fn tail_removal() {
        let mut list = LinkedList::new();
        let a = list.push_back(0);
        let b = list.push_back(1);
        let c = list.push_back(2);

        assert_eq!(Ok(1), list.remove(&b));
        assert_eq!(Ok(2), list.remove(&c));
        continuity_test(&list);
        assert_eq!(Ok(0), list.remove(&a));
        continuity_test(&list);
    }

    #[test]
    fn removed_nodes_stay_dead_after_slot_reuse() {
        let mut list = LinkedList::new();
        let a = list.push_back(7);
        list.remove(&a).unwrap();

        // reuses the freed slot
        let b = list.push_back(8);
        assert_ne!(a, b);

        let detached = CollectionError::Ownership(OwnershipError::Detached);
        assert_eq!(Err(detached.clone()), list.get(&a));
        assert_eq!(Err(detached), list.remove(&a));
        assert_eq!(
            Err(CollectionError::Ownership(OwnershipError::Detached)),
            list.insert_after(&a, 9)
        );
        assert!(!list.contains_node(&a));
        assert_eq!(Ok(&8), list.get(&b));
    }

    #[test]
    fn try_style_handle_access() {
        let mut list = LinkedList::new();
        let a = list.push_back(1);
        let b = list.push_back(2);
        let other = LinkedList::new().push_back(1);

        assert_eq!(Some(&1), list.try_get(&a));
        *list.try_get_mut(&b).unwrap() = 20;
        assert_eq!(Ok(&20), list.get(&b));
        assert_eq!(Some(b), list.try_next(&a));
        assert_eq!(None, list.try_next(&b));
        assert_eq!(Some(a), list.try_prev(&b));
        assert_eq!(None, list.try_prev(&a));

        assert_eq!(None, list.try_get(&other));
        assert_eq!(None, list.try_remove(&other));
        assert_eq!(
            Err(CollectionError::Ownership(OwnershipError::Foreign)),
            list.remove(&other)
        );

        assert_eq!(Some(1), list.try_remove(&a));
        assert_eq!(None, list.try_remove(&a));
        assert_eq!(None, list.try_get_mut(&a));
        assert_eq!(None, list.try_next(&a));
        assert_eq!(
            Err(CollectionError::Ownership(OwnershipError::Detached)),
            list.next(&a)
        );
        assert_eq!(vec![20], list.to_vec());
    }

    #[test]
    fn clear_kills_every_handle() {
        let mut list: LinkedList<u32> = (0..3).collect();
        let first = list.first().unwrap();
        list.clear();
        list.push_back(0);

        assert_eq!(
            Err(CollectionError::Ownership(OwnershipError::Detached)),
            list.get(&first)
        );
    }

    #[test]
    fn foreign_handles_are_refused() {
        let mut a: LinkedList<u32> = (0..3).collect();
        let b = a.clone();
        let from_b = b.first().unwrap();

        assert_eq!(
            Err(CollectionError::Ownership(OwnershipError::Foreign)),
            a.remove(&from_b)
        );
        assert_eq!(3, a.len());
    }

    #[test]
    fn linear_search() {
        let list: LinkedList<u32> = vec![4, 5, 4, 6].into_iter().collect();
        let first_four = list.find(&4).unwrap();
        let last_four = list.find_last(&4).unwrap();

        assert_ne!(first_four, last_four);
        assert_eq!(Some(first_four), list.first());
        assert_eq!(Ok(Some(last_four)), list.next(&list.find(&5).unwrap()));
        assert!(list.contains(&6));
        assert_eq!(None, list.find(&9));
    }

    #[test]
    fn iter_mut_follows_list_order() {
        let mut list = LinkedList::new();
        let two = list.push_back(2);
        list.push_front(1);
        list.insert_after(&two, 3).unwrap();

        for (i, value) in list.iter_mut().enumerate() {
            *value *= 10 * (i as u32 + 1);
        }

        assert_eq!(vec![10, 40, 90], contents(&list));
    }

    #[test]
    fn cursor_walks_list_order_not_store_order() {
        let mut list = LinkedList::new();
        list.push_back('b');
        list.push_front('a');
        list.push_back('c');

        let seen: String = list.cursor().collect();
        assert_eq!("abc", seen);

        let mut cursor = list.detached_cursor();
        assert_eq!(Ok(true), cursor.advance(&list));
        list.pop_front();
        assert!(cursor.current(&list).is_err());
    }
}
