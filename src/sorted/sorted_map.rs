use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::dictionary::Dictionary;
use crate::error::{CollectionError, Result};
use crate::sequence::Sequence;
use crate::stamp::{Stamp, Tracker};

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    height: u32,
    /// Nodes in the subtree rooted here, this one included.
    size: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            height: 1,
            size: 1,
            left: None,
            right: None,
        })
    }
}

fn height<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn size<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

/// A sorted dictionary on a height-balanced (AVL) binary search tree.
///
/// Insertion, removal and lookup are O(log n). Every node also tracks the size
/// of its subtree, so the entry at any sorted position is reachable in
/// O(log n) with [`nth`](SortedMap::nth).
pub struct SortedMap<K, V> {
    root: Link<K, V>,
    tracker: Tracker,
}

impl<K, V> SortedMap<K, V> {
    pub fn new() -> Self {
        SortedMap {
            root: None,
            tracker: Tracker::new(),
        }
    }

    /// The number of entries, read off the root in O(1).
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.tracker.bump();
    }

    /// The entry at sorted position `rank`.
    pub fn nth(&self, rank: usize) -> Option<(&K, &V)> {
        let mut rank = rank;
        let mut cur = self.root.as_deref();

        while let Some(node) = cur {
            let left = size(&node.left);
            match rank.cmp(&left) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    rank -= left + 1;
                    cur = node.right.as_deref();
                }
            }
        }

        None
    }

    /// The entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root.take()?;
        let (min, rest) = Self::take_min(root);
        self.root = rest;
        self.tracker.bump();
        Some((min.key, min.value))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root.take()?;
        let (max, rest) = Self::take_max(root);
        self.root = rest;
        self.tracker.bump();
        Some((max.key, max.value))
    }

    /// Ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len(),
        };
        iter.descend(self.root.as_deref());
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn update(node: &mut Node<K, V>) {
        node.height = 1 + height(&node.left).max(height(&node.right));
        node.size = 1 + size(&node.left) + size(&node.right);
    }

    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.left.take() {
            None => node,
            Some(mut pivot) => {
                node.left = pivot.right.take();
                Self::update(&mut node);
                pivot.right = Some(node);
                Self::update(&mut pivot);
                pivot
            }
        }
    }

    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.right.take() {
            None => node,
            Some(mut pivot) => {
                node.right = pivot.left.take();
                Self::update(&mut node);
                pivot.left = Some(node);
                Self::update(&mut pivot);
                pivot
            }
        }
    }

    /// Restores the AVL property at `node`, assuming both subtrees have it
    /// and differ in height by at most two.
    fn rebalance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::update(&mut node);
        let (lh, rh) = (height(&node.left), height(&node.right));

        if lh > rh + 1 {
            if let Some(left) = node.left.take() {
                // Left-right case.
                node.left = Some(if height(&left.right) > height(&left.left) {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            Self::rotate_right(node)
        } else if rh > lh + 1 {
            if let Some(right) = node.right.take() {
                // Right-left case.
                node.right = Some(if height(&right.left) > height(&right.right) {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            Self::rotate_left(node)
        } else {
            node
        }
    }

    /// Detaches the smallest node of a subtree, returning it and what is
    /// left of the subtree.
    fn take_min(mut node: Box<Node<K, V>>) -> (Box<Node<K, V>>, Link<K, V>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (node, rest)
            }
            Some(left) => {
                let (min, rest) = Self::take_min(left);
                node.left = rest;
                (min, Some(Self::rebalance(node)))
            }
        }
    }

    fn take_max(mut node: Box<Node<K, V>>) -> (Box<Node<K, V>>, Link<K, V>) {
        match node.right.take() {
            None => {
                let rest = node.left.take();
                (node, rest)
            }
            Some(right) => {
                let (max, rest) = Self::take_max(right);
                node.right = rest;
                (max, Some(Self::rebalance(node)))
            }
        }
    }
}

impl<K: Ord, V> SortedMap<K, V> {
    /// Puts `v` at `k`, returning the value it replaced.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        let (root, old) = Self::insert_rec(self.root.take(), k, v);
        self.root = Some(root);
        if old.is_none() {
            self.tracker.bump();
        }
        old
    }

    fn insert_rec(link: Link<K, V>, k: K, v: V) -> (Box<Node<K, V>>, Option<V>) {
        match link {
            None => (Node::new(k, v), None),
            Some(mut node) => match k.cmp(&node.key) {
                Ordering::Equal => {
                    let old = std::mem::replace(&mut node.value, v);
                    (node, Some(old))
                }
                Ordering::Less => {
                    let (left, old) = Self::insert_rec(node.left.take(), k, v);
                    node.left = Some(left);
                    (Self::rebalance(node), old)
                }
                Ordering::Greater => {
                    let (right, old) = Self::insert_rec(node.right.take(), k, v);
                    node.right = Some(right);
                    (Self::rebalance(node), old)
                }
            },
        }
    }

    /// Adds a new entry, failing with [`CollectionError::DuplicateKey`] if
    /// `k` is already present.
    pub fn add(&mut self, k: K, v: V) -> Result<()> {
        if self.contains_key(&k) {
            return Err(CollectionError::DuplicateKey);
        }

        self.insert(k, v);
        Ok(())
    }

    pub fn try_add(&mut self, k: K, v: V) -> bool {
        self.add(k, v).is_ok()
    }

    fn find<Q>(&self, k: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root.as_deref();

        while let Some(node) = cur {
            match k.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
            }
        }

        None
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(k).map(|node| &node.value)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(k).map(|node| (&node.key, &node.value))
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root.as_deref_mut();

        while let Some(node) = cur {
            match k.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
            }
        }

        None
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
        self.find(k).is_some()
    }

    /// The sorted position of `k`.
    pub fn rank_of<Q>(&self, k: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut rank = 0;
        let mut cur = self.root.as_deref();

        while let Some(node) = cur {
            match k.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(rank + size(&node.left)),
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => {
                    rank += size(&node.left) + 1;
                    cur = node.right.as_deref();
                }
            }
        }

        None
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
        let removed = Self::remove_rec(&mut self.root, k);
        if removed.is_some() {
            self.tracker.bump();
        }
        removed
    }

    fn remove_rec<Q>(link: &mut Link<K, V>, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = link.take()?;

        match k.cmp(node.key.borrow()) {
            Ordering::Less => {
                let removed = Self::remove_rec(&mut node.left, k);
                *link = Some(Self::rebalance(node));
                removed
            }
            Ordering::Greater => {
                let removed = Self::remove_rec(&mut node.right, k);
                *link = Some(Self::rebalance(node));
                removed
            }
            Ordering::Equal => {
                let Node {
                    key,
                    value,
                    left,
                    right,
                    ..
                } = *node;

                *link = match (left, right) {
                    (None, rest) | (rest, None) => rest,
                    (left, Some(right)) => {
                        let (mut successor, rest) = Self::take_min(right);
                        successor.left = left;
                        successor.right = rest;
                        Some(Self::rebalance(successor))
                    }
                };

                Some((key, value))
            }
        }
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

impl<K: Ord, V> Dictionary<K, V> for SortedMap<K, V> {
    fn insert(&mut self, k: K, v: V) -> Option<V> {
        SortedMap::insert(self, k, v)
    }

    fn get(&self, k: &K) -> Option<&V> {
        SortedMap::get(self, k)
    }

    fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        SortedMap::get_mut(self, k)
    }

    fn remove(&mut self, k: &K) -> Option<V> {
        SortedMap::remove(self, k)
    }

    fn clear(&mut self) {
        SortedMap::clear(self)
    }

    fn len(&self) -> usize {
        size(&self.root)
    }
}

/// In-order walk over a [`SortedMap`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn descend(&mut self, mut cur: Option<&'a Node<K, V>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Drains a [`SortedMap`] in ascending key order.
pub struct IntoIter<K, V>(SortedMap<K, V>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.0.pop_last()
    }
}

impl<K, V> IntoIterator for SortedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter(self)
    }
}

impl<'a, K, V> IntoIterator for &'a SortedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for SortedMap<K, V> {
    fn clone(&self) -> Self {
        fn copy<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
            link.as_ref().map(|node| {
                Box::new(Node {
                    key: node.key.clone(),
                    value: node.value.clone(),
                    height: node.height,
                    size: node.size,
                    left: copy(&node.left),
                    right: copy(&node.right),
                })
            })
        }

        SortedMap {
            root: copy(&self.root),
            tracker: Tracker::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for SortedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedMap<K, V> {
    /// Later duplicates overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SortedMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for SortedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, Q, V> Index<&Q> for SortedMap<K, V>
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

impl<K, V> Sequence for SortedMap<K, V> {
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    /// Sorted rank.
    type Position = usize;

    fn len(&self) -> usize {
        size(&self.root)
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<usize> {
        self.root.as_ref().map(|_| 0)
    }

    fn next_position(&self, position: usize) -> Option<usize> {
        Some(position + 1).filter(|&next| next < size(&self.root))
    }

    fn item_at(&self, position: usize) -> Option<(&K, &V)> {
        self.nth(position)
    }
}
