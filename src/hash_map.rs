//! A separately chained hash map.
//!
//! Keys are hashed with the map's [`BuildHasher`] and land in bucket
//! `hash % bucket_count`. Each bucket is a short Vec of entries scanned
//! linearly. Entries remember their hash, so a rehash never calls back into
//! the hasher: when the load factor (entries per bucket) goes over the
//! maximum, the bucket count doubles and every entry is dealt out again.
//!
//! Iteration walks bucket by bucket. That order is not part of the contract
//! and changes whenever the map rehashes.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops::Index;

use crate::dictionary::Dictionary;
use crate::error::{CollectionError, Result};
use crate::sequence::Sequence;
use crate::stamp::{Stamp, Tracker};

/// Rehash when `len / bucket_count` goes over this.
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.72;

/// Buckets in a map built without a capacity.
pub const DEFAULT_BUCKET_COUNT: usize = 8;

/// How many times larger the bucket array gets on each rehash.
pub const REHASH_FACTOR: usize = 2;

#[derive(Clone)]
struct Entry<K, V> {
    hash: u64,
    key: K,
    value: V,
}

type Bucket<K, V> = Vec<Entry<K, V>>;

fn validate_load_factor(max_load_factor: f32) -> Result<f32> {
    if max_load_factor.is_finite() && max_load_factor > 0.0 && max_load_factor <= 1.0 {
        Ok(max_load_factor)
    } else {
        Err(CollectionError::InvalidArgument(
            "max load factor must be in (0.0, 1.0]",
        ))
    }
}

/// The fewest buckets that hold `capacity` entries without going over
/// `max_load_factor`.
fn buckets_for(capacity: usize, max_load_factor: f32) -> usize {
    let needed = (capacity as f64 / max_load_factor as f64).ceil() as usize;
    needed.max(DEFAULT_BUCKET_COUNT)
}

fn empty_buckets<K, V>(count: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(count);
    buckets.resize_with(count, Vec::new);
    buckets
}

/// A hash map using separate chaining: each bucket is a small Vec of
/// entries, and an entry's bucket is its hash modulo the bucket count.
///
/// When an insert pushes the load factor over the maximum, the bucket count
/// doubles and every entry is dealt out again. Iteration order is whatever
/// the buckets happen to hold and changes across rehashes.
pub struct HashMap<K, V, S = RandomState> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    max_load_factor: f32,
    hash_builder: S,
    tracker: Tracker,
}

impl<K, V> HashMap<K, V, RandomState> {
    /// Makes an empty map with the default bucket count and load factor.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Makes a map that takes `capacity` entries before its first rehash.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }

    /// Makes a map that rehashes at a different load factor. Anything outside
    /// `(0.0, 1.0]` is refused with [`CollectionError::InvalidArgument`].
    pub fn with_max_load_factor(max_load_factor: f32) -> Result<Self> {
        let mut map = Self::new();
        map.set_max_load_factor(max_load_factor)?;
        Ok(map)
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Makes a new map which hashes keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Makes a new map with a specified capacity and hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            buckets: empty_buckets(buckets_for(capacity, DEFAULT_MAX_LOAD_FACTOR)),
            len: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hash_builder,
            tracker: Tracker::new(),
        }
    }

    /// The number of entries stored right now.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How many buckets the entries are spread over.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries per bucket right now.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.buckets.len() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// The hash builder this map was made with.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Changes the load factor the map rehashes at, rehashing straight away
    /// if the map is already over it.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<()> {
        self.max_load_factor = validate_load_factor(max_load_factor)?;
        let needed = buckets_for(self.len, self.max_load_factor);
        if needed > self.buckets.len() {
            self.rehash(needed);
        }
        Ok(())
    }

    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Deals every entry out into `new_count` fresh buckets.
    fn rehash(&mut self, new_count: usize) {
        log::trace!(
            "rehashing {} entries from {} to {} buckets",
            self.len,
            self.buckets.len(),
            new_count
        );

        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_count));
        for entry in old.into_iter().flatten() {
            let at = self.bucket_index(entry.hash);
            self.buckets[at].push(entry);
        }
        self.tracker.bump();
    }

    fn grow_if_overloaded(&mut self) {
        if self.load_factor() > self.max_load_factor {
            let grown = self.buckets.len().saturating_mul(REHASH_FACTOR);
            self.rehash(grown.max(buckets_for(self.len, self.max_load_factor)));
        }
    }

    /// Makes sure `additional` more entries fit without a rehash.
    pub fn reserve(&mut self, additional: usize) {
        let needed = buckets_for(self.len.saturating_add(additional), self.max_load_factor);
        if needed > self.buckets.len() {
            self.rehash(needed);
        }
    }

    /// Removes every entry. The bucket array keeps its size.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
        self.tracker.bump();
    }

    /// Keeps only the entries `keep` says yes to.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let before = self.len;
        for bucket in self.buckets.iter_mut() {
            bucket.retain_mut(|e| keep(&e.key, &mut e.value));
        }
        self.len = self.buckets.iter().map(Vec::len).sum();

        if self.len != before {
            self.tracker.bump();
        }
    }

    /// Unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Unspecified order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            remaining: self.len,
            buckets: self.buckets.iter_mut(),
            current: None,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// Copies the entries out, in iteration order.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn k_hash<Q>(&self, k: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(k)
    }

    /// `(bucket, slot)` of the entry for `k`.
    fn find<Q>(&self, hash: u64, k: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let at = self.bucket_index(hash);
        self.buckets[at]
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == k)
            .map(|slot| (at, slot))
    }

    /// Appends an entry for a key known not to be present.
    fn push_new(&mut self, hash: u64, k: K, v: V) {
        let at = self.bucket_index(hash);
        self.buckets[at].push(Entry {
            hash,
            key: k,
            value: v,
        });
        self.len += 1;
        self.tracker.bump();
        self.grow_if_overloaded();
    }

    /// Puts `v` at `k`, returning the value it replaced. Replacing an
    /// existing key's value is not a structural change.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        let hash = self.k_hash(&k);

        if let Some((at, slot)) = self.find(hash, &k) {
            return Some(std::mem::replace(&mut self.buckets[at][slot].value, v));
        }

        self.push_new(hash, k, v);
        None
    }

    /// Adds a new entry, failing with [`CollectionError::DuplicateKey`] if
    /// `k` is already present. The map is unchanged on failure.
    pub fn add(&mut self, k: K, v: V) -> Result<()> {
        let hash = self.k_hash(&k);

        if self.find(hash, &k).is_some() {
            return Err(CollectionError::DuplicateKey);
        }

        self.push_new(hash, k, v);
        Ok(())
    }

    pub fn try_add(&mut self, k: K, v: V) -> bool {
        self.add(k, v).is_ok()
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(k).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (at, slot) = self.find(self.k_hash(k), k)?;
        let entry = &self.buckets[at][slot];
        Some((&entry.key, &entry.value))
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (at, slot) = self.find(self.k_hash(k), k)?;
        Some(&mut self.buckets[at][slot].value)
    }

    /// Gets the value at `k` or fails with [`CollectionError::KeyNotFound`].
    pub fn at<Q>(&self, k: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(k).ok_or(CollectionError::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, k: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(k).ok_or(CollectionError::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(self.k_hash(k), k).is_some()
    }

    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (at, slot) = self.find(self.k_hash(k), k)?;
        let entry = self.buckets[at].remove(slot);
        self.len -= 1;
        self.tracker.bump();
        Some((entry.key, entry.value))
    }

    /// Removes the value at `k` or fails with
    /// [`CollectionError::KeyNotFound`].
    pub fn take<Q>(&mut self, k: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(k).ok_or(CollectionError::KeyNotFound)
    }
}

impl<K, V, S> Dictionary<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn insert(&mut self, k: K, v: V) -> Option<V> {
        HashMap::insert(self, k, v)
    }

    fn get(&self, k: &K) -> Option<&V> {
        HashMap::get(self, k)
    }

    fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        HashMap::get_mut(self, k)
    }

    fn remove(&mut self, k: &K) -> Option<V> {
        HashMap::remove(self, k)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn add(&mut self, k: K, v: V) -> Result<()> {
        HashMap::add(self, k, v)
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            max_load_factor: self.max_load_factor,
            hash_builder: self.hash_builder.clone(),
            tracker: Tracker::new(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `k` isn't present; use [`HashMap::at`] for a `Result`.
    fn index(&self, k: &Q) -> &V {
        match self.get(k) {
            Some(v) => v,
            None => panic!("{}", CollectionError::KeyNotFound),
        }
    }
}

pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Bucket<K, V>>,
    current: Option<std::slice::Iter<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K, V> {
    buckets: std::slice::IterMut<'a, Bucket<K, V>>,
    current: Option<std::slice::IterMut<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&e.key, &mut e.value));
            }
            self.current = Some(self.buckets.next()?.iter_mut());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }
}

pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.0.next().map(|(_, v)| v)
    }
}

pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Bucket<K, V>>,
    current: std::vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        loop {
            if let Some(e) = self.current.next() {
                return Some((e.key, e.value));
            }
            self.current = self.buckets.next()?.into_iter();
        }
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            buckets: self.buckets.into_iter(),
            current: Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Sequence for HashMap<K, V, S> {
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    type Position = (usize, usize);

    fn len(&self) -> usize {
        self.len
    }

    fn stamp(&self) -> Stamp {
        self.tracker.stamp()
    }

    fn first_position(&self) -> Option<(usize, usize)> {
        let at = self.buckets.iter().position(|b| !b.is_empty())?;
        Some((at, 0))
    }

    fn next_position(&self, (at, slot): (usize, usize)) -> Option<(usize, usize)> {
        if slot + 1 < self.buckets.get(at)?.len() {
            return Some((at, slot + 1));
        }

        let skip = self.buckets[at + 1..].iter().position(|b| !b.is_empty())?;
        Some((at + 1 + skip, 0))
    }

    fn item_at(&self, (at, slot): (usize, usize)) -> Option<(&K, &V)> {
        let entry = self.buckets.get(at)?.get(slot)?;
        Some((&entry.key, &entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::{HashMap, DEFAULT_BUCKET_COUNT};
    use crate::dictionary::Dictionary;
    use crate::error::{CollectionError, StateError};
    use crate::identity_hasher::BuildIdentityHasher;
    use crate::sequence::Sequence;

    fn identity_map() -> HashMap<u64, &'static str, BuildIdentityHasher> {
        HashMap::with_hasher(BuildIdentityHasher)
    }

    #[test]
    fn one_two_three() {
        let mut map = HashMap::new();
        assert_eq!(None, map.insert("One", 1));
        assert_eq!(None, map.insert("Two", 2));
        assert_eq!(Some(2), map.insert("Two", 22));
        assert_eq!(None, map.insert("Three", 3));

        assert_eq!(Some(&22), map.get("Two"));
        assert_eq!(3, map.len());

        let mut values: Vec<i32> = map.values().copied().collect();
        values.sort();
        assert_eq!(vec![1, 3, 22], values);
    }

    #[test]
    fn dual_api_for_keys() {
        let mut map: HashMap<String, u32> = HashMap::new();
        map.add("a".to_string(), 1).unwrap();

        assert_eq!(
            Err(CollectionError::DuplicateKey),
            map.add("a".to_string(), 2)
        );
        assert!(!map.try_add("a".to_string(), 3));
        assert_eq!(Some(&1), map.get("a"));

        assert_eq!(None, map.get("missing"));
        assert_eq!(Err(CollectionError::KeyNotFound), map.at("missing"));
        assert_eq!(Err(CollectionError::KeyNotFound), map.take("missing"));

        *map.at_mut("a").unwrap() += 10;
        assert_eq!(11, map["a"]);
        assert_eq!(Ok(11), map.take("a"));
        assert!(map.is_empty());
    }

    #[test]
    fn collisions_share_a_bucket() {
        let mut map = identity_map();
        let stride = DEFAULT_BUCKET_COUNT as u64;

        // 0, 8 and 16 all land in bucket 0
        map.insert(0, "zero");
        map.insert(stride, "eight");
        map.insert(2 * stride, "sixteen");
        assert_eq!(3, map.buckets[0].len());

        assert_eq!(Some("eight"), map.remove(&stride));
        assert_eq!(Some(&"zero"), map.get(&0));
        assert_eq!(Some(&"sixteen"), map.get(&(2 * stride)));
        assert_eq!(None, map.get(&stride));
        assert_eq!(2, map.len());
    }

    #[test]
    fn rehash_doubles_and_keeps_everything() {
        let mut map = identity_map();
        assert_eq!(8, map.bucket_count());

        for k in 0..5 {
            map.insert(k, "v");
        }
        assert_eq!(8, map.bucket_count());

        // 6 / 8 = 0.75 > 0.72
        map.insert(5, "v");
        assert_eq!(16, map.bucket_count());
        assert!(map.load_factor() <= map.max_load_factor());

        for k in 0..6 {
            assert!(map.contains_key(&k), "lost {} in rehash", k);
        }
    }

    #[test]
    fn load_factor_is_configurable() {
        assert_eq!(
            Err(CollectionError::InvalidArgument(
                "max load factor must be in (0.0, 1.0]"
            )),
            HashMap::<u8, u8>::with_max_load_factor(0.0).map(|_| ())
        );
        assert!(HashMap::<u8, u8>::with_max_load_factor(f32::NAN).is_err());
        assert!(HashMap::<u8, u8>::with_max_load_factor(1.5).is_err());

        let mut map = identity_map();
        for k in 0..6 {
            map.insert(k, "v");
        }
        // dropping the load factor rehashes straight away
        map.set_max_load_factor(0.25).unwrap();
        assert!(map.load_factor() <= 0.25);
        assert_eq!(6, map.len());
    }

    #[test]
    fn with_capacity_avoids_rehash() {
        let mut map: HashMap<u32, u32> = HashMap::with_capacity(100);
        let buckets = map.bucket_count();
        for k in 0..100 {
            map.insert(k, k);
        }
        assert_eq!(buckets, map.bucket_count());
    }

    #[test]
    fn retain_and_clear() {
        let mut map: HashMap<u32, u32> = (0..20).map(|k| (k, k * k)).collect();
        map.retain(|k, v| {
            *v += 1;
            k % 2 == 0
        });

        assert_eq!(10, map.len());
        assert_eq!(Some(&17), map.get(&4));
        assert_eq!(None, map.get(&3));

        let buckets = map.bucket_count();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(buckets, map.bucket_count());
        assert_eq!(0, map.iter().count());
    }

    #[test]
    fn trait_object_free_generic_use() {
        fn bump<D: Dictionary<&'static str, u32>>(d: &mut D, k: &'static str) {
            match d.get_mut(&k) {
                Some(v) => *v += 1,
                None => {
                    d.insert(k, 1);
                }
            }
        }

        let mut map = HashMap::new();
        bump(&mut map, "x");
        bump(&mut map, "x");
        bump(&mut map, "y");
        assert_eq!(Ok(&2), Dictionary::at(&map, &"x"));
        assert_eq!(
            Err(CollectionError::DuplicateKey),
            Dictionary::add(&mut map, "y", 5)
        );
    }

    #[test]
    fn cursor_sees_every_entry() {
        let mut map = identity_map();
        for k in [3, 11, 19, 4, 100] {
            map.insert(k, "v");
        }

        let mut keys: Vec<u64> = map.cursor().map(|(k, _)| *k).collect();
        keys.sort();
        assert_eq!(vec![3, 4, 11, 19, 100], keys);

        let mut cursor = map.detached_cursor();
        assert_eq!(Ok(true), cursor.advance(&map));
        map.remove(&100);
        assert_eq!(
            Err(CollectionError::InvalidState(StateError::Stale)),
            cursor.current(&map).map(|_| ())
        );
    }

    #[test]
    fn overwrite_keeps_cursors_valid() {
        let mut map = identity_map();
        map.insert(1, "a");
        let mut cursor = map.detached_cursor();
        map.insert(1, "b");
        assert_eq!(Ok(true), cursor.advance(&map));
        assert_eq!(Ok((&1, &"b")), cursor.current(&map));
    }
}
