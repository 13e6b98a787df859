//! HashMap: separate chaining over a power-of-two bucket array.
//!
//! Each bucket slot is either empty or owns a [`LinkedList`] of entries. Entries keep the hash
//! they were inserted with, so growing the table never rehashes a key: every old bucket `i` is
//! split between new buckets `i` and `i + old_capacity` on the single hash bit that the wider
//! mask exposes.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::slice;

use ahash::RandomState;

use crate::darray::DArray;
use crate::error::{try_reserve, Error, Result};
use crate::linkedlist::{self, LinkedList};

// ================================================================================================
// CONSTANTS
// ================================================================================================

/// Bucket count of a map built with [`HashMap::new`]
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor for determining when to resize
pub const LOAD_FACTOR: f64 = 0.75;

// ================================================================================================
// INTERNAL DATA STRUCTURES
// ================================================================================================

/// Entry in a bucket containing hash, key, and value
struct MapEntry<K, V> {
    hash: u64,
    key: K,
    value: V,
}

type Bucket<K, V> = LinkedList<MapEntry<K, V>>;

// ================================================================================================
// MAIN HASHMAP STRUCTURE
// ================================================================================================

/// Hash map with chained buckets and split-rehash doubling.
pub struct HashMap<K, V, S = RandomState> {
    buckets: DArray<Bucket<K, V>>,
    size: usize,
    min_capacity: usize,
    load_factor: f64,
    hasher: S,
}

// ================================================================================================
// HASHMAP CONSTRUCTORS
// ================================================================================================

impl<K, V> HashMap<K, V, RandomState> {
    /// Create an empty map with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create an empty map with `capacity` buckets.
    ///
    /// `capacity` must be a positive power of two. It is also the size [`clear`](HashMap::clear)
    /// shrinks back to.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Create an empty map with [`DEFAULT_CAPACITY`] buckets using the provided hasher.
    ///
    /// Changing the hasher on an existing map is not supported because it would invalidate
    /// the stored hashes.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            buckets: empty_slots(DEFAULT_CAPACITY),
            size: 0,
            min_capacity: DEFAULT_CAPACITY,
            load_factor: LOAD_FACTOR,
            hasher,
        }
    }

    /// Create an empty map with `capacity` buckets and the provided hasher.
    ///
    /// Fails with [`Error::InvalidCapacity`] unless `capacity` is a positive power of two, and
    /// with [`Error::Alloc`] if the bucket array cannot be reserved.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if !capacity.is_power_of_two() {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            buckets: DArray::from_slots(try_empty_slots(capacity)?),
            size: 0,
            min_capacity: capacity,
            load_factor: LOAD_FACTOR,
            hasher,
        })
    }

    /// Replace the load factor that triggers doubling. Must be in `(0, 1]`.
    ///
    /// Meant to be chained right after construction; the factor is fixed from then on.
    pub fn with_load_factor(mut self, load_factor: f64) -> Result<Self> {
        if !(load_factor > 0.0 && load_factor <= 1.0) {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        self.load_factor = load_factor;
        Ok(self)
    }

    /// Returns the number of key-value pairs in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets. Always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// The load factor that triggers doubling.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// The map's `BuildHasher`.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Removes all key-value pairs and shrinks back to the capacity the map was created with.
    pub fn clear(&mut self) {
        tracing::trace!(size = self.size, capacity = self.capacity(), "clearing map");
        self.buckets = empty_slots(self.min_capacity);
        self.size = 0;
    }

    /// Returns an iterator over the key-value pairs in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.buckets.slots().iter(),
            chain: None,
            remaining: self.size,
        }
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            remaining: self.size,
            slots: self.buckets.slots_mut().iter_mut(),
            chain: None,
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Calls `f` on every entry until it returns an error, which is passed back to the caller.
    pub fn traverse<E, F>(&self, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(&K, &V) -> std::result::Result<(), E>,
    {
        for (key, value) in self.iter() {
            f(key, value)?;
        }
        Ok(())
    }
}

// ================================================================================================
// PUBLIC API METHODS
// ================================================================================================

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    /// Inserts a key-value pair into the map.
    ///
    /// If an equal key is present its value is replaced and the old value returned; the stored
    /// key is kept and `key` is dropped. Otherwise the pair is added and `Ok(None)` returned.
    /// Adding a key that would bring the map to its load factor doubles the bucket array
    /// first; if that fails the error is returned and the map is left as it was.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let hash = self.hash_of(&key);
        let idx = bucket_index(hash, self.capacity());
        if let Some(entry) = self
            .buckets
            .get_mut(idx)
            .and_then(|bucket| bucket.find_mut(|e| e.hash == hash && e.key == key))
        {
            return Ok(Some(std::mem::replace(&mut entry.value, value)));
        }
        self.insert_new(hash, key, value)?;
        Ok(None)
    }

    /// Returns the value for `key`, inserting `f()` first if the key is absent.
    ///
    /// The flag is true when the key was already present.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, f: F) -> Result<(&mut V, bool)> {
        let hash = self.hash_of(&key);
        // growing is only needed when the key turns out to be new
        if self.needs_expand() && self.find_hashed(hash, &key).is_none() {
            self.grow_for_one()?;
        }

        let idx = bucket_index(hash, self.capacity());
        let bucket = self.buckets.get_or_insert_with(idx, LinkedList::new)?;
        match bucket.find_mut_or_vacant(|e| e.hash == hash && e.key == key) {
            Ok(entry) => Ok((&mut entry.value, true)),
            Err(bucket) => {
                let entry = bucket.push_mut(MapEntry {
                    hash,
                    key,
                    value: f(),
                });
                self.size += 1;
                Ok((&mut entry.value, false))
            }
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// Stored hashes are compared before keys, so equality only runs on real candidates.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_entry(key).map(|e| &e.value)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_entry(key).map(|e| (&e.key, &e.value))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_of(key);
        let idx = bucket_index(hash, self.capacity());
        self.buckets
            .get_mut(idx)?
            .find_mut(|e| e.hash == hash && e.key.borrow() == key)
            .map(|e| &mut e.value)
    }

    /// Check whether the given key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_entry(key).is_some()
    }

    /// Removes `key` and hands its value back. The stored key is dropped.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_of(key);
        let idx = bucket_index(hash, self.capacity());
        let bucket = self.buckets.get_mut(idx)?;
        let pos = bucket.position(|e| e.hash == hash && e.key.borrow() == key)?;
        let entry = bucket.remove(pos)?;
        if bucket.is_empty() {
            self.buckets.remove(idx);
        }
        self.size -= 1;
        Some(entry.value)
    }

    /// Removes `key` and drops both the stored key and its value.
    ///
    /// Returns whether the key was found.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }

    // ============================================================================================
    // INTERNAL HELPERS
    // ============================================================================================

    #[inline(always)]
    fn hash_of<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        spread(self.hasher.hash_one(key))
    }

    #[inline(always)]
    fn find_entry<Q>(&self, key: &Q) -> Option<&MapEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_hashed(self.hash_of(key), key)
    }

    #[inline(always)]
    fn find_hashed<Q>(&self, hash: u64, key: &Q) -> Option<&MapEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.buckets
            .get(bucket_index(hash, self.capacity()))?
            .find(|e| e.hash == hash && e.key.borrow() == key)
    }

    #[inline(always)]
    fn needs_expand(&self) -> bool {
        (self.size + 1) as f64 >= self.load_factor * self.capacity() as f64
    }

    /// Double until one more entry fits under the load factor.
    fn grow_for_one(&mut self) -> Result<()> {
        while self.needs_expand() {
            self.expand()?;
        }
        Ok(())
    }

    /// Add an entry for a key known to be absent, growing first if the load factor requires it.
    fn insert_new(&mut self, hash: u64, key: K, value: V) -> Result<()> {
        self.grow_for_one()?;
        let idx = bucket_index(hash, self.capacity());
        self.buckets
            .get_or_insert_with(idx, LinkedList::new)?
            .push(MapEntry { hash, key, value });
        self.size += 1;
        Ok(())
    }

    /// Double the bucket array and split every chain between its two successor slots.
    ///
    /// The new array is reserved before any entry moves, so failure leaves the map intact.
    fn expand(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let Some(new_capacity) = old_capacity.checked_mul(2) else {
            tracing::error!(old_capacity, size = self.size, "bucket array cannot double");
            return Err(Error::CapacityOverflow(old_capacity));
        };
        let mut slots = try_empty_slots(new_capacity)?;

        let split_bit = old_capacity as u64;
        for (i, slot) in self.buckets.slots_mut().iter_mut().enumerate() {
            let Some(chain) = slot.take() else {
                continue;
            };
            let (low, high) = chain.partition(|e| e.hash & split_bit == 0);
            if !low.is_empty() {
                slots[i] = Some(low);
            }
            if !high.is_empty() {
                slots[i + old_capacity] = Some(high);
            }
        }
        self.buckets = DArray::from_slots(slots);

        tracing::debug!(old_capacity, new_capacity, size = self.size, "expanded bucket array");
        Ok(())
    }
}

// ================================================================================================
// STANDARD TRAIT IMPLEMENTATIONS
// ================================================================================================

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// ================================================================================================
// UTILITY FUNCTIONS
// ================================================================================================

/// Fold the high half of the hash into the low half, where the bucket mask reads.
#[inline(always)]
fn spread(hash: u64) -> u64 {
    hash ^ (hash >> 32)
}

#[inline(always)]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash as usize) & (capacity - 1)
}

fn try_empty_slots<T>(capacity: usize) -> Result<Vec<Option<T>>> {
    let mut slots = Vec::new();
    try_reserve(&mut slots, capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

fn empty_slots<T>(capacity: usize) -> DArray<T> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    DArray::from_slots(slots)
}

// ================================================================================================
// ITERATOR IMPLEMENTATIONS
// ================================================================================================

/// Iterator over the key-value pairs of a HashMap
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Option<Bucket<K, V>>>,
    chain: Option<linkedlist::Iter<'a, MapEntry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            if let Some(bucket) = self.slots.next()? {
                self.chain = Some(bucket.iter());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the key-value pairs of a HashMap with mutable values
pub struct IterMut<'a, K, V> {
    slots: slice::IterMut<'a, Option<Bucket<K, V>>>,
    chain: Option<linkedlist::IterMut<'a, MapEntry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((&entry.key, &mut entry.value));
            }
            if let Some(bucket) = self.slots.next()? {
                self.chain = Some(bucket.iter_mut());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Iterator over the keys of a HashMap
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over the values of a HashMap
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over mutable references to the values of a HashMap
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
