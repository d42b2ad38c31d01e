//! ChainDict: separate-chaining hash dictionary with a load-factor band.
//!
//! Storage is a plain `Vec` of buckets, each bucket a `Vec` of entries in
//! insertion order. Every entry carries the `u64` hash computed when it was
//! inserted; redistribution on resize indexes by the stored hash and never
//! re-invokes `K: Hash`, so no user code runs while the table is being
//! rebuilt.

use crate::key::DictKey;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::Flatten;
use core::mem;
use core::ops;
use core::slice;
use std::collections::hash_map::RandomState;
use std::vec;

/// Minimum (and initial) bucket-array length. `clear` returns the table to
/// this capacity and shrinking never goes below it.
pub const FLOOR_CAPACITY: usize = 8;

// Load-factor band, in tenths. Grow doubles capacity when an insert would
// push count/capacity above 0.7; shrink halves it when a removal leaves
// count/capacity below 0.3. Integer arithmetic keeps the thresholds exact.
const GROW_ABOVE_TENTHS: usize = 7;
const SHRINK_BELOW_TENTHS: usize = 3;

/// Error kinds for dictionary operations.
///
/// Validation happens before any structural change, so a returned error
/// means the dictionary is exactly as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DictError {
    /// An absent-sentinel key was supplied to an operation that requires a
    /// concrete key (see [`DictKey::is_absent`]).
    InvalidKey,
    /// `insert` was called with a key that is already present. `insert`
    /// never overwrites; `set` is the upsert path.
    DuplicateKey,
    /// `get`, `get_mut` or `update` was called with a key that is not
    /// present.
    KeyNotFound,
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DictError::InvalidKey => "absent key supplied where a concrete key is required",
            DictError::DuplicateKey => "key is already present",
            DictError::KeyNotFound => "key not found",
        })
    }
}

impl std::error::Error for DictError {}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

/// A separate-chaining hash dictionary.
///
/// Keys are unique across the whole table. `insert` rejects duplicates with
/// [`DictError::DuplicateKey`]; `set` is the insert-or-update path. Load
/// factor is kept within a band by inline full rehashes: capacity doubles
/// when an insert would push `len / capacity` above 0.7 and halves when a
/// removal leaves it below 0.3, never dropping under [`FLOOR_CAPACITY`].
/// The insert or removal that crosses a threshold therefore pays O(len);
/// costs are amortized O(1) over a sequence of calls, not per call.
///
/// Iteration order is bucket-index-major, insertion-order-minor. Order
/// within a bucket is stable, order across buckets is not meaningful and
/// changes on resize.
///
/// Single-threaded by contract and by type: the embedded reentrancy tracker
/// makes the dictionary `!Send`/`!Sync`.
pub struct ChainDict<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Vec<Entry<K, V>>>,
    count: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainDict<K, V>
where
    K: DictKey,
{
    /// Creates an empty dictionary with the default capacity of
    /// [`FLOOR_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Creates an empty dictionary with at least `capacity` buckets
    /// (clamped up to [`FLOOR_CAPACITY`]).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S> Default for ChainDict<K, V, S>
where
    K: DictKey,
    S: BuildHasher + Clone + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ChainDict<K, V, S>
where
    K: DictKey,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(FLOOR_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let capacity = capacity.max(FLOOR_CAPACITY);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self {
            hasher,
            buckets,
            count: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    // Bucket addressing. Hashes are unsigned, so a single remainder is the
    // whole position computation.
    fn slot(hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current bucket-array length. Always at least [`FLOOR_CAPACITY`].
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / capacity` ratio.
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Returns the value for `q`.
    ///
    /// Fails with `InvalidKey` for an absent-sentinel key and `KeyNotFound`
    /// for a missing one. No side effects either way.
    pub fn get<Q>(&self, q: &Q) -> Result<&V, DictError>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let _g = self.reentrancy.enter();
        if q.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(q);
        self.buckets[Self::slot(hash, self.capacity())]
            .iter()
            .find(|e| e.key.borrow() == q)
            .map(|e| &e.value)
            .ok_or(DictError::KeyNotFound)
    }

    /// Infallible lookup: `None` on a miss, and also `None` for an
    /// absent-sentinel key (same quirk as [`contains_key`](Self::contains_key)).
    pub fn try_get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let _g = self.reentrancy.enter();
        if q.is_absent() {
            return None;
        }
        let hash = self.make_hash(q);
        self.buckets[Self::slot(hash, self.capacity())]
            .iter()
            .find(|e| e.key.borrow() == q)
            .map(|e| &e.value)
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V, DictError>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let _g = self.reentrancy.enter();
        if q.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(q);
        let at = Self::slot(hash, self.buckets.len());
        self.buckets[at]
            .iter_mut()
            .find(|e| e.key.borrow() == q)
            .map(|e| &mut e.value)
            .ok_or(DictError::KeyNotFound)
    }

    /// Never fails: an absent-sentinel key reports `false` rather than
    /// `InvalidKey`. Deliberately asymmetric with `get`/`insert`.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        self.try_get(q).is_some()
    }

    /// Adds a new entry. Fails with `DuplicateKey` if the key is already
    /// present; this path never overwrites (use [`set`](Self::set) for
    /// upsert). A successful insert appends to the end of the key's bucket,
    /// growing the table first if the new entry would push the load factor
    /// above the band.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), DictError> {
        let _g = self.reentrancy.enter();
        if key.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(&key);
        let at = Self::slot(hash, self.buckets.len());
        if self.buckets[at].iter().any(|e| e.key == key) {
            return Err(DictError::DuplicateKey);
        }
        Self::push_entry(&mut self.buckets, &mut self.count, Entry { key, value, hash });
        Ok(())
    }

    /// Insert-or-update. Replaces the value in place when the key exists
    /// (returning the previous value, entry position unchanged) and behaves
    /// as [`insert`](Self::insert) otherwise.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, DictError> {
        let _g = self.reentrancy.enter();
        if key.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(&key);
        let at = Self::slot(hash, self.buckets.len());
        if let Some(e) = self.buckets[at].iter_mut().find(|e| e.key == key) {
            return Ok(Some(mem::replace(&mut e.value, value)));
        }
        Self::push_entry(&mut self.buckets, &mut self.count, Entry { key, value, hash });
        Ok(None)
    }

    /// Replaces the value of an existing entry, returning the old value.
    /// Fails with `KeyNotFound` when the key is absent from the table;
    /// never inserts. Count and entry position are unchanged.
    pub fn update<Q>(&mut self, q: &Q, value: V) -> Result<V, DictError>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let _g = self.reentrancy.enter();
        if q.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(q);
        let at = Self::slot(hash, self.buckets.len());
        match self.buckets[at].iter_mut().find(|e| e.key.borrow() == q) {
            Some(e) => Ok(mem::replace(&mut e.value, value)),
            None => Err(DictError::KeyNotFound),
        }
    }

    /// Removes the entry for `q`, returning its value, or `Ok(None)` when
    /// the key is not present (a miss is not an error). A removal that
    /// leaves the load factor below the band halves the capacity, down to
    /// the floor.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<Option<V>, DictError>
    where
        K: Borrow<Q>,
        Q: ?Sized + DictKey,
    {
        let _g = self.reentrancy.enter();
        if q.is_absent() {
            return Err(DictError::InvalidKey);
        }
        let hash = self.make_hash(q);
        let at = Self::slot(hash, self.buckets.len());
        let Some(pos) = self.buckets[at].iter().position(|e| e.key.borrow() == q) else {
            return Ok(None);
        };
        // Order-preserving removal; the rest of the chain keeps its
        // insertion order.
        let entry = self.buckets[at].remove(pos);
        self.count -= 1;
        let capacity = self.buckets.len();
        if self.count * 10 < capacity * SHRINK_BELOW_TENTHS && capacity / 2 >= FLOOR_CAPACITY {
            Self::redistribute(&mut self.buckets, capacity / 2);
        }
        Ok(Some(entry.value))
    }

    /// Discards every entry and returns the capacity to [`FLOOR_CAPACITY`].
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.buckets.clear();
        self.buckets.resize_with(FLOOR_CAPACITY, Vec::new);
        self.count = 0;
    }

    /// Clones every entry into `dst` starting at `offset`, in iteration
    /// order.
    ///
    /// Precondition: `dst.len() >= offset + self.len()`. This is a caller
    /// obligation, not a checked contract; a too-small destination panics
    /// on the out-of-bounds write.
    pub fn copy_into(&self, dst: &mut [(K, V)], offset: usize)
    where
        K: Clone,
        V: Clone,
    {
        for (i, (k, v)) in self.iter().enumerate() {
            dst[offset + i] = (k.clone(), v.clone());
        }
    }

    /// Lazy iterator over `(&K, &V)` in bucket-major, insertion-minor
    /// order. Restartable: each call starts from the beginning.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.buckets.iter().flatten(),
        }
    }

    /// Like [`iter`](Self::iter) with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            entries: self.buckets.iter_mut().flatten(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Materializes all keys into a `Vec`, in iteration order.
    pub fn keys_to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Materializes all values into a `Vec`, in iteration order.
    pub fn values_to_vec(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }

    // Appends an entry that is known not to duplicate an existing key,
    // growing first when the insert would leave the table above the band.
    fn push_entry(buckets: &mut Vec<Vec<Entry<K, V>>>, count: &mut usize, entry: Entry<K, V>) {
        let capacity = buckets.len();
        if (*count + 1) * 10 > capacity * GROW_ABOVE_TENTHS {
            Self::redistribute(buckets, capacity * 2);
        }
        let at = Self::slot(entry.hash, buckets.len());
        buckets[at].push(entry);
        *count += 1;
    }

    // Full rehash: rebuild the bucket array at `new_capacity` and move every
    // entry to its new slot. Indexing uses the stored hash, so `K: Hash`
    // never runs here. Each entry is drained exactly once and pushed exactly
    // once.
    fn redistribute(buckets: &mut Vec<Vec<Entry<K, V>>>, new_capacity: usize) {
        let mut fresh: Vec<Vec<Entry<K, V>>> = Vec::with_capacity(new_capacity);
        fresh.resize_with(new_capacity, Vec::new);
        for entry in buckets.drain(..).flatten() {
            fresh[Self::slot(entry.hash, new_capacity)].push(entry);
        }
        *buckets = fresh;
    }
}

impl<K, V, S> Clone for ChainDict<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            buckets: self.buckets.clone(),
            count: self.count,
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K, V, S> fmt::Debug for ChainDict<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.buckets.iter().flatten().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

/// Order-insensitive equality: same length and same key/value pairs.
impl<K, V, S> PartialEq for ChainDict<K, V, S>
where
    K: DictKey,
    V: PartialEq,
    S: BuildHasher + Clone + Default,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.try_get(k).map_or(false, |ov| ov == v))
    }
}

impl<K, V, S> Eq for ChainDict<K, V, S>
where
    K: DictKey,
    V: Eq,
    S: BuildHasher + Clone + Default,
{
}

/// Panicking lookup, matching `std::collections::HashMap`'s `Index`.
impl<K, Q, V, S> ops::Index<&Q> for ChainDict<K, V, S>
where
    K: DictKey + Borrow<Q>,
    Q: ?Sized + DictKey,
    S: BuildHasher + Clone + Default,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.try_get(key).expect("no entry found for key")
    }
}

/// Upsert semantics: later pairs replace earlier ones with the same key.
/// Absent-sentinel keys are skipped.
impl<K, V, S> Extend<(K, V)> for ChainDict<K, V, S>
where
    K: DictKey,
    S: BuildHasher + Clone + Default,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            let _ = self.set(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainDict<K, V, S>
where
    K: DictKey,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Self::with_hasher(S::default());
        dict.extend(iter);
        dict
    }
}

/// Iterator over `(&K, &V)` in bucket-major, insertion-minor order.
pub struct Iter<'a, K, V> {
    entries: Flatten<slice::Iter<'a, Vec<Entry<K, V>>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|e| (&e.key, &e.value))
    }
}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    entries: Flatten<slice::IterMut<'a, Vec<Entry<K, V>>>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|e| (&e.key, &mut e.value))
    }
}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    entries: Flatten<vec::IntoIter<Vec<Entry<K, V>>>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|e| (e.key, e.value))
    }
}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainDict<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        Iter {
            entries: self.buckets.iter().flatten(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainDict<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        IterMut {
            entries: self.buckets.iter_mut().flatten(),
        }
    }
}

impl<K, V, S> IntoIterator for ChainDict<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            entries: self.buckets.into_iter().flatten(),
        }
    }
}
