//! SeqHashMap: the public map, with stable handles and a debug reentrancy guard.

use crate::config::MapConfig;
use crate::error::{ConfigError, KeyNotFound};
use crate::hash_policy::HashPolicy;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::raw::RawSeqMap;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use log::debug;
use slotmap::DefaultKey;
use std::collections::hash_map::RandomState;

/// Stable identifier of one pair.
///
/// A handle keeps resolving to its pair across rehashes and across inserts
/// or removals of other keys. Once the pair is removed, the handle resolves
/// to `None` forever, even if its slot is later reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, K, V, S>(&self, map: &'a SeqHashMap<K, V, S>) -> Option<&'a K> {
        map.handle_key(*self)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a SeqHashMap<K, V, S>) -> Option<&'a V> {
        map.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut SeqHashMap<K, V, S>) -> Option<&'a mut V> {
        map.handle_value_mut(*self)
    }
}

/// Outcome of [`SeqHashMap::insert`].
///
/// Inserting an existing key never overwrites it: the caller gets the
/// existing pair's handle and the rejected key and value back.
#[derive(Debug)]
pub enum Insert<K, V> {
    Inserted(Handle),
    Occupied { handle: Handle, rejected: (K, V) },
}

impl<K, V> Insert<K, V> {
    /// Handle of the pair now stored under the key.
    pub fn handle(&self) -> Handle {
        match self {
            Insert::Inserted(h) => *h,
            Insert::Occupied { handle, .. } => *handle,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted(_))
    }
}

/// Hash map with separate chaining over a slot arena.
///
/// Iteration is deterministic: pairs come out most recently inserted first
/// (use `.rev()` for oldest first), independent of hashing.
///
/// ```
/// use seq_hashmap::SeqHashMap;
///
/// let mut m = SeqHashMap::new();
/// m.insert(1, "a");
/// m.insert(2, "b");
/// assert!(!m.insert(1, "z").is_inserted());
/// assert_eq!(m.at(&1), Ok(&"a"));
/// let order: Vec<_> = m.iter().rev().map(|(k, _)| *k).collect();
/// assert_eq!(order, [1, 2]);
/// ```
pub struct SeqHashMap<K, V, S = RandomState> {
    raw: RawSeqMap<K, V, S>,
    reentrancy: DebugReentrancy,
}

impl<K, V> SeqHashMap<K, V, RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, S: Default> Default for SeqHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> SeqHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(MapConfig::new(), hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            debug!("rejecting map config {:?}: {}", config, e);
            return Err(e);
        }
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: MapConfig, hasher: S) -> Self {
        Self {
            raw: RawSeqMap::new(
                HashPolicy::new(hasher, config.max_load_factor),
                config.initial_buckets,
            ),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.store.len()
    }
    pub fn is_empty(&self) -> bool {
        self.raw.store.is_empty()
    }

    /// The configured hash builder.
    pub fn hasher(&self) -> &S {
        self.raw.policy.hasher()
    }

    pub fn bucket_count(&self) -> usize {
        self.raw.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        self.raw.policy.max_load_factor()
    }

    /// Remove every pair. The bucket count is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        self.raw.clear();
    }

    /// Remove the pair `handle` refers to, if it is still live. Does not hash.
    pub fn remove_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        let _g = self.reentrancy.enter("remove_handle");
        self.raw.unlink(handle.raw_handle())
    }

    /// Keep only the pairs for which `keep` returns true, visiting them in
    /// iteration order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let _g = self.reentrancy.enter("retain");
        self.raw.retain(keep);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw.store)
    }

    /// Mutable iteration in the same order as [`iter`](Self::iter).
    ///
    /// Creating the iterator costs O(len) time and one allocation up front,
    /// even if only the first item is taken: every pair is split into
    /// `(&K, &mut V)` before the walk starts. Prefer [`get_mut`](Self::get_mut)
    /// or [`Handle::value_mut`] for a few values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.raw.store)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Same up-front O(len) cost as [`iter_mut`](Self::iter_mut).
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        let _g = self.reentrancy.enter("Handle::key");
        self.raw.store.get(h.raw_handle()).map(|n| &n.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        let _g = self.reentrancy.enter("Handle::value");
        self.raw.store.get(h.raw_handle()).map(|n| &n.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let _g = self.reentrancy.enter("Handle::value_mut");
        self.raw.store.get_mut(h.raw_handle()).map(|n| &mut n.value)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.raw.check_invariants();
    }
}

impl<K, V, S> SeqHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Build from `(key, value)` pairs; an earlier pair wins over a later
    /// one with the same key.
    pub fn from_iter_with_hasher<I>(iter: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut m = Self::with_hasher(hasher);
        m.extend(iter);
        m
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.raw.policy.hash(q);
        self.raw.locate(hash, q).map(Handle::new)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_key_value");
        let hash = self.raw.policy.hash(q);
        let slot = self.raw.locate(hash, q)?;
        self.raw.store.get(slot).map(|n| (&n.key, &n.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let hash = self.raw.policy.hash(q);
        let slot = self.raw.locate(hash, q)?;
        self.raw.store.get_mut(slot).map(|n| &mut n.value)
    }

    /// Checked lookup: `Err(KeyNotFound)` when the key is absent.
    pub fn at<Q>(&self, q: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(KeyNotFound)
    }

    /// Insert `key -> value` unless the key is already present.
    ///
    /// A present key keeps its value; the new pair is handed back in
    /// [`Insert::Occupied`]. New pairs go to the front of the iteration
    /// order. May grow the bucket table, which never moves stored pairs.
    pub fn insert(&mut self, key: K, value: V) -> Insert<K, V> {
        let _g = self.reentrancy.enter("insert");
        let hash = self.raw.policy.hash(&key);
        if let Some(slot) = self.raw.locate(hash, &key) {
            return Insert::Occupied {
                handle: Handle::new(slot),
                rejected: (key, value),
            };
        }
        Insert::Inserted(Handle::new(self.raw.link(key, value, hash)))
    }

    /// Value under `key`, inserting `default()` first if the key is absent.
    /// `default` only runs on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter("get_or_insert_with");
        let hash = self.raw.policy.hash(&key);
        let slot = match self.raw.locate(hash, &key) {
            Some(slot) => slot,
            None => {
                let value = default();
                self.raw.link(key, value, hash)
            }
        };
        &mut self.raw.store[slot].value
    }

    /// Value under `key`, inserting `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove_entry");
        let hash = self.raw.policy.hash(q);
        let slot = self.raw.locate(hash, q)?;
        self.raw.unlink(slot)
    }
}

impl<K, V, S> Clone for SeqHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut m = Self {
            raw: RawSeqMap::new(self.raw.policy.clone(), self.bucket_count()),
            reentrancy: DebugReentrancy::new(),
        };
        m.clone_from(self);
        m
    }

    /// Clear, then reinsert deep copies of `source`'s pairs in the same
    /// order. The bucket count only grows.
    fn clone_from(&mut self, source: &Self) {
        let _g = self.reentrancy.enter("clone_from");
        self.raw.clear();
        self.raw.policy = source.raw.policy.clone();
        for (_, node) in source.raw.store.links().rev() {
            self.raw
                .link(node.key.clone(), node.value.clone(), node.hash);
        }
    }
}

impl<K, V, S> fmt::Debug for SeqHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Map equality: same key set and equal values, regardless of order.
impl<K, V, S> PartialEq for SeqHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |o| *v == *o))
    }
}

impl<K, V, S> Eq for SeqHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for SeqHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is absent; see [`SeqHashMap::at`].
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for SeqHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for SeqHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iter_with_hasher(iter, S::default())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for SeqHashMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V, S> IntoIterator for SeqHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.raw.store)
    }
}

impl<'a, K, V, S> IntoIterator for &'a SeqHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut SeqHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
