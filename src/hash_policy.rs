//! Hash policy: the hasher plus the load-factor growth rule.

use core::hash::{BuildHasher, Hash};
use core::mem::size_of;
use slotmap::DefaultKey;

/// Largest bucket count a `Vec` of chains can hold.
pub(crate) const MAX_BUCKETS: usize = isize::MAX as usize / size_of::<Vec<DefaultKey>>();

#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

#[derive(Clone, Debug)]
pub(crate) struct HashPolicy<S> {
    hasher: S,
    max_load_factor: f32,
}

impl<S> HashPolicy<S> {
    pub(crate) fn new(hasher: S, max_load_factor: f32) -> Self {
        Self {
            hasher,
            max_load_factor,
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    pub(crate) fn exceeds(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 > f64::from(self.max_load_factor)
    }

    /// Smallest `capacity * 2^n` that brings `len` back under the limit,
    /// stopping at `MAX_BUCKETS`.
    pub(crate) fn grown_capacity(&self, len: usize, capacity: usize) -> usize {
        let mut c = capacity;
        while self.exceeds(len, c) && c < MAX_BUCKETS {
            c = c.saturating_mul(2).min(MAX_BUCKETS);
        }
        c
    }
}

impl<S: BuildHasher> HashPolicy<S> {
    pub(crate) fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    #[test]
    fn unit_load_doubles_once_per_breach() {
        let p = HashPolicy::new(RandomState::new(), 1.0);
        assert_eq!(p.grown_capacity(1, 1), 1);
        assert_eq!(p.grown_capacity(2, 1), 2);
        assert_eq!(p.grown_capacity(3, 2), 4);
        assert_eq!(p.grown_capacity(4, 4), 4);
        assert_eq!(p.grown_capacity(5, 4), 8);
    }

    #[test]
    fn small_load_factor_doubles_repeatedly() {
        let p = HashPolicy::new(RandomState::new(), 0.25);
        assert_eq!(p.grown_capacity(1, 1), 4);
        assert_eq!(p.grown_capacity(3, 8), 16);
    }

    #[test]
    fn growth_stops_at_bucket_cap() {
        let p = HashPolicy::new(RandomState::new(), 1e-30);
        assert_eq!(p.grown_capacity(1, 1), MAX_BUCKETS);
        assert_eq!(p.grown_capacity(2, MAX_BUCKETS), MAX_BUCKETS);
    }

    #[test]
    fn bucket_index_is_modulo() {
        assert_eq!(bucket_index(10, 4), 2);
        assert_eq!(bucket_index(u64::MAX, 1), 0);
    }

    #[test]
    fn hash_is_stable_per_builder() {
        let p = HashPolicy::new(RandomState::new(), 1.0);
        assert_eq!(p.hash("k"), p.hash(&"k".to_string()[..]));
    }
}
