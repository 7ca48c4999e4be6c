//! RawSeqMap: keeps the element store and bucket table in lockstep.
//!
//! Every live pair owns exactly one handle, filed in bucket
//! `hash % bucket_count`. Nothing here calls `K: Hash`; indexing always
//! uses the hash stored next to the pair. `K: Eq` runs only in `locate`.

use crate::bucket_table::BucketTable;
use crate::element_store::ElementStore;
use crate::hash_policy::{bucket_index, HashPolicy};
use core::borrow::Borrow;
use log::trace;
use slotmap::DefaultKey;

#[derive(Debug)]
pub(crate) struct RawSeqMap<K, V, S> {
    pub(crate) policy: HashPolicy<S>,
    pub(crate) store: ElementStore<K, V>,
    pub(crate) table: BucketTable,
}

impl<K, V, S> RawSeqMap<K, V, S> {
    pub(crate) fn new(policy: HashPolicy<S>, buckets: usize) -> Self {
        Self {
            policy,
            store: ElementStore::new(),
            table: BucketTable::new(buckets),
        }
    }

    pub(crate) fn locate<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = bucket_index(hash, self.table.capacity());
        self.table.chain(bucket).iter().copied().find(|&slot| {
            self.store
                .get(slot)
                .map(|n| n.hash == hash && n.key.borrow() == q)
                .unwrap_or(false)
        })
    }

    /// Link a pair known to be absent, then grow if the load limit broke.
    pub(crate) fn link(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let slot = self.store.push_front(key, value, hash);
        self.table
            .attach(bucket_index(hash, self.table.capacity()), slot);
        self.grow_if_needed();
        slot
    }

    pub(crate) fn unlink(&mut self, slot: DefaultKey) -> Option<(K, V)> {
        let node = self.store.unlink(slot)?;
        let detached = self
            .table
            .detach(bucket_index(node.hash, self.table.capacity()), slot);
        debug_assert!(detached, "pair had no bucket handle");
        Some((node.key, node.value))
    }

    /// Double the bucket count until the load limit holds again, then move
    /// each handle whose bucket changed. Pairs themselves stay put.
    fn grow_if_needed(&mut self) {
        let old = self.table.capacity();
        let new = self.policy.grown_capacity(self.store.len(), old);
        if new == old {
            return;
        }
        self.table.grow(new);
        let mut moved = 0usize;
        for (slot, node) in self.store.links() {
            let from = bucket_index(node.hash, old);
            let to = bucket_index(node.hash, new);
            if from != to {
                let found = self.table.relocate(from, to, slot);
                debug_assert!(found, "pair missing from its bucket during rehash");
                moved += 1;
            }
        }
        trace!(
            "rehash: {} -> {} buckets, relocated {} of {} handles",
            old,
            new,
            moved,
            self.store.len()
        );
    }

    pub(crate) fn clear(&mut self) {
        trace!(
            "clear: dropping {} pairs, keeping {} buckets",
            self.store.len(),
            self.table.capacity()
        );
        self.table.clear();
        self.store.clear();
    }

    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cursor = self.store.head();
        while let Some(slot) = cursor {
            let node = &mut self.store[slot];
            cursor = node.next;
            if !keep(&node.key, &mut node.value) {
                self.unlink(slot);
            }
        }
    }

    /// Structural self-check used by tests.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let cap = self.table.capacity();
        assert!(cap >= 1, "bucket table must never be empty");
        assert_eq!(self.table.handle_count(), self.store.len());
        assert_eq!(self.store.links().count(), self.store.len());
        assert_eq!(self.store.links().rev().count(), self.store.len());
        assert!(
            !self.policy.exceeds(self.store.len(), cap),
            "load factor {} over limit {}",
            self.store.len() as f64 / cap as f64,
            self.policy.max_load_factor()
        );
        for (slot, node) in self.store.links() {
            let chain = self.table.chain(bucket_index(node.hash, cap));
            assert_eq!(chain.iter().filter(|&&s| s == slot).count(), 1);
        }
    }
}
