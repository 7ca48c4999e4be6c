//! BucketTable: separate chains of slot handles, one chain per bucket.

use slotmap::DefaultKey;

#[derive(Debug)]
pub(crate) struct BucketTable {
    buckets: Vec<Vec<DefaultKey>>,
}

impl BucketTable {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Self { buckets }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn chain(&self, bucket: usize) -> &[DefaultKey] {
        &self.buckets[bucket]
    }

    pub(crate) fn attach(&mut self, bucket: usize, slot: DefaultKey) {
        self.buckets[bucket].push(slot);
    }

    /// Drop `slot` from its chain. Chain order carries no meaning, so the
    /// last handle is swapped into the hole.
    pub(crate) fn detach(&mut self, bucket: usize, slot: DefaultKey) -> bool {
        let chain = &mut self.buckets[bucket];
        match chain.iter().position(|&s| s == slot) {
            Some(pos) => {
                chain.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn relocate(&mut self, from: usize, to: usize, slot: DefaultKey) -> bool {
        if !self.detach(from, slot) {
            return false;
        }
        self.attach(to, slot);
        true
    }

    /// Extend with empty buckets. Never shrinks.
    pub(crate) fn grow(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.buckets.len());
        self.buckets.resize_with(capacity, Vec::new);
    }

    /// Empty every chain, keeping the bucket count.
    pub(crate) fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
