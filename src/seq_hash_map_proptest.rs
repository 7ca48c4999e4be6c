#![cfg(test)]

// Property tests for SeqHashMap kept inside the crate so they can run the
// structural self-check after every operation.

use crate::{Handle, Insert, SeqHashMap};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, pool length
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    IndexOrDefault(usize),
    Remove(usize),
    RemoveHandle(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => idx.clone().prop_map(OpI::IndexOrDefault),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::RemoveHandle),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against the map and two models: a hashbrown map for
// content and a Vec (newest first) for iteration order.
fn run_scenario<S: BuildHasher>(
    mut sut: SeqHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut order: Vec<Key> = Vec::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                match sut.insert(k.clone(), v) {
                    Insert::Inserted(h) => {
                        prop_assert!(!model.contains_key(&k), "insert accepted a duplicate");
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k.clone(), v);
                        order.insert(0, k);
                    }
                    Insert::Occupied { handle, rejected } => {
                        prop_assert_eq!(live.get(&k), Some(&handle));
                        prop_assert_eq!(rejected, (k.clone(), v));
                        prop_assert_eq!(sut.get(&k), model.get(&k));
                    }
                }
            }
            OpI::IndexOrDefault(i) => {
                let k = key_from(pool, i);
                let got = *sut.get_or_insert_default(k.clone());
                match model.get(&k) {
                    Some(&mv) => {
                        prop_assert_eq!(got, mv);
                    }
                    None => {
                        prop_assert_eq!(got, 0);
                        model.insert(k.clone(), 0);
                        let h = sut.find(&k).expect("just inserted");
                        live.insert(k.clone(), h);
                        order.insert(0, k);
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k));
                if removed.is_some() {
                    order.retain(|o| *o != k);
                    stale.extend(live.remove(&k));
                }
                prop_assert!(sut.find(&k).is_none());
                prop_assert!(sut.at(&k).is_err());
            }
            OpI::RemoveHandle(i) => {
                let k = key_from(pool, i);
                if let Some(h) = live.remove(&k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert!(kk == k);
                    prop_assert_eq!(Some(vv), model.remove(&k));
                    order.retain(|o| *o != k);
                    stale.push(h);
                }
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let found = sut.find(&k);
                prop_assert_eq!(found, live.get(&k).copied());
                prop_assert_eq!(sut.at(&k).ok(), model.get(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(&h) = live.get(&k) {
                    let vr = h.value_mut(&mut sut).expect("live handle resolves");
                    *vr = vr.saturating_add(d);
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let keys: Vec<Key> = sut.keys().cloned().collect();
                prop_assert_eq!(&keys, &order);
                for (k, v) in sut.iter() {
                    prop_assert_eq!(Some(v), model.get(k));
                }
            }
            OpI::Clear => {
                let buckets = sut.bucket_count();
                sut.clear();
                prop_assert_eq!(sut.bucket_count(), buckets);
                model.clear();
                order.clear();
                stale.extend(live.drain().map(|(_, h)| h));
            }
        }

        sut.check_invariants();
        for &h in &stale {
            prop_assert!(h.value(&sut).is_none(), "stale handle resolved");
        }
        for (k, &h) in &live {
            prop_assert_eq!(h.key(&sut), Some(k));
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.iter().len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: state-machine equivalence with a hashbrown map plus an order model.
// - First insert wins; a rejected insert hands back the caller's pair.
// - Handles stay valid across rehash and unrelated removals; stale ones never resolve.
// - Iteration order is newest first, independent of hashing.
// - Every pair has exactly one bucket handle and the load factor stays in bounds.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(SeqHashMap::new(), &pool, ops)?;
    }
}

// Constant hasher: every key shares one chain, stressing equality probing.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(SeqHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Property: clone_from yields an equal, independent map with the same order.
proptest! {
    #[test]
    fn prop_clone_is_deep_and_ordered(pairs in proptest::collection::vec((0u16..64, any::<i32>()), 0..64)) {
        let src: SeqHashMap<u16, i32> = pairs.iter().copied().collect();
        let mut dst: SeqHashMap<u16, i32> = SeqHashMap::new();
        dst.insert(999, 1);
        dst.clone_from(&src);
        dst.check_invariants();
        prop_assert!(dst == src);
        let a: Vec<_> = src.iter().collect();
        let b: Vec<_> = dst.iter().collect();
        prop_assert_eq!(a, b);

        for v in dst.values_mut() {
            *v = v.wrapping_add(1);
        }
        if !src.is_empty() {
            prop_assert!(dst != src);
        }
        for (k, v) in &src {
            prop_assert_eq!(Some(v), pairs.iter().find(|(pk, _)| pk == k).map(|(_, pv)| pv));
        }
    }
}
