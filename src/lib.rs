//! seq-hashmap: a single-threaded hash map with separate chaining, stable
//! handles, and deterministic insertion-ordered iteration.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average insert/find/remove plus an iteration order that
//!   depends only on the history of inserts and removals, never on hashing.
//! - Layers:
//!   - ElementStore<K, V>: `slotmap` arena that owns every pair, threaded
//!     into a doubly-linked order list. New pairs are linked at the head.
//!   - BucketTable: one chain of slot handles per bucket. The bucket count
//!     starts at one and only ever doubles.
//!   - HashPolicy<S>: the `BuildHasher` plus the maximum load factor.
//!   - RawSeqMap<K, V, S>: keeps store and table in lockstep (link, unlink,
//!     rehash, clear).
//!   - SeqHashMap<K, V, S>: public API with a debug-only reentrancy guard.
//!
//! Constraints
//! - At most one pair per key. Inserting a present key is rejected and the
//!   stored value is left alone.
//! - Every pair has exactly one bucket handle, in bucket
//!   `hash % bucket_count`. After any insert, `len / bucket_count` is at or
//!   under the configured maximum load factor.
//! - Handles are generational slot keys: removing one pair never disturbs
//!   the handle of another, and a stale handle never aliases a newer pair.
//!
//! Hasher and rehashing invariants
//! - Each pair stores its precomputed `u64` hash. Rehash, removal by handle
//!   and cloning use the stored hash, so `K: Hash` runs only when a key is
//!   looked up or first inserted.
//! - Rehash relocates handles between chains; pairs never move in memory
//!   and the iteration order is unaffected.
//!
//! Reentrancy policy
//! - `K: Hash`, `K: Eq` and default-value closures run inside a guarded
//!   section. Debug builds panic if that code re-enters the same map.
//!
//! Notes and non-goals
//! - Single-threaded: the map may move between threads but is `!Sync`.
//! - The bucket table never shrinks, including on `clear`.
//! - No serialization, no custom allocators.

mod bucket_table;
mod config;
mod element_store;
mod error;
mod hash_policy;
pub mod iter;
mod raw;
mod reentrancy;
mod seq_hash_map;
mod seq_hash_map_proptest;

// Public surface
pub use config::MapConfig;
pub use error::{ConfigError, KeyNotFound};
pub use seq_hash_map::{Handle, Insert, SeqHashMap};
