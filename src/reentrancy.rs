//! Debug-only reentrancy guard for `SeqHashMap` entry points.
//!
//! Lookups, inserts and removals run user code (`K: Hash`, `K: Eq`,
//! default-value closures, `K`/`V: Clone`) while the element store and the
//! bucket table may briefly disagree. Each entry point opens a named
//! section; in debug builds, opening a second section on the same map
//! before the first closes panics and names both. Release builds compile
//! the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Tracks which map entry point, if any, is currently running.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Sync in every build profile, not only where the Cell exists.
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosync: PhantomData,
        }
    }

    /// Open the section named after the calling entry point, e.g. `"find"`.
    #[inline]
    pub(crate) fn enter(&self, section: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!(
                    "reentrancy detected: SeqHashMap::{section} called from user code inside SeqHashMap::{outer}"
                );
            }
            self.active.set(Some(section));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = section;
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes the section on drop, including during unwinding out of user code.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let closed = self.owner.active.take();
            debug_assert!(closed.is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn lookup_then_insert_sections_run_back_to_back() {
        let r = DebugReentrancy::new();
        drop(r.enter("find"));
        drop(r.enter("insert"));
        drop(r.enter("clone_from"));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(
        expected = "reentrancy detected: SeqHashMap::find called from user code inside SeqHashMap::insert"
    )]
    fn find_from_hash_during_insert_names_both_sections() {
        let r = DebugReentrancy::new();
        let _insert = r.enter("insert");
        let _find = r.enter("find");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn section_closes_when_default_closure_panics() {
        let r = DebugReentrancy::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = r.enter("get_or_insert_with");
            panic!("default value constructor failed");
        }));
        drop(r.enter("get_or_insert_with"));
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_sections_are_free_in_release() {
        let r = DebugReentrancy::new();
        let _outer = r.enter("insert");
        let _inner = r.enter("find");
    }
}
