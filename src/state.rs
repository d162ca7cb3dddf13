//! Exported cache state.
//!
//! [`CacheState`] is the logical content of a cache: its bound and its entries
//! in insertion order. It never carries the writer lock or the published table
//! handle, so it can cross a process boundary through whatever serialization
//! the caller uses. With the `serde` feature it derives `Serialize` and
//! `Deserialize` and is encoded as
//!
//! ```text
//! { "bound": 2, "entries": [["b", 2], ["c", 3]] }
//! ```

extern crate alloc;

use crate::table::FifoTable;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

/// Bound and ordered entries of a cache, without any synchronization state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheState<K, V> {
    /// Maximum number of entries, `None` when unbounded.
    pub bound: Option<NonZeroUsize>,
    /// Entries from oldest to newest.
    pub entries: Vec<(K, V)>,
}

impl<K, V> CacheState<K, V> {
    /// Captures `table` as exported state.
    pub fn from_table<S>(bound: Option<NonZeroUsize>, table: &FifoTable<K, V, S>) -> Self
    where
        K: Clone,
        V: Clone,
    {
        CacheState {
            bound,
            entries: table.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Rebuilds the ordered table.
    ///
    /// No eviction is applied: exported state is trusted to be within its bound.
    pub fn into_table<S>(self, hash_builder: S) -> FifoTable<K, V, S>
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        let mut table = FifoTable::with_capacity_and_hasher(self.entries.len(), hash_builder);
        table.extend(self.entries);
        table
    }
}
