//! Insertion-Ordered FIFO Table
//!
//! [`FifoTable`] is the ordered mapping that backs every published version of an
//! [`RcuCache`](crate::RcuCache). It pairs a hash index with an index-linked
//! list so that the oldest entry is always at the front of the list.
//!
//! # Ordering Rules
//!
//! - New keys are appended at the back.
//! - Re-inserting an existing key replaces its value **in place**; the entry
//!   keeps its original position (upsert, not move-to-end).
//! - Eviction always takes the front entry (first in, first out).
//!
//! ```text
//!   oldest                                   newest
//!   ┌─────┐    ┌─────┐    ┌─────┐    ┌─────┐
//!   │  a  │◀──▶│  b  │◀──▶│  c  │◀──▶│  d  │      insert("b", ..) keeps b here
//!   └─────┘    └─────┘    └─────┘    └─────┘
//!      ▲
//!      └── pop_oldest() / evict_to(bound)
//! ```
//!
//! # Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get` / `insert` / `remove` | O(1) average |
//! | `pop_oldest` / `pop_newest` | O(1) |
//! | `clone` | O(n) |
//!
//! # Thread Safety
//!
//! `FifoTable` itself is a plain single-threaded container. The RCU cache never
//! mutates a table after publishing it; it clones, mutates the clone, and swaps
//! the clone in.
//!
//! # Example
//!
//! ```
//! use rcu_cache::FifoTable;
//!
//! let mut table: FifoTable<&str, i32> = FifoTable::new();
//! table.insert("a", 1);
//! table.insert("b", 2);
//! table.insert("a", 10);
//!
//! let order: Vec<_> = table.iter().collect();
//! assert_eq!(order, [(&"a", &10), (&"b", &2)]);
//!
//! assert_eq!(table.pop_oldest(), Some(("a", 10)));
//! ```

extern crate alloc;

use crate::list::{self, List};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// An insertion-ordered map with FIFO eviction.
///
/// The hash index maps each key to the slab slot holding its entry in the
/// ordering list. Keys are stored in both structures, hence the `K: Clone`
/// bound on insertion.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`, and `Clone` to insert.
/// - `V`: Value type.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
pub struct FifoTable<K, V, S = DefaultHashBuilder> {
    map: HashMap<K, usize, S>,
    list: List<(K, V)>,
}

impl<K: Hash + Eq, V> FifoTable<K, V, DefaultHashBuilder> {
    /// Creates an empty table with the default hasher.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty table with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> FifoTable<K, V, S> {
    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the table's hash builder.
    #[inline]
    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// Returns the oldest entry, the next one to be evicted.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.list.get(self.list.head()).map(|(k, v)| (k, v))
    }

    /// Returns the newest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.list.get(self.list.tail()).map(|(k, v)| (k, v))
    }

    /// Iterates over entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.list.iter(),
        }
    }

    /// Iterates over keys from oldest to newest.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over values from oldest to newest.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Cursor at the oldest entry, for iterators that outlive a borrow.
    #[inline]
    pub(crate) fn front_cursor(&self) -> usize {
        self.list.head()
    }

    /// Entry under `cursor` together with the cursor of the following entry.
    pub(crate) fn entry_at(&self, cursor: usize) -> Option<(&K, &V, usize)> {
        let (k, v) = self.list.get(cursor)?;
        Some((k, v, self.list.next_of(cursor)))
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> FifoTable<K, V, S> {
    /// Creates an empty table that hashes keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty table with room for `capacity` entries.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        FifoTable {
            map: HashMap::with_capacity_and_hasher(capacity, hash_builder),
            list: List::with_capacity(capacity),
        }
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = *self.map.get(key)?;
        self.list.get(idx).map(|(k, v)| (k, v))
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.map.remove(key)?;
        self.list.remove(idx)
    }

    /// Removes and returns the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let (k, v) = self.list.pop_front()?;
        self.map.remove(&k);
        Some((k, v))
    }

    /// Removes and returns the newest entry.
    pub fn pop_newest(&mut self) -> Option<(K, V)> {
        let (k, v) = self.list.pop_back()?;
        self.map.remove(&k);
        Some((k, v))
    }

    /// Evicts oldest entries until at most `bound` remain.
    ///
    /// Returns the number of evicted entries.
    pub fn evict_to(&mut self, bound: usize) -> usize {
        let mut evicted = 0;
        while self.len() > bound && self.pop_oldest().is_some() {
            evicted += 1;
        }
        evicted
    }

    /// Removes every entry, keeping the hash builder.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoTable<K, V, S> {
    /// Inserts or updates `key`.
    ///
    /// A new key is appended as the newest entry. An existing key keeps its
    /// position and has its value replaced; the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some((_, slot)) = self.list.get_mut(idx) {
                return Some(mem::replace(slot, value));
            }
        }

        let idx = self.list.push_back((key.clone(), value));
        self.map.insert(key, idx);
        None
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for FifoTable<K, V, S> {
    fn clone(&self) -> Self {
        FifoTable {
            map: self.map.clone(),
            list: self.list.clone(),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> Default for FifoTable<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FromIterator<(K, V)> for FifoTable<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    /// Builds a table from ordered pairs. A duplicate key keeps the position of
    /// its first occurrence and the value of its last.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for FifoTable<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: PartialEq, V: PartialEq, S> PartialEq for FifoTable<K, V, S> {
    /// Tables are equal when they hold the same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for FifoTable<K, V, S> {}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for FifoTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a FifoTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`FifoTable`], oldest entry first.
pub struct Iter<'a, K, V> {
    inner: list::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}
