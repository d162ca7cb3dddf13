//! Read-Copy-Update FIFO Cache Implementation
//!
//! A bounded, insertion-ordered cache whose readers never lock. Every version of
//! the table is immutable once published; writers copy it, change the copy, and
//! swap the copy in.
//!
//! # How It Works
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                            RcuCache                                │
//! │                                                                    │
//! │   readers ──load()──▶ ArcSwap ──▶ Arc<FifoTable> (version n)      │
//! │                          ▲                                         │
//! │                          │ store(version n+1)                      │
//! │   writers ──lock()──▶ Mutex<()> ──▶ clone v.n ─▶ mutate ─▶ publish │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Read**: one atomic load of the table handle, then plain lookups on that
//!   version. No lock, no copy, no retry.
//! - **Write**: take the writer mutex, clone the current version, apply the
//!   change to the clone, store it, release the mutex. A failing write drops
//!   its clone and publishes nothing.
//!
//! A reader that captured version `n` keeps seeing version `n`, complete and
//! unchanged, for as long as it holds it, even after writers publish `n + 1`.
//!
//! ## Eviction
//!
//! Eviction is FIFO over insertion order. Updating an existing key keeps its
//! position, so only new keys push old ones out.
//!
//! ## Trade-offs
//!
//! - **Pros**: reads scale with cores, readers never observe a partial write,
//!   writes are linearized by a single lock
//! - **Cons**: every write copies the whole table (O(n) time and memory), and
//!   a long-lived snapshot keeps its version alive
//!
//! # Performance Characteristics
//!
//! | Metric | Value |
//! |--------|-------|
//! | `get` / `len` / `snapshot` | O(1), lock-free |
//! | `set` / `delete` / `pop` / `pop_item` | O(n) copy, serialized |
//! | `update` with `m` pairs | O(n + m) copy, serialized |
//! | `clear` | O(1), serialized |
//!
//! # When to Use
//!
//! **Use RcuCache when:**
//! - Reads vastly outnumber writes
//! - Readers must never wait on writers
//! - The table is small enough that copying it per write is acceptable
//!
//! **Consider alternatives when:**
//! - Writes are frequent or the table is large → use a locked cache
//! - You need recency-based eviction → use an LRU cache
//!
//! # Example
//!
//! ```rust
//! use rcu_cache::RcuCache;
//! use core::num::NonZeroUsize;
//!
//! let cache = RcuCache::with_bound(NonZeroUsize::new(2).unwrap());
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//!
//! let entries: Vec<_> = cache.entries().collect();
//! assert_eq!(entries, [("b", 2), ("c", 3)]);
//! assert!(cache.get(&"a").unwrap_err().is_key_not_found());
//! ```

extern crate alloc;

use crate::config::RcuCacheConfig;
use crate::error::{CacheError, Result};
use crate::metrics::{CacheMetrics, RcuCacheMetrics};
use crate::state::CacheState;
use crate::table::{DefaultHashBuilder, FifoTable, Iter};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use arc_swap::ArcSwap;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

/// Which end of the insertion order [`RcuCache::pop_item`] takes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum End {
    /// The longest-resident entry.
    Oldest,
    /// The most recently appended entry.
    #[default]
    Newest,
}

/// A bounded, insertion-ordered cache with lock-free reads.
///
/// See the [module documentation](self) for the protocol.
///
/// The bound, the writer lock, and the table handle are private and have no
/// setters: they are fixed when the cache is built. Only the published table
/// version changes over the cache's lifetime.
///
/// Rebinding the bound after construction does not compile:
///
/// ```compile_fail,E0616
/// use rcu_cache::RcuCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache: RcuCache<u32, u32> = RcuCache::with_bound(NonZeroUsize::new(2).unwrap());
/// cache.bound = None;
/// ```
///
/// Neither does replacing the table handle:
///
/// ```compile_fail,E0616
/// use rcu_cache::RcuCache;
///
/// let cache: RcuCache<u32, u32> = RcuCache::new();
/// let _ = &cache.table;
/// ```
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone`.
/// - `V`: Value type. Must implement `Clone`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Membership Tests
///
/// There is no way to ask whether a key is present. Checking and then reading
/// would observe two different versions whenever a writer runs in between.
/// [`contains_key`](Self::contains_key) exists only to say so.
pub struct RcuCache<K, V, S = DefaultHashBuilder> {
    bound: Option<NonZeroUsize>,
    table: ArcSwap<FifoTable<K, V, S>>,
    writer: Mutex<()>,
    metrics: RcuCacheMetrics,
}

impl<K, V> RcuCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates an empty, unbounded cache.
    pub fn new() -> Self {
        Self::init(RcuCacheConfig::unbounded(), None)
    }

    /// Creates an empty cache holding at most `bound` entries.
    pub fn with_bound(bound: NonZeroUsize) -> Self {
        Self::init(RcuCacheConfig::bounded(bound), None)
    }

    /// Creates a cache whose initial table holds `items` in order.
    ///
    /// A duplicate key keeps the position of its first occurrence and the
    /// value of its last. Construction never evicts: if `items` holds more
    /// entries than the bound, the cache starts above its bound.
    pub fn with_items<I>(config: RcuCacheConfig, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::init_with_items(config, items, None)
    }
}

impl<K, V, S> RcuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Creates an empty cache from a configuration with an optional hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Bound and initial capacity
    /// * `hasher` - Optional custom hash builder. If `None`, uses `S::default()`
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcu_cache::config::RcuCacheConfig;
    /// use rcu_cache::RcuCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let config = RcuCacheConfig::bounded(NonZeroUsize::new(100).unwrap());
    /// let cache: RcuCache<String, Vec<u8>> = RcuCache::init(config, None);
    /// assert!(cache.is_empty());
    /// ```
    pub fn init(config: RcuCacheConfig, hasher: Option<S>) -> Self
    where
        S: Default,
    {
        let table = FifoTable::with_capacity_and_hasher(
            config.initial_capacity,
            hasher.unwrap_or_default(),
        );
        Self::from_table(config.bound, table)
    }

    /// Creates a cache from a configuration, initial items and an optional hasher.
    ///
    /// Same ordering and no-eviction rules as [`with_items`](RcuCache::with_items).
    pub fn init_with_items<I>(config: RcuCacheConfig, items: I, hasher: Option<S>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut table = FifoTable::with_capacity_and_hasher(
            config.initial_capacity,
            hasher.unwrap_or_default(),
        );
        table.extend(items);
        Self::from_table(config.bound, table)
    }

    /// Rebuilds a cache from exported state.
    ///
    /// The cache gets a fresh writer lock. The entries are taken as they are,
    /// without re-checking the bound.
    pub fn restore(state: CacheState<K, V>) -> Self
    where
        S: Default,
    {
        let bound = state.bound;
        Self::from_table(bound, state.into_table(S::default()))
    }

    fn from_table(bound: Option<NonZeroUsize>, table: FifoTable<K, V, S>) -> Self {
        RcuCache {
            bound,
            table: ArcSwap::from_pointee(table),
            writer: Mutex::new(()),
            metrics: RcuCacheMetrics::new(),
        }
    }

    /// Returns the maximum number of entries, `None` when unbounded.
    #[inline]
    pub fn bound(&self) -> Option<NonZeroUsize> {
        self.bound
    }

    /// Returns the number of entries in the current version.
    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    /// Returns `true` if the current version holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// Returns a clone of the value stored for `key`.
    ///
    /// Lock-free. Does not affect eviction order.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if the observed version lacks `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_with(key, V::clone)
    }

    /// Applies `f` to the value stored for `key` without cloning it.
    ///
    /// `f` runs against the captured version; writers are never blocked by it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcu_cache::RcuCache;
    ///
    /// let cache = RcuCache::new();
    /// cache.set("greeting", String::from("hello world"));
    /// assert_eq!(cache.get_with("greeting", |v| v.len()), Ok(11));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Result<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let table = self.table.load();
        match table.get(key) {
            Some(value) => {
                self.metrics.core.record_hit();
                Ok(f(value))
            }
            None => {
                self.metrics.core.record_miss();
                Err(CacheError::KeyNotFound)
            }
        }
    }

    /// Refuses to test membership.
    ///
    /// Always returns [`CacheError::UnsupportedOperation`]; read the key with
    /// [`get`](Self::get) and handle [`CacheError::KeyNotFound`] instead.
    pub fn contains_key<Q>(&self, _key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Err(CacheError::membership_refused())
    }

    /// Inserts or updates `key`.
    ///
    /// A new key is appended as the newest entry; if the cache is bounded and
    /// holds exactly `bound` entries, the oldest entry is evicted first and
    /// returned. An existing key keeps its position and gets the new value.
    ///
    /// A cache built above its bound (see [`with_items`](RcuCache::with_items))
    /// is not trimmed here: a new key is appended and the cache grows. Only
    /// [`update`](Self::update) evicts down to the bound.
    ///
    /// Once this returns, every later read observes the new value.
    pub fn set(&self, key: K, value: V) -> Option<(K, V)> {
        self.write(|table| {
            let mut evicted = None;
            if let Some(bound) = self.bound {
                if table.len() == bound.get() && !table.contains_key(&key) {
                    evicted = table.pop_oldest();
                }
            }
            if evicted.is_some() {
                self.metrics.core.record_evictions(1);
                tracing::trace!(target: "rcu_cache", "evicted oldest entry to admit a new key");
            }
            table.insert(key, value);
            evicted
        })
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if absent; nothing is published.
    pub fn delete<Q>(&self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.try_write(|table| {
            table
                .remove(key)
                .map(drop)
                .ok_or(CacheError::KeyNotFound)
        })
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if absent; nothing is published.
    pub fn pop<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.try_write(|table| table.remove(key).ok_or(CacheError::KeyNotFound))
    }

    /// Removes `key` and returns its value, or returns `default` if absent.
    pub fn pop_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop(key).unwrap_or(default)
    }

    /// Removes and returns the entry at `end` of the insertion order.
    ///
    /// # Errors
    ///
    /// [`CacheError::EmptyCache`] if there is nothing to pop.
    pub fn pop_item(&self, end: End) -> Result<(K, V)> {
        self.try_write(|table| {
            let popped = match end {
                End::Oldest => table.pop_oldest(),
                End::Newest => table.pop_newest(),
            };
            popped.ok_or(CacheError::EmptyCache)
        })
    }

    /// Publishes an empty version.
    pub fn clear(&self) {
        let _guard = self.writer.lock();
        let empty = FifoTable::with_hasher(self.table.load().hasher().clone());
        self.publish(empty);
    }

    /// Merges `pairs` with upsert semantics, then evicts down to the bound.
    ///
    /// Pairs are applied in iteration order. Eviction runs once, after the
    /// merge, and removes the oldest entries of the merged table until it is
    /// within the bound; keys added by this call can therefore be evicted by
    /// it. This is the only operation that can evict more than one entry.
    ///
    /// Returns the number of evicted entries.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rcu_cache::RcuCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = RcuCache::with_bound(NonZeroUsize::new(1).unwrap());
    /// assert_eq!(cache.update([("x", 1), ("y", 2)]), 1);
    /// assert_eq!(cache.entries().collect::<Vec<_>>(), [("y", 2)]);
    /// ```
    pub fn update<I>(&self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.write(|table| {
            table.extend(pairs);
            let evicted = self.bound.map_or(0, |bound| table.evict_to(bound.get()));
            if evicted > 0 {
                self.metrics.core.record_evictions(evicted as u64);
                tracing::debug!(
                    target: "rcu_cache",
                    evicted,
                    bound = self.bound.map(NonZeroUsize::get),
                    "bulk update evicted entries"
                );
            }
            evicted
        })
    }

    /// Captures the current version for borrowed, lock-free reads.
    pub fn snapshot(&self) -> Snapshot<K, V, S> {
        Snapshot {
            table: self.table.load_full(),
        }
    }

    /// Iterates over clones of the entries of one captured version.
    ///
    /// Writers that publish after this call do not affect the iterator. Each
    /// call captures a fresh version.
    pub fn entries(&self) -> Entries<K, V, S> {
        Entries {
            cursor: Cursor::new(self.table.load_full()),
        }
    }

    /// Iterates over clones of the keys of one captured version.
    pub fn keys(&self) -> Keys<K, V, S> {
        Keys {
            cursor: Cursor::new(self.table.load_full()),
        }
    }

    /// Exports the bound and the entries of one captured version.
    pub fn export_state(&self) -> CacheState<K, V> {
        CacheState::from_table(self.bound, &**self.table.load())
    }

    /// Builds an independent cache from one captured version.
    ///
    /// The copy has the same bound, its own writer lock and its own metrics.
    pub fn copy(&self) -> Self {
        let table = FifoTable::clone(&self.table.load());
        Self::from_table(self.bound, table)
    }

    /// Returns this cache's counters.
    pub fn cache_metrics(&self) -> &RcuCacheMetrics {
        &self.metrics
    }

    /// Runs `f` on a copy of the current version and publishes the copy.
    fn write<R>(&self, f: impl FnOnce(&mut FifoTable<K, V, S>) -> R) -> R {
        let _guard = self.writer.lock();
        let mut next = FifoTable::clone(&self.table.load());
        let out = f(&mut next);
        self.publish(next);
        out
    }

    /// Like [`write`](Self::write), but drops the copy when `f` fails.
    fn try_write<R>(&self, f: impl FnOnce(&mut FifoTable<K, V, S>) -> Result<R>) -> Result<R> {
        let _guard = self.writer.lock();
        let mut next = FifoTable::clone(&self.table.load());
        match f(&mut next) {
            Ok(out) => {
                self.publish(next);
                Ok(out)
            }
            Err(err) => {
                self.metrics.record_aborted_write();
                tracing::trace!(target: "rcu_cache", error = %err, "write aborted, nothing published");
                Err(err)
            }
        }
    }

    /// Swaps `next` in. Callers hold the writer lock.
    fn publish(&self, next: FifoTable<K, V, S>) {
        let len = next.len();
        self.table.store(Arc::new(next));
        self.metrics.record_publish();
        tracing::trace!(target: "rcu_cache", len, "published table version");
    }
}

impl<K, V> Default for RcuCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Clone for RcuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K, V, S> FromIterator<(K, V)> for RcuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone + Default,
{
    /// Builds an unbounded cache from ordered pairs.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::init_with_items(RcuCacheConfig::unbounded(), iter, None)
    }
}

impl<K, V, S> CacheMetrics for RcuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for RcuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RcuCache")
            .field("bound", &self.bound)
            .field("entries", &**self.table.load())
            .finish()
    }
}

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for RcuCache<K, V, S>
where
    K: Hash + Eq + Clone + serde::Serialize,
    V: Clone + serde::Serialize,
    S: BuildHasher + Clone,
{
    fn serialize<Ser>(&self, serializer: Ser) -> core::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serde::Serialize::serialize(&self.export_state(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for RcuCache<K, V, S>
where
    K: Hash + Eq + Clone + serde::Deserialize<'de>,
    V: Clone + serde::Deserialize<'de>,
    S: BuildHasher + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <CacheState<K, V> as serde::Deserialize<'de>>::deserialize(deserializer)
            .map(Self::restore)
    }
}

/// One captured version of a cache's table.
///
/// Holding a snapshot keeps that version alive; it never changes, whatever
/// writers do to the cache afterwards.
pub struct Snapshot<K, V, S = DefaultHashBuilder> {
    table: Arc<FifoTable<K, V, S>>,
}

impl<K, V, S> Snapshot<K, V, S> {
    /// Number of entries in this version.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if this version holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Oldest entry of this version.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.table.first()
    }

    /// Newest entry of this version.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.table.last()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.table.keys()
    }

    /// Values from oldest to newest.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.table.values()
    }

    /// The captured table.
    pub fn table(&self) -> &FifoTable<K, V, S> {
        &self.table
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Snapshot<K, V, S> {
    /// Value stored for `key` in this version.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(key)
    }
}

impl<K, V, S> Clone for Snapshot<K, V, S> {
    fn clone(&self) -> Self {
        Snapshot {
            table: Arc::clone(&self.table),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a Snapshot<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Snapshot<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&*self.table).finish()
    }
}

/// Position in an owned table version.
struct Cursor<K, V, S> {
    table: Arc<FifoTable<K, V, S>>,
    pos: usize,
    remaining: usize,
}

impl<K, V, S> Cursor<K, V, S> {
    fn new(table: Arc<FifoTable<K, V, S>>) -> Self {
        let pos = table.front_cursor();
        let remaining = table.len();
        Cursor {
            table,
            pos,
            remaining,
        }
    }

    fn advance(&mut self) -> Option<(&K, &V)> {
        let (k, v, next) = self.table.entry_at(self.pos)?;
        self.pos = next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((k, v))
    }
}

/// Owning iterator over the entries of one captured version.
///
/// Created by [`RcuCache::entries`]. Yields clones, oldest first.
pub struct Entries<K, V, S = DefaultHashBuilder> {
    cursor: Cursor<K, V, S>,
}

impl<K: Clone, V: Clone, S> Iterator for Entries<K, V, S> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|(k, v)| (k.clone(), v.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<K: Clone, V: Clone, S> ExactSizeIterator for Entries<K, V, S> {}

impl<K, V, S> fmt::Debug for Entries<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("remaining", &self.cursor.remaining)
            .finish()
    }
}

/// Owning iterator over the keys of one captured version.
///
/// Created by [`RcuCache::keys`]. Yields clones, oldest first.
pub struct Keys<K, V, S = DefaultHashBuilder> {
    cursor: Cursor<K, V, S>,
}

impl<K: Clone, V, S> Iterator for Keys<K, V, S> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|(k, _)| k.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining, Some(self.cursor.remaining))
    }
}

impl<K: Clone, V, S> ExactSizeIterator for Keys<K, V, S> {}

impl<K, V, S> fmt::Debug for Keys<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("remaining", &self.cursor.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::sync::Arc;
    use std::thread;

    fn bounded<K: Hash + Eq + Clone, V: Clone>(bound: usize) -> RcuCache<K, V> {
        RcuCache::with_bound(NonZeroUsize::new(bound).unwrap())
    }

    #[test]
    fn test_basic_operations() {
        let cache: RcuCache<String, i32> = RcuCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.bound(), None);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Ok(1));
        assert_eq!(cache.get(&"b".to_string()), Ok(2));
        assert_eq!(cache.get("c"), Err(CacheError::KeyNotFound));
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let cache = bounded(2);
        assert_eq!(cache.set("a", 1), None);
        assert_eq!(cache.set("b", 2), None);
        assert_eq!(cache.set("c", 3), Some(("a", 1)));
        assert_eq!(cache.entries().collect::<Vec<_>>(), [("b", 2), ("c", 3)]);
        assert_eq!(cache.get(&"a"), Err(CacheError::KeyNotFound));
    }

    #[test]
    fn test_update_existing_key_at_bound_does_not_evict() {
        let cache = bounded(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.set("a", 10), None);
        assert_eq!(cache.entries().collect::<Vec<_>>(), [("a", 10), ("b", 2)]);
    }

    #[test]
    fn test_reinsertion_keeps_position() {
        let cache = RcuCache::new();
        cache.set('a', 1);
        cache.set('b', 2);
        cache.set('c', 3);
        cache.set('a', 100);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ['a', 'b', 'c']);
        assert_eq!(cache.get(&'a'), Ok(100));
    }

    #[test]
    fn test_delete() {
        let cache = RcuCache::new();
        cache.set(1, "one");
        cache.set(2, "two");
        assert_eq!(cache.delete(&1), Ok(()));
        assert_eq!(cache.get(&1), Err(CacheError::KeyNotFound));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_delete_publishes_nothing() {
        let cache = RcuCache::new();
        cache.set(1, "one");
        let before = cache.snapshot();
        let publishes = cache.cache_metrics().publishes();

        assert_eq!(cache.delete(&7), Err(CacheError::KeyNotFound));

        let after = cache.snapshot();
        assert!(Arc::ptr_eq(&before.table, &after.table));
        assert_eq!(cache.cache_metrics().publishes(), publishes);
        assert_eq!(cache.cache_metrics().aborted_writes(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = bounded(4);
        cache.update([(1, 1), (2, 2), (3, 3)]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.bound(), NonZeroUsize::new(4));
        cache.set(9, 9);
        assert_eq!(cache.get(&9), Ok(9));
    }

    #[test]
    fn test_update_evicts_after_merge() {
        let cache = bounded(3);
        cache.set("old", 0);
        let evicted = cache.update([("x", 1), ("y", 2), ("old", 5), ("z", 3)]);
        assert_eq!(evicted, 1);
        assert_eq!(
            cache.entries().collect::<Vec<_>>(),
            [("x", 1), ("y", 2), ("z", 3)]
        );
    }

    #[test]
    fn test_update_bound_one() {
        let cache = bounded(1);
        assert_eq!(cache.update([("x", 1), ("y", 2)]), 1);
        assert_eq!(cache.entries().collect::<Vec<_>>(), [("y", 2)]);
    }

    #[test]
    fn test_pop_item() {
        let cache = RcuCache::new();
        cache.update([(1, 'a'), (2, 'b'), (3, 'c')]);
        assert_eq!(cache.pop_item(End::default()), Ok((3, 'c')));
        assert_eq!(cache.pop_item(End::Oldest), Ok((1, 'a')));
        assert_eq!(cache.pop_item(End::Newest), Ok((2, 'b')));
        assert_eq!(cache.pop_item(End::Newest), Err(CacheError::EmptyCache));
        assert_eq!(cache.pop_item(End::Oldest), Err(CacheError::EmptyCache));
    }

    #[test]
    fn test_pop_and_pop_or() {
        let cache = RcuCache::new();
        cache.set("k", 5);
        assert_eq!(cache.pop("k"), Ok(5));
        assert_eq!(cache.pop("k"), Err(CacheError::KeyNotFound));
        assert_eq!(cache.pop_or("k", 42), 42);
        cache.set("k", 6);
        assert_eq!(cache.pop_or("k", 42), 6);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_contains_key_is_refused() {
        let cache = RcuCache::new();
        cache.set("present", 1);
        let err = cache.contains_key("present").unwrap_err();
        assert!(matches!(err, CacheError::UnsupportedOperation { .. }));
        assert_eq!(
            cache.contains_key("absent"),
            Err(CacheError::membership_refused())
        );
    }

    #[test]
    fn test_get_with() {
        let cache = RcuCache::new();
        cache.set("key", "hello world".to_string());
        assert_eq!(cache.get_with("key", |v| v.len()), Ok(11));
        assert_eq!(
            cache.get_with("missing", |v| v.len()),
            Err(CacheError::KeyNotFound)
        );
    }

    #[test]
    fn test_construction_with_items_never_evicts() {
        let config = RcuCacheConfig::bounded(NonZeroUsize::new(2).unwrap());
        let cache = RcuCache::with_items(config, [("a", 1), ("b", 2), ("a", 3), ("c", 4)]);
        assert_eq!(cache.len(), 3);
        assert_eq!(
            cache.entries().collect::<Vec<_>>(),
            [("a", 3), ("b", 2), ("c", 4)]
        );

        // A single-key write on an over-full cache appends without evicting.
        assert_eq!(cache.set("d", 5), None);
        assert_eq!(cache.len(), 4);
        assert_eq!(
            cache.entries().collect::<Vec<_>>(),
            [("a", 3), ("b", 2), ("c", 4), ("d", 5)]
        );

        // A bulk update brings it back within bound.
        assert_eq!(cache.update(core::iter::empty()), 2);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["c", "d"]);
    }

    #[test]
    fn test_snapshot_isolation() {
        let cache = RcuCache::new();
        cache.update([(1, 10), (2, 20)]);

        let snapshot = cache.snapshot();
        let entries = cache.entries();
        let keys = cache.keys();

        cache.set(3, 30);
        cache.delete(&1).unwrap();
        cache.clear();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(&1), Some(&10));
        assert_eq!(entries.collect::<Vec<_>>(), [(1, 10), (2, 20)]);
        assert_eq!(keys.collect::<Vec<_>>(), [1, 2]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entries_is_restartable() {
        let cache = RcuCache::new();
        cache.set(1, 1);
        let first: Vec<_> = cache.entries().collect();
        cache.set(2, 2);
        let second: Vec<_> = cache.entries().collect();
        assert_eq!(first, [(1, 1)]);
        assert_eq!(second, [(1, 1), (2, 2)]);
        assert_eq!(cache.entries().len(), 2);
    }

    #[test]
    fn test_copy_independence() {
        let original = bounded(3);
        original.update([("a", 1), ("b", 2)]);
        let copy = original.clone();

        original.set("c", 3);
        copy.delete("a").unwrap();

        assert_eq!(original.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(copy.keys().collect::<Vec<_>>(), ["b"]);
        assert_eq!(copy.bound(), original.bound());
    }

    #[test]
    fn test_export_and_restore() {
        let cache = bounded(3);
        cache.update([("x", 1), ("y", 2)]);
        let state = cache.export_state();
        assert_eq!(state.bound, NonZeroUsize::new(3));
        assert_eq!(state.entries, vec![("x", 1), ("y", 2)]);

        let restored: RcuCache<&str, i32> = RcuCache::restore(state);
        assert_eq!(restored.bound(), cache.bound());
        assert_eq!(
            restored.entries().collect::<Vec<_>>(),
            cache.entries().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_restore_trusts_state() {
        let state = CacheState {
            bound: NonZeroUsize::new(1),
            entries: vec![(1, 1), (2, 2)],
        };
        let cache: RcuCache<i32, i32> = RcuCache::restore(state);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_from_iterator_and_default() {
        let cache: RcuCache<i32, i32> = (0..5).map(|i| (i, i)).collect();
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.bound(), None);
        let empty: RcuCache<i32, i32> = RcuCache::default();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_debug() {
        let cache = bounded(2);
        cache.set("a", 1);
        assert_eq!(
            std::format!("{:?}", cache),
            r#"RcuCache { bound: Some(2), entries: {"a": 1} }"#
        );
        assert_eq!(std::format!("{:?}", cache.entries()), "Entries { remaining: 1 }");
    }

    #[test]
    fn test_metrics() {
        let cache = bounded(1);
        cache.set("a", 1);
        cache.set("b", 2);
        let _ = cache.get("b");
        let _ = cache.get("a");

        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("publishes"), Some(&2.0));
        assert_eq!(cache.algorithm_name(), "RCU-FIFO");
    }

    #[test]
    fn test_cache_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RcuCache<String, Vec<u8>>>();
        assert_send_sync::<Snapshot<String, Vec<u8>>>();
        assert_send_sync::<Entries<String, Vec<u8>>>();
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache: Arc<RcuCache<usize, usize>> = Arc::new(bounded(64));
        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    cache.set(t * 1000 + i, i);
                }
            }));
        }

        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = cache.snapshot();
                    assert!(snapshot.len() <= 64);
                    for (k, v) in &snapshot {
                        assert_eq!(k % 1000, *v);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 64);
        assert_eq!(cache.cache_metrics().publishes(), 2000);
    }
}
