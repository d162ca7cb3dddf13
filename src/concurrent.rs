//! Concurrent Cache Implementations
//!
//! This module provides the thread-safe cache built on read-copy-update.
//!
//! # Architecture
//!
//! The cache keeps one immutable table version behind an atomically swappable
//! handle:
//! - Readers load the handle and look up keys in whatever version it points to
//! - Writers serialize on a single `parking_lot::Mutex`, build the next version
//!   from a copy of the current one, and swap it in
//! - A version stays alive while any reader still holds it
//!
//! ## Why One Writer Lock Instead of Segments?
//!
//! Sharding the key space would let writers run in parallel, but it would also
//! split the insertion order across shards. FIFO eviction needs one global
//! order, so all writes go through one lock and readers take none.
//!
//! # Available Concurrent Caches
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RcuCache`] | Bounded FIFO cache with lock-free reads |
//!
//! # Example
//!
//! ```rust
//! use rcu_cache::concurrent::RcuCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(RcuCache::with_bound(NonZeroUsize::new(1000).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.set(key.clone(), i);
//!             assert_eq!(cache.get(&key), Ok(i));
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```
//!
//! # Thread Safety
//!
//! `RcuCache` is `Send + Sync` whenever its keys, values and hasher are, and can
//! be wrapped in `Arc` for shared ownership.
//!
//! # Zero-Copy Access
//!
//! Use `get_with()` to run a closure against the stored value instead of
//! cloning it. The closure sees one immutable version and holds no lock:
//!
//! ```rust,ignore
//! let len = cache.get_with(&key, |value| value.len());
//! ```

mod rcu;

pub use self::rcu::{End, Entries, Keys, RcuCache, Snapshot};
