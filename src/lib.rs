#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Building Blocks
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RcuCache`] | Thread-safe bounded FIFO cache with lock-free reads (`concurrent` feature) |
//! | [`FifoTable`] | Insertion-ordered map backing each published version |
//! | [`RcuCacheConfig`] | Bound and initial capacity |
//! | [`CacheState`] | Exported bound and entries, serializable with the `serde` feature |
//! | [`CacheError`] | Errors returned by cache operations |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost | Locking |
//! |-----------|------|---------|
//! | `get`, `get_with`, `len` | O(1) | none |
//! | `snapshot`, `entries`, `keys` | O(1) to capture | none |
//! | `set`, `delete`, `pop`, `pop_item` | O(n) | writer mutex |
//! | `update` | O(n + m) | writer mutex |
//! | `clear` | O(1) | writer mutex |
//!
//! ## Code Examples
//!
//! ### Bounded FIFO
//!
//! ```rust
//! use rcu_cache::{End, RcuCache};
//! use core::num::NonZeroUsize;
//!
//! let cache = RcuCache::with_bound(NonZeroUsize::new(3).unwrap());
//! cache.update([("a", 1), ("b", 2), ("c", 3)]);
//!
//! // Updating an existing key keeps its position
//! cache.set("a", 10);
//!
//! // A new key pushes the oldest one out
//! assert_eq!(cache.set("d", 4), Some(("a", 10)));
//!
//! assert_eq!(cache.pop_item(End::Oldest), Ok(("b", 2)));
//! assert_eq!(cache.pop_item(End::Newest), Ok(("d", 4)));
//! ```
//!
//! ### Snapshots
//!
//! ```rust
//! use rcu_cache::RcuCache;
//!
//! let cache = RcuCache::new();
//! cache.set(1, "one");
//!
//! let snapshot = cache.snapshot();
//! cache.clear();
//!
//! assert_eq!(snapshot.get(&1), Some(&"one"));
//! assert!(cache.is_empty());
//! ```
//!
//! ### Single-Threaded Table
//!
//! ```rust
//! use rcu_cache::FifoTable;
//!
//! let mut table = FifoTable::new();
//! table.insert("x", 1);
//! table.insert("y", 2);
//! assert_eq!(table.evict_to(1), 1);
//! assert_eq!(table.first(), Some((&"y", &2)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `hashbrown` | ✓ | Use hashbrown for the key index (`no_std` compatible) |
//! | `concurrent` | ✓ | Thread-safe [`RcuCache`] (requires `std`) |
//! | `std` | | Standard library support |
//! | `serde` | | `Serialize`/`Deserialize` for [`CacheState`] and [`RcuCache`] |
//! | `nightly` | | Nightly optimizations for hashbrown |

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(not(feature = "hashbrown"), not(feature = "std")))]
compile_error!("either the `hashbrown` or the `std` feature must be enabled");

/// Index-linked doubly linked list.
///
/// Slots live in a `Vec` and link to each other by index, so a list can be
/// cloned without any pointer fix-up.
///
/// **Note**: This module is internal infrastructure and should not be used directly
/// by library consumers. Use [`FifoTable`] instead.
pub(crate) mod list;

/// Insertion-ordered hash table with FIFO eviction.
pub mod table;

/// Cache configuration structures.
pub mod config;

/// Error types.
pub mod error;

/// Exported cache state.
pub mod state;

/// Cache metrics system.
///
/// Lock-free counters for lookups, evictions and published versions, reported
/// through a common interface.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Provides the thread-safe read-copy-update cache.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use config::RcuCacheConfig;
pub use error::{CacheError, Result};
pub use state::CacheState;
pub use table::FifoTable;

#[cfg(feature = "concurrent")]
pub use concurrent::{End, Entries, Keys, RcuCache, Snapshot};
