//! Cache Configuration Module
//!
//! This module provides the configuration structure for [`RcuCache`](crate::RcuCache).
//!
//! # Design Philosophy
//!
//! Like the rest of the crate's configuration, [`RcuCacheConfig`] has all public
//! fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: A bound of zero is unrepresentable (`NonZeroUsize`)
//! - **No boilerplate**: `Default` gives an unbounded cache
//!
//! # Sizing Guidelines
//!
//! Every write duplicates the whole table, so the bound is also a ceiling on the
//! per-write copy cost:
//!
//! ```text
//! write cost ≈ bound × (size_of::<K>() + size_of::<V>() + ~40 bytes index/link overhead)
//! ```
//!
//! Readers pay nothing for the bound. Pick the smallest bound that keeps your
//! hit rate acceptable when writes are frequent.
//!
//! # Examples
//!
//! ```
//! use rcu_cache::config::RcuCacheConfig;
//! use rcu_cache::RcuCache;
//! use core::num::NonZeroUsize;
//!
//! let config = RcuCacheConfig {
//!     bound: NonZeroUsize::new(1000),
//!     initial_capacity: 1000,
//! };
//! let cache: RcuCache<String, i32> = RcuCache::init(config, None);
//! assert_eq!(cache.bound(), NonZeroUsize::new(1000));
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an RCU cache.
///
/// # Fields
///
/// - `bound`: Maximum number of entries. `None` means unbounded. Fixed for the
///   lifetime of the cache.
/// - `initial_capacity`: Number of entries the initial table pre-allocates.
///   Tables created by later writes size themselves from the table they copy.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct RcuCacheConfig {
    /// Maximum number of key-value pairs the cache may hold after a write.
    pub bound: Option<NonZeroUsize>,
    /// Pre-allocated entry slots for the initial table.
    pub initial_capacity: usize,
}

impl RcuCacheConfig {
    /// An unbounded configuration with no pre-allocation.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            bound: None,
            initial_capacity: 0,
        }
    }

    /// A bounded configuration that pre-allocates room for `bound` entries.
    #[must_use]
    pub const fn bounded(bound: NonZeroUsize) -> Self {
        Self {
            bound: Some(bound),
            initial_capacity: bound.get(),
        }
    }
}

impl fmt::Debug for RcuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RcuCacheConfig")
            .field("bound", &self.bound)
            .field("initial_capacity", &self.initial_capacity)
            .finish()
    }
}
