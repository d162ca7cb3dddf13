//! RCU Cache Metrics
//!
//! Metrics specific to the read-copy-update cache: on top of the core lookup
//! and eviction counters it tracks how many table versions were published and
//! how many writes were abandoned without publishing.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::sync::atomic::{AtomicU64, Ordering};

/// RCU-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default)]
pub struct RcuCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,
    publishes: AtomicU64,
    aborted_writes: AtomicU64,
}

impl RcuCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a table version swapped in by a write.
    #[inline]
    pub fn record_publish(&self) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a write that failed and discarded its copy.
    #[inline]
    pub fn record_aborted_write(&self) {
        self.aborted_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Table versions published since construction.
    pub fn publishes(&self) -> u64 {
        self.publishes.load(Ordering::Relaxed)
    }

    /// Writes that published nothing.
    pub fn aborted_writes(&self) -> u64 {
        self.aborted_writes.load(Ordering::Relaxed)
    }

    /// Converts RCU metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("aborted_writes".to_string(), self.aborted_writes() as f64);
        metrics.insert("publishes".to_string(), self.publishes() as f64);
        metrics
    }
}

impl CacheMetrics for RcuCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "RCU-FIFO"
    }
}
