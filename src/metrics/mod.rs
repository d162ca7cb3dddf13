//! Cache Metrics System
//!
//! Provides metrics reporting for the cache using BTreeMap-based reports. The
//! cache tracks its counters in [`RcuCacheMetrics`] and exposes them through
//! the common [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and benchmarking comparisons
//! - **Stable serialization**: JSON/CSV exports have predictable key ordering
//!
//! # Why Atomics?
//!
//! Reads of an RCU cache never take a lock, so the hit and miss counters they
//! bump cannot live behind one either. All counters are `AtomicU64` updated
//! with `Relaxed` ordering: each counter is exact, but a report taken while
//! other threads are running is not a consistent cut across counters.
//!
//! A lookup touches exactly one counter (`cache_hits` or `cache_misses`);
//! `requests` is their sum, computed when reported.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::sync::atomic::{AtomicU64, Ordering};

pub mod rcu;

pub use rcu::RcuCacheMetrics;

/// Counters shared by every cache: lookups and evictions.
#[derive(Debug, Default)]
pub struct CoreCacheMetrics {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    evictions: AtomicU64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that did not find its key.
    #[inline]
    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records `count` entries removed to stay within the bound.
    #[inline]
    pub fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Total lookups, hits plus misses.
    pub fn requests(&self) -> u64 {
        self.cache_hits().saturating_add(self.cache_misses())
    }

    /// Lookups that found their key.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Lookups that did not find their key.
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Entries evicted by the bound.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Hit rate between 0.0 and 1.0, or 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        rate(self.cache_hits(), self.cache_misses())
    }

    /// Miss rate between 0.0 and 1.0, or 0.0 before any request.
    pub fn miss_rate(&self) -> f64 {
        rate(self.cache_misses(), self.cache_hits())
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        // One load per counter so the derived values agree with each other.
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), hits as f64);
        metrics.insert("cache_misses".to_string(), misses as f64);
        metrics.insert("evictions".to_string(), self.evictions() as f64);
        metrics.insert("requests".to_string(), hits.saturating_add(misses) as f64);

        metrics.insert("hit_rate".to_string(), rate(hits, misses));
        metrics.insert("miss_rate".to_string(), rate(misses, hits));

        metrics
    }
}

fn rate(part: u64, rest: u64) -> f64 {
    let total = part.saturating_add(rest);
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.0
    }
}

/// Trait that all caches implement for metrics reporting
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics, which is
/// essential for reproducible benchmarks and consistent test results.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_start_at_zero() {
        let metrics = CoreCacheMetrics::new();
        let report = metrics.to_btreemap();
        assert_eq!(report.get("requests"), Some(&0.0));
        assert_eq!(report.get("cache_hits"), Some(&0.0));
        assert_eq!(report.get("cache_misses"), Some(&0.0));
        assert_eq!(report.get("hit_rate"), Some(&0.0));
        assert_eq!(report.get("miss_rate"), Some(&0.0));
    }

    #[test]
    fn test_core_metrics_rates() {
        let metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_evictions(5);

        assert_eq!(metrics.requests(), 4);
        assert_eq!(metrics.cache_hits(), 3);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.evictions(), 5);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);
    }

    #[test]
    fn test_each_lookup_touches_one_counter() {
        let metrics = CoreCacheMetrics::new();
        metrics.record_miss();
        metrics.record_miss();
        assert_eq!(metrics.cache_hits.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.cache_misses.load(Ordering::Relaxed), 2);

        metrics.record_hit();
        assert_eq!(metrics.cache_hits.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.cache_misses.load(Ordering::Relaxed), 2);

        let report = metrics.to_btreemap();
        assert_eq!(report.get("requests"), Some(&3.0));
        assert_eq!(report.get("cache_hits"), Some(&1.0));
        assert_eq!(report.get("cache_misses"), Some(&2.0));
    }

    #[test]
    fn test_core_metrics_report_is_sorted() {
        let metrics = CoreCacheMetrics::new();
        let keys: alloc::vec::Vec<_> = metrics.to_btreemap().into_keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
