//! Serialization Tests
//!
//! Exported state and whole caches round-trip through JSON; the writer lock
//! and metrics are never part of the encoding.

#![cfg(all(feature = "concurrent", feature = "serde"))]

use rcu_cache::{CacheState, RcuCache};
use serde_json::json;
use std::num::NonZeroUsize;

fn sample_cache() -> RcuCache<String, u32> {
    let cache = RcuCache::with_bound(NonZeroUsize::new(3).unwrap());
    cache.update([
        ("alpha".to_string(), 1),
        ("beta".to_string(), 2),
        ("gamma".to_string(), 3),
    ]);
    cache.set("delta".to_string(), 4);
    cache
}

#[test]
fn test_state_json_shape() {
    let cache = sample_cache();
    let value = serde_json::to_value(cache.export_state()).unwrap();
    assert_eq!(
        value,
        json!({
            "bound": 3,
            "entries": [["beta", 2], ["gamma", 3], ["delta", 4]],
        })
    );
}

#[test]
fn test_unbounded_state_encodes_null_bound() {
    let cache: RcuCache<u8, bool> = RcuCache::new();
    cache.set(1, true);
    let value = serde_json::to_value(&cache).unwrap();
    assert_eq!(value, json!({ "bound": null, "entries": [[1, true]] }));
}

#[test]
fn test_cache_json_round_trip() {
    let cache = sample_cache();
    let encoded = serde_json::to_string(&cache).unwrap();
    let decoded: RcuCache<String, u32> = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded.bound(), cache.bound());
    assert_eq!(decoded.export_state(), cache.export_state());

    // The decoded cache is fully usable and evicts in the restored order
    assert_eq!(
        decoded.set("epsilon".to_string(), 5),
        Some(("beta".to_string(), 2))
    );
}

#[test]
fn test_decoding_keeps_entries_beyond_bound() {
    let decoded: RcuCache<String, u32> =
        serde_json::from_str(r#"{"bound": 1, "entries": [["a", 1], ["b", 2]]}"#).unwrap();
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_zero_bound_is_rejected() {
    let result = serde_json::from_str::<CacheState<String, u32>>(r#"{"bound": 0, "entries": []}"#);
    assert!(result.is_err());
}
