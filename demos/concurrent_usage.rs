//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage patterns for the RCU cache.
//!
//! Run with: cargo run --example concurrent_usage

extern crate rcu_cache;

use rcu_cache::config::RcuCacheConfig;
use rcu_cache::metrics::CacheMetrics;
use rcu_cache::{CacheError, End, RcuCache};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("RCU Cache Usage Examples");
    println!("========================\n");

    fifo_basics();
    snapshot_isolation();
    readers_and_writers();
}

fn fifo_basics() {
    println!("1. FIFO eviction with a bound of 3");

    let config = RcuCacheConfig::bounded(NonZeroUsize::new(3).unwrap());
    let cache: RcuCache<&str, u32> = RcuCache::init(config, None);
    cache.update([("apple", 1), ("banana", 2), ("cherry", 3)]);

    // Updating keeps apple's position, so it is still the next to go
    cache.set("apple", 10);
    if let Some((key, value)) = cache.set("date", 4) {
        println!("   inserting date evicted {} => {}", key, value);
    }
    println!("   {:?}", cache);

    match cache.get(&"apple") {
        Ok(v) => println!("   apple => {}", v),
        Err(CacheError::KeyNotFound) => println!("   apple is gone"),
        Err(e) => println!("   unexpected error: {}", e),
    }

    if let Err(e) = cache.contains_key(&"banana") {
        println!("   contains_key refused: {}", e);
    }

    if let Ok((key, value)) = cache.pop_item(End::Oldest) {
        println!("   popped oldest {} => {}\n", key, value);
    }
}

fn snapshot_isolation() {
    println!("2. Snapshots are unaffected by later writes");

    let cache: RcuCache<u32, String> = (1..=3).map(|i| (i, format!("v{}", i))).collect();
    let snapshot = cache.snapshot();
    let entries = cache.entries();

    cache.clear();
    cache.set(99, "new".to_string());

    println!("   snapshot still holds {} entries", snapshot.len());
    println!("   captured entries: {:?}", entries.collect::<Vec<_>>());
    println!("   live cache: {:?}\n", cache);
}

fn readers_and_writers() {
    println!("3. Lock-free readers alongside a writer");

    let cache: Arc<RcuCache<usize, usize>> = Arc::new(RcuCache::with_bound(
        NonZeroUsize::new(256).unwrap(),
    ));
    cache.update((0..256).map(|i| (i, i)));

    let stop = Arc::new(AtomicBool::new(false));
    let reads = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let readers: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let stop = Arc::clone(&stop);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                let mut i = t;
                while !stop.load(Ordering::Relaxed) {
                    let _ = cache.get(&(i % 512));
                    reads.fetch_add(1, Ordering::Relaxed);
                    i += 1;
                }
            })
        })
        .collect();

    for i in 256..2_256 {
        cache.set(i, i);
    }
    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }

    println!(
        "   {} reads during 2000 writes in {:?}",
        reads.load(Ordering::Relaxed),
        start.elapsed()
    );
    for (name, value) in cache.metrics() {
        println!("   {:<16} {}", name, value);
    }
}
