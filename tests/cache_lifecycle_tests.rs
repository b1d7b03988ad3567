//! Integration Tests for the Cache Lifecycle
//!
//! End-to-end coverage of the reaper, close semantics, concurrent access and
//! the memoization flow, exercised through the public crate surface.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use opcache::{cache_key, cache_result, spawn_reaper, Cache, CacheConfig, CacheRegistry, Config};

// == Helper Functions ==

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opcache=debug".into()),
        )
        .try_init();
}

fn short_lived_cache() -> Cache<String> {
    Cache::new(
        CacheConfig::new("lifecycle-test")
            .with_default_ttl(Duration::from_secs(300))
            .with_max_entries(1000)
            .with_cleanup_interval(Duration::from_millis(50)),
    )
}

// == Reaper Tests ==

#[tokio::test]
async fn test_reaper_end_to_end() {
    init_tracing();
    let cache = short_lived_cache();

    cache.set_with_ttl("k", "v".to_string(), Duration::from_millis(100));
    spawn_reaper(&cache);

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.stats().size, 0, "reaper should have swept the entry");

    cache.close();
}

#[tokio::test]
async fn test_close_stops_reaper() {
    init_tracing();
    let cache = short_lived_cache();

    spawn_reaper(&cache);
    cache.close();

    // With the reaper stopped, an expired entry stays in the map: reads
    // miss, but the slot is never swept.
    cache.set_with_ttl("stale", "v".to_string(), Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.get("stale"), None);
    assert_eq!(cache.len(), 1);

    // A second close is a harmless no-op.
    cache.close();
    assert!(cache.is_closed());
}

// == Concurrency Tests ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_then_readers() {
    const WRITERS: usize = 8;
    const KEYS_PER_WRITER: usize = 50;

    let cache: Cache<String> = Cache::new(
        CacheConfig::new("concurrent-test").with_max_entries(WRITERS * KEYS_PER_WRITER),
    );

    let mut handles = Vec::new();
    for writer in 0..WRITERS {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..KEYS_PER_WRITER {
                let key = cache_key(&["writer".to_string(), writer.to_string(), i.to_string()]);
                cache.set(key, format!("value-{writer}-{i}"));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len(), WRITERS * KEYS_PER_WRITER);

    let mut readers = Vec::new();
    for writer in 0..WRITERS {
        let cache = cache.clone();
        readers.push(tokio::spawn(async move {
            for i in 0..KEYS_PER_WRITER {
                let key = cache_key(&["writer".to_string(), writer.to_string(), i.to_string()]);
                assert_eq!(cache.get(&key), Some(format!("value-{writer}-{i}")));
            }
        }));
    }
    for handle in readers {
        handle.await.unwrap();
    }

    assert_eq!(cache.counters().hits, (WRITERS * KEYS_PER_WRITER) as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_respect_capacity() {
    const WRITERS: usize = 8;
    const KEYS_PER_WRITER: usize = 50;
    const MAX_ENTRIES: usize = 100;

    let cache: Cache<String> =
        Cache::new(CacheConfig::new("capacity-test").with_max_entries(MAX_ENTRIES));

    let mut handles = Vec::new();
    for writer in 0..WRITERS {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..KEYS_PER_WRITER {
                cache.set(format!("w{writer}:k{i}"), "v".to_string());
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Each over-capacity insert evicts exactly one entry, so the cache sits
    // exactly at capacity once the distinct-key count passes it.
    assert_eq!(cache.len(), MAX_ENTRIES);
}

// == Memoization Tests ==

#[tokio::test]
async fn test_memoized_lookup_flow() {
    let cache: Cache<String> = Cache::new(CacheConfig::new("memo-flow"));
    let invocations = Arc::new(AtomicUsize::new(0));
    let key = cache_key(&["pods", "kube-system"]);
    let ttl = Duration::from_secs(30);

    for _ in 0..3 {
        let invocations = invocations.clone();
        let result = cache_result(&cache, &key, ttl, move || async move {
            invocations.fetch_add(1, Ordering::SeqCst);
            // Stands in for a slow subprocess call.
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, anyhow::Error>("pod listing".to_string())
        })
        .await
        .unwrap();
        assert_eq!(result, "pod listing");
    }

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert_eq!(cache.counters().hits, 2);
}

// == Registry Tests ==

#[tokio::test]
async fn test_registry_memoization_and_invalidation() {
    let registry = CacheRegistry::new(&Config::default());

    let key = cache_key(&["deployments", "default"]);
    let value = cache_result(
        registry.cluster(),
        &key,
        Duration::from_secs(60),
        || async { Ok::<_, anyhow::Error>("3 replicas".to_string()) },
    )
    .await
    .unwrap();
    assert_eq!(value, "3 replicas");
    assert_eq!(registry.cluster().len(), 1);

    // A mutating handler just applied a change: stale reads must go.
    registry.invalidate_cluster();
    assert!(registry.cluster().is_empty());

    registry.cluster().close();
    registry.packages().close();
    registry.services().close();
}
