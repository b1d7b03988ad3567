//! Cache Observation Module
//!
//! The seam between the cache and whatever exports its telemetry. The cache
//! emits four observation kinds: hit, miss, eviction, size delta. This core
//! defines no wire format; an exporter implements [`CacheObserver`] and
//! decides transport.

use tracing::{debug, trace};

// == Observer Trait ==
/// Receives cache observations.
///
/// All methods default to no-ops so implementors only override what they
/// export. Observations are emitted outside the cache's internal lock, but
/// implementations should still be cheap and must not block.
pub trait CacheObserver: Send + Sync {
    /// A `get` found a live entry.
    fn hit(&self, _key: &str) {}

    /// A `get` found nothing, or only an expired entry.
    fn miss(&self, _key: &str) {}

    /// An entry was removed by LRU eviction or by the reaper.
    fn evicted(&self, _key: &str) {}

    /// The entry count changed by `delta` (positive on insert, negative on
    /// delete/clear/sweep).
    fn size_delta(&self, _delta: i64) {}
}

// == Log Observer ==
/// Default observer that forwards observations to `tracing`.
#[derive(Debug, Clone)]
pub struct LogObserver {
    cache_name: String,
}

impl LogObserver {
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
        }
    }
}

impl CacheObserver for LogObserver {
    fn hit(&self, key: &str) {
        trace!(cache = %self.cache_name, key, "cache hit");
    }

    fn miss(&self, key: &str) {
        trace!(cache = %self.cache_name, key, "cache miss");
    }

    fn evicted(&self, key: &str) {
        debug!(cache = %self.cache_name, key, "cache entry evicted");
    }

    fn size_delta(&self, delta: i64) {
        trace!(cache = %self.cache_name, delta, "cache size changed");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;
    impl CacheObserver for Silent {}

    #[test]
    fn test_default_methods_are_noops() {
        let observer = Silent;
        observer.hit("k");
        observer.miss("k");
        observer.evicted("k");
        observer.size_delta(-3);
    }

    #[test]
    fn test_log_observer_does_not_panic_without_subscriber() {
        let observer = LogObserver::new("test");
        observer.hit("k");
        observer.size_delta(1);
    }
}
