//! Cache Statistics Module
//!
//! Lock-free hit/miss/eviction counters plus point-in-time snapshots of the
//! cache contents. Both snapshot types are serializable so an exporter can
//! ship them in whatever format it chooses.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Counter Cells ==
/// Internal atomic counters, updated from both read- and write-locked paths.
///
/// Relaxed ordering is sufficient: the counters are informational and never
/// drive control flow.
#[derive(Debug, Default)]
pub(crate) struct CounterCells {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CounterCells {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheCounters {
        CacheCounters {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

// == Cache Counters ==
/// Cumulative traffic counters since the cache was constructed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheCounters {
    /// Number of successful retrievals
    pub hits: u64,
    /// Number of failed retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries removed by LRU eviction or the reaper
    pub evictions: u64,
}

impl CacheCounters {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any traffic.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Cache Stats ==
/// Point-in-time snapshot computed by scanning all entries.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current entry count, including expired entries the reaper has not
    /// removed yet
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Entries past their expiry that are still awaiting the reaper
    pub expired_count: usize,
    /// Creation time of the oldest entry, if any
    pub oldest_created_at: Option<DateTime<Utc>>,
    /// Creation time of the newest entry, if any
    pub newest_created_at: Option<DateTime<Utc>>,
}
