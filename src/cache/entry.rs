//! Cache Entry Module
//!
//! A single cached value plus its temporal and access metadata. Entries are
//! owned exclusively by their cache and never handed out to callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A stored value with creation, expiry and access bookkeeping.
///
/// `accessed_at` and `access_count` are atomics so a read-locked `get` can
/// update them without taking the write lock. Invariants:
/// `expires_at >= created_at` and `accessed_at >= created_at` always hold.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
    /// The stored value, opaque to the cache
    value: V,
    /// Creation timestamp (Unix nanoseconds), immutable
    created_at: u64,
    /// Expiration timestamp (Unix nanoseconds) = created_at + ttl
    expires_at: u64,
    /// Last successful read (Unix nanoseconds); the LRU recency signal
    accessed_at: AtomicU64,
    /// Number of successful reads, informational only
    access_count: AtomicU64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after now.
    ///
    /// A zero `ttl` yields an entry that is already expired (`now >=
    /// expires_at` holds immediately).
    pub(crate) fn new(value: V, ttl: Duration) -> Self {
        let now = current_timestamp_ns();
        let expires_at = now.saturating_add(ttl.as_nanos().min(u64::MAX as u128) as u64);

        Self {
            value,
            created_at: now,
            expires_at,
            accessed_at: AtomicU64::new(now),
            access_count: AtomicU64::new(0),
        }
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn created_at(&self) -> u64 {
        self.created_at
    }

    pub(crate) fn accessed_at(&self) -> u64 {
        self.accessed_at.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub(crate) fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than *or equal to* its expiration time. The reaper uses the
    /// same comparison so a read and a sweep never disagree about liveness
    /// at the boundary instant.
    pub(crate) fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ns())
    }

    /// Expiry check against a caller-supplied clock reading, so a whole
    /// sweep or stats scan uses one consistent `now`.
    pub(crate) fn is_expired_at(&self, now_ns: u64) -> bool {
        now_ns >= self.expires_at
    }

    // == Touch ==
    /// Records a successful read: advances `accessed_at` and increments
    /// `access_count`.
    ///
    /// `fetch_max` keeps `accessed_at` monotonic even if the wall clock
    /// steps backwards, preserving `accessed_at >= created_at`.
    pub(crate) fn touch(&self) {
        self.accessed_at
            .fetch_max(current_timestamp_ns(), Ordering::Relaxed);
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    // == Time To Live ==
    /// Returns the remaining TTL, clamped to zero once expired.
    #[allow(dead_code)]
    pub(crate) fn ttl_remaining(&self) -> Duration {
        let now = current_timestamp_ns();
        Duration::from_nanos(self.expires_at.saturating_sub(now))
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in nanoseconds.
pub(crate) fn current_timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos() as u64
}

/// Converts a Unix-nanosecond timestamp into a `chrono` datetime for
/// stats reporting.
pub(crate) fn timestamp_to_datetime(ns: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(ns as i64)
}
