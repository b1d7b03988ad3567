//! Cache Store Module
//!
//! The cache engine: a bounded `HashMap` of entries behind an `RwLock`, with
//! TTL expiry and LRU eviction. `Cache<V>` is a cheap handle (an `Arc` over
//! shared state) so callers and the background reaper share one instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::entry::{current_timestamp_ns, timestamp_to_datetime, CacheEntry};
use crate::cache::observe::{CacheObserver, LogObserver};
use crate::cache::stats::{CacheCounters, CacheStats, CounterCells};
use crate::config::CacheConfig;

// == Cache ==
/// Concurrency-safe, time-bounded, size-bounded in-memory cache.
///
/// The cache never returns an error: capacity pressure is resolved by LRU
/// eviction, and the only "failure" a caller can observe is a miss. Values
/// are cloned out on `get`; internal bookkeeping is never exposed.
///
/// Reads (`get`, `len`, `stats`) take the shared lock; writes (`set*`,
/// `delete`, `clear`, `sweep`) take the exclusive lock. `get` updates access
/// metadata under the read lock through atomics, trading perfectly
/// linearizable access statistics for read throughput.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Arc<CacheInner<V>>,
}

// Manual impl: a handle clone must not require V: Clone.
impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CacheInner<V> {
    /// Key-value storage; the only shared mutable resource
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Cumulative hit/miss/eviction counters
    counters: CounterCells,
    /// Observation sink (hit/miss/eviction/size-delta)
    observer: Arc<dyn CacheObserver>,
    /// Immutable configuration set at construction
    config: CacheConfig,
    /// Handle of the background reaper, if one was spawned
    reaper: Mutex<Option<JoinHandle<()>>>,
    /// Set once `close` has run
    closed: AtomicBool,
}

impl<V> std::fmt::Debug for CacheInner<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<V> Cache<V> {
    // == Constructors ==
    /// Creates a new cache with the given configuration, logging
    /// observations through [`LogObserver`].
    ///
    /// The background reaper is not started here; see
    /// [`spawn_reaper`](crate::tasks::spawn_reaper).
    pub fn new(config: CacheConfig) -> Self {
        let observer = Arc::new(LogObserver::new(config.name.clone()));
        Self::with_observer(config, observer)
    }

    /// Creates a new cache that reports observations to `observer`.
    pub fn with_observer(config: CacheConfig, observer: Arc<dyn CacheObserver>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                counters: CounterCells::default(),
                observer,
                config,
                reaper: Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    // == Get ==
    /// Retrieves a value by key, returning `None` if the key is absent or
    /// its entry has expired.
    ///
    /// An expired entry is treated as a miss but is *not* deleted here; its
    /// removal is deferred to the reaper so the hot read path never upgrades
    /// to the write lock. On a hit the entry's `accessed_at` is advanced and
    /// its `access_count` incremented.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let value = {
            let entries = self.read_entries();
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => {
                    entry.touch();
                    Some(entry.value().clone())
                }
                // Expired entries stay in the map for the reaper.
                _ => None,
            }
        };

        match value {
            Some(value) => {
                self.inner.counters.record_hit();
                self.inner.observer.hit(key);
                Some(value)
            }
            None => {
                self.inner.counters.record_miss();
                self.inner.observer.miss(key);
                None
            }
        }
    }

    // == Set ==
    /// Stores a value under `key` with the configured default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let ttl = self.inner.config.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores a value under `key`, expiring `ttl` from now.
    ///
    /// If the cache is at capacity and `key` is new, exactly one entry is
    /// evicted first: the one with the smallest `accessed_at`. Equal
    /// timestamps are broken by map iteration order, which is arbitrary but
    /// deterministic for a given map state. Overwriting an existing key
    /// never evicts, since the size does not grow.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();

        let (is_new, victim) = {
            let mut entries = self.write_entries();
            let is_new = !entries.contains_key(&key);

            let victim = if is_new && entries.len() >= self.inner.config.max_entries {
                evict_lru(&mut entries)
            } else {
                None
            };

            entries.insert(key, CacheEntry::new(value, ttl));
            (is_new, victim)
        };

        if let Some(victim) = victim {
            self.inner.counters.record_eviction();
            self.inner.observer.evicted(&victim);
        }
        if is_new {
            self.inner.observer.size_delta(1);
        }
    }

    // == Delete ==
    /// Removes the entry for `key` if present. Returns whether anything was
    /// removed; deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.write_entries().remove(key).is_some();
        if removed {
            self.inner.observer.size_delta(-1);
        }
        removed
    }

    // == Clear ==
    /// Removes all entries atomically with respect to concurrent readers.
    pub fn clear(&self) {
        let prior = {
            let mut entries = self.write_entries();
            let prior = entries.len();
            entries.clear();
            prior
        };
        if prior > 0 {
            self.inner.observer.size_delta(-(prior as i64));
        }
    }

    // == Length ==
    /// Current entry count, including expired entries the reaper has not
    /// removed yet.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    // == Stats ==
    /// Computes a point-in-time snapshot by scanning all entries under the
    /// read lock.
    pub fn stats(&self) -> CacheStats {
        let entries = self.read_entries();
        let now = current_timestamp_ns();

        let mut expired_count = 0;
        let mut oldest: Option<u64> = None;
        let mut newest: Option<u64> = None;

        for entry in entries.values() {
            if entry.is_expired_at(now) {
                expired_count += 1;
            }
            let created = entry.created_at();
            oldest = Some(oldest.map_or(created, |o| o.min(created)));
            newest = Some(newest.map_or(created, |n| n.max(created)));
        }

        CacheStats {
            size: entries.len(),
            max_size: self.inner.config.max_entries,
            expired_count,
            oldest_created_at: oldest.map(timestamp_to_datetime),
            newest_created_at: newest.map(timestamp_to_datetime),
        }
    }

    /// Snapshot of the cumulative hit/miss/eviction counters.
    pub fn counters(&self) -> CacheCounters {
        self.inner.counters.snapshot()
    }

    // == Sweep ==
    /// Removes every expired entry in one write-locked pass and returns the
    /// number removed. Called periodically by the background reaper; safe to
    /// call directly as well.
    pub fn sweep(&self) -> usize {
        let removed: Vec<String> = {
            let mut entries = self.write_entries();
            let now = current_timestamp_ns();

            let expired: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect();

            for key in &expired {
                entries.remove(key);
            }
            expired
        };

        for key in &removed {
            self.inner.counters.record_eviction();
            self.inner.observer.evicted(key);
        }
        if !removed.is_empty() {
            self.inner.observer.size_delta(-(removed.len() as i64));
        }
        removed.len()
    }

    // == Close ==
    /// Stops the background reaper. Existing entries are kept; no further
    /// cleanup occurs. Calling `close` again (or without a reaper running)
    /// is a no-op.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Relaxed);
        let handle = self
            .inner
            .reaper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Relaxed)
    }

    /// Registers the reaper task handle so `close` can stop it. A previous
    /// reaper, if any, is stopped first: each cache runs at most one.
    pub(crate) fn attach_reaper(&self, handle: JoinHandle<()>) {
        let previous = self
            .inner
            .reaper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            warn!(cache = self.name(), "replacing an already-running reaper");
            previous.abort();
        }
    }

    // == Lock Helpers ==
    // Poisoning is absorbed: the cache contract is infallible, and a panic
    // mid-write leaves at worst a structurally intact map.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// == LRU Eviction ==
/// Removes and returns the key with the smallest `accessed_at`. Ties are
/// broken by iteration order of the map.
fn evict_lru<V>(entries: &mut HashMap<String, CacheEntry<V>>) -> Option<String> {
    let victim = entries
        .iter()
        .min_by_key(|(_, entry)| entry.accessed_at())
        .map(|(key, _)| key.clone())?;
    entries.remove(&victim);
    Some(victim)
}
