//! Configuration Module
//!
//! Per-cache tuning plus process-level configuration for the named cache
//! instances, loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

// == Cache Config ==
/// Tuning for a single cache instance, immutable after construction.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Instance name, used in log fields
    pub name: String,
    /// TTL applied by `set` when no explicit TTL is given
    pub default_ttl: Duration,
    /// Maximum number of entries before LRU eviction kicks in
    pub max_entries: usize,
    /// Period of the background expiry reaper
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a config with defaults suitable for a mid-volume lookup
    /// class: 5 minute TTL, 1000 entries, 30 second cleanup.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_ttl: Duration::from_secs(300),
            max_entries: 1000,
            cleanup_interval: Duration::from_secs(30),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the capacity. Clamped to at least one entry: a zero-capacity
    /// cache would make every insert evict itself.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

// == Process Config ==
/// Configuration for the registry's named cache instances.
///
/// Each operation class gets tuning matched to its staleness tolerance and
/// call volume: package-repository lookups change slowly and get a long TTL
/// with a larger capacity, service-mesh status is fast-changing and
/// high-cardinality so it gets a short TTL and a small capacity, and
/// cluster-state lookups sit in between.
#[derive(Debug, Clone)]
pub struct Config {
    pub cluster: CacheConfig,
    pub packages: CacheConfig,
    pub services: CacheConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// All values are in seconds except `*_MAX_ENTRIES`:
    /// - `CLUSTER_CACHE_TTL`, `CLUSTER_CACHE_MAX_ENTRIES`, `CLUSTER_CACHE_CLEANUP_INTERVAL`
    /// - `PACKAGE_CACHE_TTL`, `PACKAGE_CACHE_MAX_ENTRIES`, `PACKAGE_CACHE_CLEANUP_INTERVAL`
    /// - `SERVICE_CACHE_TTL`, `SERVICE_CACHE_MAX_ENTRIES`, `SERVICE_CACHE_CLEANUP_INTERVAL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cluster: tuning_from_env("CLUSTER_CACHE", defaults.cluster),
            packages: tuning_from_env("PACKAGE_CACHE", defaults.packages),
            services: tuning_from_env("SERVICE_CACHE", defaults.services),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: CacheConfig::new("cluster")
                .with_default_ttl(Duration::from_secs(120))
                .with_max_entries(500)
                .with_cleanup_interval(Duration::from_secs(30)),
            packages: CacheConfig::new("packages")
                .with_default_ttl(Duration::from_secs(3600))
                .with_max_entries(2000)
                .with_cleanup_interval(Duration::from_secs(300)),
            services: CacheConfig::new("services")
                .with_default_ttl(Duration::from_secs(15))
                .with_max_entries(256)
                .with_cleanup_interval(Duration::from_secs(10)),
        }
    }
}

fn tuning_from_env(prefix: &str, base: CacheConfig) -> CacheConfig {
    let ttl = env_u64(&format!("{prefix}_TTL"), base.default_ttl.as_secs());
    let max_entries = env_u64(&format!("{prefix}_MAX_ENTRIES"), base.max_entries as u64);
    let cleanup = env_u64(
        &format!("{prefix}_CLEANUP_INTERVAL"),
        base.cleanup_interval.as_secs(),
    );

    base.with_default_ttl(Duration::from_secs(ttl))
        .with_max_entries(max_entries as usize)
        .with_cleanup_interval(Duration::from_secs(cleanup))
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
