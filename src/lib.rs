//! opcache - an in-memory result cache for expensive operation lookups
//!
//! A tool-serving process answers many concurrent callers by shelling out to
//! slow external commands: cluster queries, package-manager lookups,
//! service-mesh status checks. This crate caches those results so repeated
//! requests within a staleness window skip the subprocess entirely.
//!
//! The core is [`Cache`]: concurrency-safe, TTL-bounded and size-bounded,
//! with LRU eviction and a background expiry reaper. On top of it sit
//! [`cache_key`] for deterministic key construction, [`cache_result`] for
//! compute-or-fetch memoization, and [`CacheRegistry`] for the process-wide
//! named instances.

pub mod cache;
pub mod config;
pub mod registry;
pub mod tasks;

pub use cache::{
    cache_key, cache_result, Cache, CacheCounters, CacheObserver, CacheStats, LogObserver,
    KEY_SEPARATOR,
};
pub use config::{CacheConfig, Config};
pub use registry::{registry, CacheRegistry};
pub use tasks::spawn_reaper;
