//! Cache Module
//!
//! The core cache: TTL expiry, LRU eviction, observation emission, key
//! construction and memoization.

mod entry;
mod key;
mod memo;
mod observe;
mod stats;
mod store;


// Re-export public types
pub use key::{cache_key, KEY_SEPARATOR};
pub use memo::cache_result;
pub use observe::{CacheObserver, LogObserver};
pub use stats::{CacheCounters, CacheStats};
pub use store::Cache;
