//! Memoization Module
//!
//! Compute-or-fetch wrapper: turns a fallible computation into a cached one
//! keyed by an explicit key.

use std::future::Future;
use std::time::Duration;

use crate::cache::store::Cache;

// == Cache Result ==
/// Returns the cached value for `key` if present, otherwise runs `compute`
/// exactly once and caches a successful result for `ttl`.
///
/// Errors propagate unchanged and are never cached: a transient failure must
/// not poison the cache for the TTL window.
///
/// This helper performs no single-flight de-duplication. Concurrent callers
/// that miss on the same key will each run `compute`; that is acceptable
/// because computations are expected to be idempotent read-only lookups.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use opcache::{cache_result, Cache, CacheConfig};
///
/// # async fn demo() -> anyhow::Result<()> {
/// let cache: Cache<String> = Cache::new(CacheConfig::new("pods"));
/// let pods = cache_result(&cache, "pods:default", Duration::from_secs(30), || async {
///     run_expensive_query().await
/// })
/// .await?;
/// # Ok(())
/// # }
/// # async fn run_expensive_query() -> anyhow::Result<String> { Ok(String::new()) }
/// ```
pub async fn cache_result<V, E, F, Fut>(
    cache: &Cache<V>,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<V, E>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.get(key) {
        return Ok(value);
    }

    let value = compute().await?;
    cache.set_with_ttl(key, value.clone(), ttl);
    Ok(value)
}
