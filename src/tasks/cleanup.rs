//! Expiry Reaper Task
//!
//! Background task that periodically sweeps expired entries out of a cache.

use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns the background reaper for `cache`.
///
/// The task sleeps for the cache's configured cleanup interval between
/// sweeps; each sweep is a single write-lock pass over the entries. Exactly
/// one reaper runs per cache (spawning again stops the previous one), and
/// it keeps running until [`Cache::close`] aborts it.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let cache: Cache<String> = Cache::new(CacheConfig::new("pods"));
/// spawn_reaper(&cache);
/// // Later, during shutdown:
/// cache.close();
/// ```
pub fn spawn_reaper<V>(cache: &Cache<V>)
where
    V: Send + Sync + 'static,
{
    let interval = cache.config().cleanup_interval;
    let worker = cache.clone();

    let handle = tokio::spawn(async move {
        info!(
            cache = worker.name(),
            interval_secs = interval.as_secs(),
            "starting expiry reaper"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = worker.sweep();
            if removed > 0 {
                info!(cache = worker.name(), removed, "reaper removed expired entries");
            } else {
                debug!(cache = worker.name(), "reaper found no expired entries");
            }
        }
    });

    cache.attach_reaper(handle);
}
