//! Cache Registry Module
//!
//! Named cache instances, one per class of expensive operation, each with
//! its own tuning and its own reaper.

use std::sync::OnceLock;

use crate::cache::Cache;
use crate::config::Config;
use crate::tasks::spawn_reaper;

// == Cache Registry ==
/// A fixed set of named cache instances.
///
/// Prefer constructing one with [`CacheRegistry::new`] and passing it to
/// whatever composes the process. [`registry`] offers the process-wide
/// instance for code paths without access to an injected registry.
///
/// Values are the captured text output of the external commands the serving
/// process runs, so every instance stores `String`.
#[derive(Debug)]
pub struct CacheRegistry {
    cluster: Cache<String>,
    packages: Cache<String>,
    services: Cache<String>,
}

impl CacheRegistry {
    // == Constructor ==
    /// Builds all named instances and starts a reaper for each.
    ///
    /// Must be called from within a tokio runtime. The instances live until
    /// process exit; no explicit teardown is required.
    pub fn new(config: &Config) -> Self {
        let cluster = Cache::new(config.cluster.clone());
        let packages = Cache::new(config.packages.clone());
        let services = Cache::new(config.services.clone());

        spawn_reaper(&cluster);
        spawn_reaper(&packages);
        spawn_reaper(&services);

        Self {
            cluster,
            packages,
            services,
        }
    }

    // == Named Instances ==
    /// Cache for cluster-state lookups.
    pub fn cluster(&self) -> &Cache<String> {
        &self.cluster
    }

    /// Cache for package-repository lookups.
    pub fn packages(&self) -> &Cache<String> {
        &self.packages
    }

    /// Cache for service-mesh status lookups.
    pub fn services(&self) -> &Cache<String> {
        &self.services
    }

    // == Invalidation Hooks ==
    // Called by mutating operation handlers after a successful state change,
    // so stale reads do not linger for the rest of their TTL.

    pub fn invalidate_cluster(&self) {
        self.cluster.clear();
    }

    pub fn invalidate_packages(&self) {
        self.packages.clear();
    }

    pub fn invalidate_services(&self) {
        self.services.clear();
    }
}

// == Process-Wide Registry ==
static REGISTRY: OnceLock<CacheRegistry> = OnceLock::new();

/// Returns the process-wide registry, constructing every named instance from
/// environment configuration on first access.
///
/// Must first be called from within a tokio runtime, since construction
/// spawns the reaper tasks.
pub fn registry() -> &'static CacheRegistry {
    REGISTRY.get_or_init(|| CacheRegistry::new(&Config::from_env()))
}
