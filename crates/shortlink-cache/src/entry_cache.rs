use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use shortlink_core::{Result, ShortHash, Storage, StorageError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for creating a [`MokaEntryCache`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for every entry, counted from its last `put`.
    #[builder(default = DEFAULT_TTL)]
    ttl: Duration,
    /// How often expired entries are purged in the background.
    #[builder(default = DEFAULT_SWEEP_INTERVAL)]
    sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Aborts the background sweep once the last cache handle is gone.
#[derive(Debug)]
struct Sweeper {
    handle: JoinHandle<()>,
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The in-memory entry cache, built on Moka.
///
/// Entries live for a fixed TTL after their last `put` and the least recently
/// used entry is evicted once the capacity is exceeded. Every `put` applies
/// pending evictions before returning, so the bound holds as soon as the
/// write is acknowledged. Expired entries are never returned, even before
/// they are physically purged. Nothing survives a restart, so this cache is
/// meant to sit in front of the durable store, never to replace it.
#[derive(Debug, Clone)]
pub struct MokaEntryCache {
    cache: Cache<String, String>,
    sweeper: Option<Arc<Sweeper>>,
}

impl MokaEntryCache {
    /// Creates a cache with the default capacity, TTL and sweep interval.
    pub fn new() -> Self {
        CacheConfig::default().into()
    }

    /// Creates a cache with a custom capacity and TTL.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Time-to-live for cache entries
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        CacheConfig::builder()
            .max_capacity(max_capacity)
            .ttl(ttl)
            .build()
            .into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Approximate number of entries, including expired ones not yet purged.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Applies pending evictions and purges expired entries now.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    fn spawn_sweeper(cache: Cache<String, String>, interval: Duration) -> Option<Arc<Sweeper>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no tokio runtime, entry cache sweeping disabled");
            return None;
        };

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.run_pending_tasks().await;
                trace!(entries = cache.entry_count(), "swept entry cache");
            }
        });

        Some(Arc::new(Sweeper { handle }))
    }
}

impl Default for MokaEntryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CacheConfig> for MokaEntryCache {
    fn from(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        let sweeper = Self::spawn_sweeper(cache.clone(), config.sweep_interval);

        MokaEntryCache { cache, sweeper }
    }
}

#[async_trait]
impl Storage for MokaEntryCache {
    async fn get(&self, hash: &ShortHash) -> Result<String> {
        match self.cache.get(hash.as_str()).await {
            Some(url) => {
                debug!(hash = %hash, "entry cache hit");
                Ok(url)
            }
            None => {
                trace!(hash = %hash, "entry cache miss");
                Err(StorageError::NotFound(hash.to_string()))
            }
        }
    }

    async fn put(&self, url: &str, hash: &ShortHash) -> Result<()> {
        self.cache
            .insert(hash.as_str().to_owned(), url.to_owned())
            .await;
        self.cache.run_pending_tasks().await;
        trace!(hash = %hash, "cached entry");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if let Some(sweeper) = &self.sweeper {
            sweeper.handle.abort();
        }
        Ok(())
    }
}
