//! In-memory tile cache with size-weighted LRU eviction using moka.
//!
//! `moka::future::Cache` is lock-free on reads and safe to share across
//! concurrent requests without blocking the Tokio runtime. Concurrent loads
//! of the same key are coalesced: only one caller runs the loader and the
//! others await its result.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache;
use moka::notification::RemovalCause;

use crate::cache::CacheStats;
use crate::coord::TileKey;
use crate::tile::TileImage;

/// Default memory budget: 512 MB, roughly 2000 decoded tiles.
pub const DEFAULT_MEMORY_CACHE_SIZE: u64 = 512 * 1024 * 1024;

/// Shared in-memory cache of decoded tiles.
pub struct MemoryTileCache {
    cache: Cache<TileKey, Arc<TileImage>>,
    max_size_bytes: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl MemoryTileCache {
    /// Create a cache bounded to `max_size_bytes` of decoded pixels.
    pub fn new(max_size_bytes: u64) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let listener_evictions = Arc::clone(&evictions);

        let cache = Cache::builder()
            .weigher(|_key: &TileKey, tile: &Arc<TileImage>| -> u32 {
                tile.size_bytes().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .eviction_listener(move |_key, _tile, cause: RemovalCause| {
                if cause.was_evicted() {
                    listener_evictions.fetch_add(1, Ordering::Relaxed);
                }
            })
            .build();

        Self {
            cache,
            max_size_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            loads: AtomicU64::new(0),
            evictions,
        }
    }

    /// Look up a tile, recording a hit or a miss.
    pub async fn get(&self, key: &TileKey) -> Option<Arc<TileImage>> {
        match self.cache.get(key).await {
            Some(tile) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(tile)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a tile, replacing any previous entry.
    pub async fn insert(&self, key: TileKey, tile: Arc<TileImage>) {
        self.cache.insert(key, tile).await;
    }

    /// Return the cached tile or run `load` to produce it.
    ///
    /// If another caller is already loading `key`, this awaits that load
    /// instead of starting a second one. A failed load is not cached and the
    /// error is shared with every waiter.
    pub async fn get_or_try_load<F, E>(
        &self,
        key: TileKey,
        load: F,
    ) -> Result<Arc<TileImage>, Arc<E>>
    where
        F: Future<Output = Result<Arc<TileImage>, E>>,
        E: Send + Sync + 'static,
    {
        self.cache
            .try_get_with(key, async {
                self.loads.fetch_add(1, Ordering::Relaxed);
                load.await
            })
            .await
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Snapshot of the cache counters.
    ///
    /// Entry count and weighted size are eventually consistent; call
    /// [`Self::sync`] first when exact figures matter.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            entry_count: self.cache.entry_count(),
            size_bytes: self.cache.weighted_size(),
            max_size_bytes: self.max_size_bytes,
        }
    }

    /// Run pending maintenance so counts and evictions are up to date.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for MemoryTileCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CACHE_SIZE)
    }
}
