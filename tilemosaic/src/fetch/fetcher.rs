use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{DiskCache, MemoryTileCache};
use crate::coord::TileKey;
use crate::fetch::RetryPolicy;
use crate::provider::{ProviderError, TileProvider};
use crate::tile::{TileImage, TileImageError};

/// Where a resolved tile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSource {
    /// Already decoded in memory, or loaded by a concurrent request.
    Memory,
    /// Read from the disk cache.
    Disk,
    /// Downloaded from the provider.
    Network,
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchSource::Memory => write!(f, "memory"),
            FetchSource::Disk => write!(f, "disk"),
            FetchSource::Network => write!(f, "network"),
        }
    }
}

/// A resolved tile.
#[derive(Debug, Clone)]
pub struct FetchedTile {
    pub key: TileKey,
    pub image: Arc<TileImage>,
    pub source: FetchSource,
}

/// Failure to resolve a single tile.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("tile {key} is outside the tile grid")]
    OutOfRange { key: TileKey },

    #[error("download of tile {key} failed after {attempts} attempt(s): {source}")]
    Download {
        key: TileKey,
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("tile {key} could not be decoded: {source}")]
    Decode {
        key: TileKey,
        #[source]
        source: TileImageError,
    },
}

impl FetchError {
    pub fn key(&self) -> TileKey {
        match self {
            FetchError::OutOfRange { key }
            | FetchError::Download { key, .. }
            | FetchError::Decode { key, .. } => *key,
        }
    }
}

/// Resolves tiles through the memory, disk and network levels.
///
/// The caches are shared; a single fetcher can serve any number of
/// concurrent requests, and concurrent resolutions of the same key share a
/// single load.
pub struct TileFetcher<P, D> {
    memory: Arc<MemoryTileCache>,
    disk: Arc<D>,
    provider: P,
    retry: RetryPolicy,
}

impl<P, D> TileFetcher<P, D>
where
    P: TileProvider,
    D: DiskCache,
{
    pub fn new(
        memory: Arc<MemoryTileCache>,
        disk: Arc<D>,
        provider: P,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            memory,
            disk,
            provider,
            retry,
        }
    }

    pub fn memory_cache(&self) -> &Arc<MemoryTileCache> {
        &self.memory
    }

    pub fn disk_cache(&self) -> &Arc<D> {
        &self.disk
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves one tile.
    ///
    /// Failures are local to `key`; nothing is cached for a failed tile, so
    /// a later call retries from scratch.
    pub async fn resolve(&self, key: TileKey) -> Result<FetchedTile, FetchError> {
        // Keys have public fields, so they can bypass `TileKey::new`.
        if TileKey::new(key.x as i64, key.y as i64, key.zoom).is_err() {
            return Err(FetchError::OutOfRange { key });
        }

        if let Some(image) = self.memory.get(&key).await {
            debug!(tile = %key, "Memory cache hit");
            return Ok(FetchedTile {
                key,
                image,
                source: FetchSource::Memory,
            });
        }

        // Stays `None` when another request was already loading this key.
        let mut loaded_from = None;
        let image = self
            .memory
            .get_or_try_load(key, async {
                let (image, source) = self.load_uncached(key).await?;
                loaded_from = Some(source);
                Ok::<_, FetchError>(image)
            })
            .await
            .map_err(|e| (*e).clone())?;

        Ok(FetchedTile {
            key,
            image,
            source: loaded_from.unwrap_or(FetchSource::Memory),
        })
    }

    async fn load_uncached(
        &self,
        key: TileKey,
    ) -> Result<(Arc<TileImage>, FetchSource), FetchError> {
        match self.disk.read(key).await {
            Ok(Some(bytes)) => match TileImage::decode(&bytes) {
                Ok(image) => {
                    debug!(tile = %key, bytes = bytes.len(), "Disk cache hit");
                    return Ok((Arc::new(image), FetchSource::Disk));
                }
                Err(e) => {
                    warn!(tile = %key, error = %e, "Cached tile is corrupt, downloading again");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(tile = %key, error = %e, "Disk cache read failed, treating as miss");
            }
        }

        let bytes = self.download_with_retry(key).await?;
        let image =
            TileImage::decode(&bytes).map_err(|source| FetchError::Decode { key, source })?;

        if let Err(e) = self.disk.write(key, bytes).await {
            warn!(tile = %key, error = %e, "Failed to persist tile to disk cache");
        }

        debug!(tile = %key, provider = self.provider.name(), "Tile downloaded");
        Ok((Arc::new(image), FetchSource::Network))
    }

    async fn download_with_retry(&self, key: TileKey) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 1;
        loop {
            let error = match self.provider.download_tile(key).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => e,
            };

            let delay = if error.is_retryable() {
                self.retry.delay_for_attempt(attempt)
            } else {
                None
            };

            match delay {
                Some(delay) => {
                    debug!(
                        tile = %key,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Download failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(tile = %key, attempts = attempt, error = %error, "Download failed");
                    return Err(FetchError::Download {
                        key,
                        attempts: attempt,
                        source: error,
                    });
                }
            }
        }
    }
}
