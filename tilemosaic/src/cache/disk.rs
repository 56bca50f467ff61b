//! Persistent on-disk tile store.
//!
//! Tiles are stored as the encoded bytes the provider served, one file per
//! key, under `<root>/Tiles/<zoom>/<x>_<y>_<zoom>.png`. Directories are
//! created on demand.
//!
//! All filesystem work runs on Tokio's blocking pool. A semaphore bounds the
//! number of concurrent disk operations so a large tile set cannot flood the
//! filesystem with hundreds of simultaneous reads.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::cache::DiskUsage;
use crate::coord::TileKey;

/// Name of the directory holding tiles below the cache root.
pub const TILES_DIR: &str = "Tiles";

/// Default number of concurrent disk operations.
pub const DEFAULT_DISK_IO_CONCURRENCY: usize = 16;

/// Storage of encoded tiles keyed by [`TileKey`].
pub trait DiskCache: Send + Sync {
    /// Read the encoded tile. A missing file is `Ok(None)`.
    fn read(&self, key: TileKey) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;

    /// Store the encoded tile, replacing any existing file atomically.
    fn write(&self, key: TileKey, data: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send;
}

/// Returns the path of a tile file below `root`.
pub fn tile_path(root: &Path, key: &TileKey) -> PathBuf {
    root.join(TILES_DIR)
        .join(key.zoom.to_string())
        .join(format!("{}_{}_{}.png", key.x, key.y, key.zoom))
}

/// Filesystem-backed [`DiskCache`].
pub struct DiskTileCache {
    root: PathBuf,
    io_limiter: Arc<Semaphore>,
    // Distinguishes temp files of overlapping writes within this process.
    write_seq: AtomicU64,
}

impl DiskTileCache {
    /// Create a disk cache rooted at `root` allowing `max_concurrent_io`
    /// simultaneous filesystem operations.
    pub fn new(root: impl Into<PathBuf>, max_concurrent_io: usize) -> Self {
        Self {
            root: root.into(),
            io_limiter: Arc::new(Semaphore::new(max_concurrent_io.max(1))),
            write_seq: AtomicU64::new(0),
        }
    }

    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_DISK_IO_CONCURRENCY)
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a tile is stored at.
    pub fn path_for(&self, key: &TileKey) -> PathBuf {
        tile_path(&self.root, key)
    }

    /// Counts stored tiles and their total size.
    pub fn usage(&self) -> io::Result<DiskUsage> {
        disk_cache_stats(&self.root)
    }
}

impl DiskCache for DiskTileCache {
    async fn read(&self, key: TileKey) -> io::Result<Option<Vec<u8>>> {
        let path = self.path_for(&key);
        let _permit = self
            .io_limiter
            .acquire()
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || match std::fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        })
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

        trace!(tile = %key, hit = matches!(result, Ok(Some(_))), "Disk cache read");
        result
    }

    async fn write(&self, key: TileKey, data: Vec<u8>) -> io::Result<()> {
        let path = self.path_for(&key);
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("png.{}.{}.tmp", std::process::id(), seq));
        let len = data.len();

        let _permit = self
            .io_limiter
            .acquire()
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&tmp, data)?;
            std::fs::rename(&tmp, &path).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                e
            })
        })
        .await
        .map_err(|e| io::Error::other(e.to_string()))??;

        debug!(tile = %key, bytes = len, "Tile persisted to disk cache");
        Ok(())
    }
}

/// Counts the tile files below `root` and their total size.
///
/// A missing cache directory counts as empty.
pub fn disk_cache_stats(root: &Path) -> io::Result<DiskUsage> {
    let mut usage = DiskUsage::default();
    let tiles = root.join(TILES_DIR);
    if !tiles.exists() {
        return Ok(usage);
    }

    for zoom_dir in std::fs::read_dir(&tiles)? {
        let zoom_dir = zoom_dir?;
        if !zoom_dir.file_type()?.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(zoom_dir.path())? {
            let entry = entry?;
            let meta = entry.metadata()?;
            let is_tile = entry.path().extension().is_some_and(|ext| ext == "png");
            if meta.is_file() && is_tile {
                usage.files += 1;
                usage.bytes += meta.len();
            }
        }
    }

    Ok(usage)
}

/// Removes every stored tile below `root`, returning what was removed.
pub fn clear_disk_cache(root: &Path) -> io::Result<DiskUsage> {
    let usage = disk_cache_stats(root)?;
    let tiles = root.join(TILES_DIR);
    if tiles.exists() {
        std::fs::remove_dir_all(&tiles)?;
    }
    debug!(root = %root.display(), files = usage.files, bytes = usage.bytes, "Disk cache cleared");
    Ok(usage)
}
