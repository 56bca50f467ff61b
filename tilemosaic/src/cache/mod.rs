//! Two-level tile cache.
//!
//! - [`MemoryTileCache`]: decoded tiles shared across requests, bounded by a
//!   memory budget, with coalesced loads.
//! - [`DiskTileCache`]: encoded tiles persisted between runs.

mod disk;
mod memory;
mod stats;

pub use disk::{
    clear_disk_cache, disk_cache_stats, tile_path, DiskCache, DiskTileCache,
    DEFAULT_DISK_IO_CONCURRENCY, TILES_DIR,
};
pub use memory::{MemoryTileCache, DEFAULT_MEMORY_CACHE_SIZE};
pub use stats::{CacheStats, DiskUsage};
