//! Cache statistics snapshots.

use std::fmt;

use serde::Serialize;

/// Point-in-time statistics of the in-memory tile cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Loads that ran a fetch. Callers that joined an in-flight load of the
    /// same key are not counted.
    pub loads: u64,
    pub entry_count: u64,
    pub size_bytes: u64,
    pub max_size_bytes: u64,
}

impl CacheStats {
    /// Fraction of lookups served from memory, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} / {} bytes, {} hits, {} misses ({:.1}% hit rate), {} evictions",
            self.entry_count,
            self.size_bytes,
            self.max_size_bytes,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions
        )
    }
}

/// Usage of the on-disk tile store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub files: u64,
    pub bytes: u64,
}
