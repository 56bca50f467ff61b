//! Tile resolution through memory, disk and network.
//!
//! [`TileFetcher::resolve`] looks a tile up in the in-memory cache, then in
//! the disk cache, and finally downloads it from the provider. Whatever is
//! found below the memory level is promoted into memory; downloaded bytes
//! are also persisted to disk.

mod fetcher;
mod retry;

pub use fetcher::{FetchError, FetchSource, FetchedTile, TileFetcher};
pub use retry::{RetryPolicy, DEFAULT_INITIAL_DELAY_MS};

#[cfg(test)]
pub(crate) use fetcher::tests;
