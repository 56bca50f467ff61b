//! Cache management CLI commands.

use clap::Subcommand;
use tilemosaic::cache::{clear_disk_cache, disk_cache_stats};
use tilemosaic::config::{format_size, ConfigFile};

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Remove every cached tile from disk
    Clear,
    /// Show disk cache statistics
    Stats,
}

pub fn run(action: CacheAction, config: &ConfigFile) -> Result<(), CliError> {
    let cache_dir = &config.cache.directory;

    match action {
        CacheAction::Clear => {
            println!("Clearing disk cache at: {}", cache_dir.display());
            let removed = clear_disk_cache(cache_dir).map_err(CliError::CacheClear)?;
            println!(
                "Deleted {} files, freed {}",
                removed.files,
                format_size(removed.bytes)
            );
        }
        CacheAction::Stats => {
            println!("Disk cache: {}", cache_dir.display());
            let usage = disk_cache_stats(cache_dir).map_err(CliError::CacheStats)?;
            println!("  Files: {}", usage.files);
            println!("  Size:  {}", format_size(usage.bytes));
            println!(
                "  Memory budget: {}",
                format_size(config.cache.memory_size)
            );
        }
    }
    Ok(())
}
