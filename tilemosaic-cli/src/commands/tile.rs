//! Tile command - show the tile covering a geo-point.

use clap::Args;
use tilemosaic::cache::tile_path;
use tilemosaic::config::ConfigFile;
use tilemosaic::coord::{tile_to_lat_lon, to_tile_key};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct TileArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Zoom level (defaults to [map] zoom from the config)
    #[arg(long)]
    pub zoom: Option<u8>,
}

pub fn run(args: TileArgs, config: &ConfigFile) -> Result<(), CliError> {
    let zoom = args.zoom.unwrap_or(config.map.zoom);
    let key = to_tile_key(args.lat, args.lon, zoom)?;

    let (north, west) = key.corner_lat_lon();
    let (south, east) = tile_to_lat_lon(key.x as i64 + 1, key.y as i64 + 1, zoom);
    let path = tile_path(&config.cache.directory, &key);

    println!("Tile: {} (x={}, y={}, zoom={})", key, key.x, key.y, key.zoom);
    println!("  North-west: {:.6}, {:.6}", north, west);
    println!("  South-east: {:.6}, {:.6}", south, east);
    println!("  Neighbours in grid: {}", key.neighbors().count());
    println!(
        "  Disk cache: {} ({})",
        path.display(),
        if path.exists() { "cached" } else { "not cached" }
    );
    Ok(())
}
