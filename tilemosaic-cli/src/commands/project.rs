//! Project command - map a geo-point into a saved mosaic.

use std::path::PathBuf;

use clap::Args;
use tilemosaic::mosaic::{MapProjector, MosaicMetadata};

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Metadata sidecar written by `build` (<OUTPUT>.json)
    #[arg(long, value_name = "JSON")]
    pub metadata: PathBuf,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

pub fn run(args: ProjectArgs) -> Result<(), CliError> {
    let meta = MosaicMetadata::read_json(&args.metadata).map_err(|error| CliError::Metadata {
        path: args.metadata.clone(),
        error,
    })?;
    let projector = MapProjector::new(meta.bounds)?;

    let (u, v) = projector.project(args.lat, args.lon);
    let (px, py) = projector.to_pixel(args.lat, args.lon, meta.width, meta.height);

    println!("Texture: u={:.6} v={:.6}", u, v);
    println!("Pixel:   x={:.1} y={:.1}", px, py);
    if !meta.bounds.contains(args.lat, args.lon) {
        println!("Note: point lies outside the mosaic bounds");
    }
    Ok(())
}
