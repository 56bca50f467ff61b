//! Error types for stitching and projection.

use thiserror::Error;

/// Errors that can occur while stitching or storing a mosaic.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// No tiles were supplied.
    #[error("no tiles to stitch")]
    Empty,

    /// The tiles do not share a zoom level.
    #[error("tiles mix zoom levels {expected} and {found}")]
    MixedZoom { expected: u8, found: u8 },

    /// The mosaic would not fit in a single raster.
    #[error("mosaic of {width_tiles}×{height_tiles} tiles is too large")]
    TooLarge { width_tiles: u32, height_tiles: u32 },

    #[error("failed to encode mosaic: {0}")]
    Encode(#[from] image::ImageError),

    #[error("invalid mosaic metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from building a viewport projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The bounds have zero extent or non-finite corners.
    #[error("degenerate bounds: lat {min_lat}..{max_lat}, lon {min_lon}..{max_lon}")]
    DegenerateBounds {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },
}
