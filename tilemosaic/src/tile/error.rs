//! Error types for tile image decoding.

use std::fmt;

/// Errors that can occur while decoding a tile image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileImageError {
    /// The bytes are not a decodable raster image.
    DecodeFailed(String),
    /// The decoded image is not a 256×256 tile.
    InvalidDimensions { width: u32, height: u32 },
    /// The payload was empty.
    Empty,
}

impl fmt::Display for TileImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileImageError::DecodeFailed(msg) => write!(f, "Image decode failed: {}", msg),
            TileImageError::InvalidDimensions { width, height } => {
                write!(
                    f,
                    "Invalid tile dimensions {}×{} (expected {size}×{size})",
                    width,
                    height,
                    size = crate::coord::TILE_SIZE
                )
            }
            TileImageError::Empty => write!(f, "Empty tile payload"),
        }
    }
}

impl std::error::Error for TileImageError {}

impl From<image::ImageError> for TileImageError {
    fn from(err: image::ImageError) -> Self {
        TileImageError::DecodeFailed(err.to_string())
    }
}
