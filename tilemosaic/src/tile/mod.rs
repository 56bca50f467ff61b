//! Decoded map tiles.
//!
//! A [`TileImage`] is a validated 256×256 RGBA raster. Tiles are shared
//! between the memory cache and in-flight requests as `Arc<TileImage>`.

mod error;

pub use error::TileImageError;

use image::RgbaImage;

use crate::coord::TILE_SIZE;

/// A decoded 256×256 RGBA map tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileImage {
    pixels: RgbaImage,
}

impl TileImage {
    /// Decodes an encoded tile (PNG or JPEG).
    ///
    /// RGB and palette sources are converted to RGBA. Anything that is not
    /// exactly 256×256 is rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, TileImageError> {
        if bytes.is_empty() {
            return Err(TileImageError::Empty);
        }
        let decoded = image::load_from_memory(bytes)?;
        Self::from_rgba(decoded.to_rgba8())
    }

    /// Wraps an existing RGBA raster, validating its dimensions.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, TileImageError> {
        let (width, height) = pixels.dimensions();
        if width != TILE_SIZE || height != TILE_SIZE {
            return Err(TileImageError::InvalidDimensions { width, height });
        }
        Ok(Self { pixels })
    }

    /// Borrow the underlying raster.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Approximate heap footprint, used to weigh cache entries.
    pub fn size_bytes(&self) -> usize {
        self.pixels.as_raw().len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba};
    use std::io::Cursor;

    /// Encodes a solid-colour 256×256 PNG.
    pub(crate) fn solid_png(color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba(color));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let tile = TileImage::decode(&solid_png([10, 20, 30, 255])).unwrap();
        assert_eq!(tile.pixels().dimensions(), (256, 256));
        assert_eq!(tile.pixels().get_pixel(17, 200), &Rgba([10, 20, 30, 255]));
        assert_eq!(tile.size_bytes(), 256 * 256 * 4);
    }

    #[test]
    fn test_decode_rgb_becomes_opaque_rgba() {
        let img = RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb([1, 2, 3]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        let tile = TileImage::decode(buf.get_ref()).unwrap();
        assert_eq!(tile.pixels().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let img = RgbaImage::new(128, 256);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        let err = TileImage::decode(buf.get_ref()).unwrap_err();
        assert_eq!(
            err,
            TileImageError::InvalidDimensions {
                width: 128,
                height: 256
            }
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = TileImage::decode(b"not an image").unwrap_err();
        assert!(matches!(err, TileImageError::DecodeFailed(_)));
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(TileImage::decode(&[]), Err(TileImageError::Empty));
    }
}
