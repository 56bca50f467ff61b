//! Composition of resolved tiles into a single raster.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coord::{TileKey, TileRange, TILE_SIZE};
use crate::mosaic::{GeoBounds, MapProjector, MosaicError, ProjectionError};
use crate::tile::TileImage;

/// Largest raster edge the stitcher will allocate, in pixels.
pub const MAX_MOSAIC_EDGE: u32 = 32_768;

/// A stitched map raster and its geographic extent.
#[derive(Debug, Clone)]
pub struct Mosaic {
    image: RgbaImage,
    bounds: GeoBounds,
    range: TileRange,
    tile_count: usize,
}

impl Mosaic {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn range(&self) -> &TileRange {
        &self.range
    }

    /// Number of tiles placed on the raster.
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Projector for this mosaic's bounds.
    pub fn projector(&self) -> Result<MapProjector, ProjectionError> {
        MapProjector::new(self.bounds)
    }

    /// Writes the raster as PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> Result<(), MosaicError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    pub fn metadata(&self) -> MosaicMetadata {
        MosaicMetadata {
            zoom: self.range.zoom,
            width: self.width(),
            height: self.height(),
            tile_count: self.tile_count,
            bounds: self.bounds,
            range: self.range,
        }
    }

    /// Consumes the mosaic, returning the raster.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Serializable description of a saved mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MosaicMetadata {
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub tile_count: usize,
    pub bounds: GeoBounds,
    pub range: TileRange,
}

impl MosaicMetadata {
    pub fn write_json(&self, path: &Path) -> Result<(), MosaicError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self, MosaicError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Stitches tiles into one raster.
///
/// The raster spans the extremal x/y of the given tiles. Row 0 is the
/// northern edge, so tile `(x, y)` lands at pixel
/// `((x - min_x) * 256, (y - min_y) * 256)`. Positions inside the range
/// without a tile stay transparent.
pub fn stitch<'a, I>(tiles: I) -> Result<Mosaic, MosaicError>
where
    I: IntoIterator<Item = (TileKey, &'a TileImage)>,
{
    let tiles: Vec<_> = tiles.into_iter().collect();
    let zoom = tiles.first().ok_or(MosaicError::Empty)?.0.zoom;
    if let Some((key, _)) = tiles.iter().find(|(key, _)| key.zoom != zoom) {
        return Err(MosaicError::MixedZoom {
            expected: zoom,
            found: key.zoom,
        });
    }

    let range =
        TileRange::from_keys(tiles.iter().map(|(key, _)| key)).ok_or(MosaicError::Empty)?;
    let (width_tiles, height_tiles) = (range.width_tiles(), range.height_tiles());
    let max_tiles = MAX_MOSAIC_EDGE / TILE_SIZE;
    if width_tiles > max_tiles || height_tiles > max_tiles {
        return Err(MosaicError::TooLarge {
            width_tiles,
            height_tiles,
        });
    }

    let mut canvas = RgbaImage::new(width_tiles * TILE_SIZE, height_tiles * TILE_SIZE);
    for (key, tile) in &tiles {
        let x = (key.x - range.min_x) * TILE_SIZE;
        let y = (key.y - range.min_y) * TILE_SIZE;
        image::imageops::replace(&mut canvas, tile.pixels(), x as i64, y as i64);
    }

    debug!(
        zoom = zoom,
        tiles = tiles.len(),
        width = canvas.width(),
        height = canvas.height(),
        "Mosaic stitched"
    );

    Ok(Mosaic {
        image: canvas,
        bounds: GeoBounds::from_range(&range),
        range,
        tile_count: tiles.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn tile(color: [u8; 4]) -> TileImage {
        TileImage::from_rgba(RgbaImage::from_pixel(256, 256, Rgba(color))).unwrap()
    }

    fn key(x: i64, y: i64) -> TileKey {
        TileKey::new(x, y, 12).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let result = stitch(std::iter::empty());
        assert!(matches!(result, Err(MosaicError::Empty)));
    }

    #[test]
    fn test_three_by_three() {
        let tiles: Vec<_> = (654..=656)
            .flat_map(|x| {
                (1581..=1583).map(move |y| (key(x, y), tile([x as u8, y as u8, 0, 255])))
            })
            .collect();

        let mosaic = stitch(tiles.iter().map(|(k, t)| (*k, t))).unwrap();
        assert_eq!((mosaic.width(), mosaic.height()), (768, 768));
        assert_eq!(mosaic.tile_count(), 9);
        assert_eq!(mosaic.range().min_x, 654);
        assert_eq!(mosaic.range().min_y, 1581);
    }

    #[test]
    fn test_north_row_is_at_top() {
        let north = tile([255, 0, 0, 255]);
        let south = tile([0, 0, 255, 255]);
        let mosaic = stitch([(key(10, 20), &north), (key(10, 21), &south)]).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (256, 512));
        assert_eq!(mosaic.image().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(mosaic.image().get_pixel(0, 511), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_columns_left_to_right_and_gaps_transparent() {
        let west = tile([1, 1, 1, 255]);
        let east = tile([2, 2, 2, 255]);
        // Diagonal pair leaves two empty slots
        let mosaic = stitch([(key(5, 5), &west), (key(6, 6), &east)]).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (512, 512));
        assert_eq!(mosaic.image().get_pixel(10, 10), &Rgba([1, 1, 1, 255]));
        assert_eq!(mosaic.image().get_pixel(300, 300), &Rgba([2, 2, 2, 255]));
        assert_eq!(mosaic.image().get_pixel(300, 10), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_dimensions_follow_extremal_range() {
        let t = tile([9, 9, 9, 255]);
        let mosaic = stitch([(key(100, 200), &t), (key(103, 201), &t)]).unwrap();
        assert_eq!(mosaic.width(), 4 * 256);
        assert_eq!(mosaic.height(), 2 * 256);
    }

    #[test]
    fn test_mixed_zoom_rejected() {
        let t = tile([0, 0, 0, 255]);
        let other = TileKey::new(1, 1, 11).unwrap();
        let result = stitch([(key(1, 1), &t), (other, &t)]);
        assert!(matches!(
            result,
            Err(MosaicError::MixedZoom {
                expected: 12,
                found: 11
            })
        ));
    }

    #[test]
    fn test_too_large_rejected() {
        let t = tile([0, 0, 0, 255]);
        let result = stitch([(key(0, 0), &t), (key(200, 0), &t)]);
        assert!(matches!(result, Err(MosaicError::TooLarge { .. })));
    }

    #[test]
    fn test_bounds_match_range() {
        let t = tile([0, 0, 0, 255]);
        let mosaic = stitch([(key(655, 1582), &t)]).unwrap();
        assert_eq!(*mosaic.bounds(), GeoBounds::from_range(mosaic.range()));
        assert!(mosaic.projector().is_ok());
    }

    #[test]
    fn test_save_png_and_metadata() {
        let temp_dir = tempfile::tempdir().unwrap();
        let t = tile([5, 6, 7, 255]);
        let mosaic = stitch([(key(655, 1582), &t)]).unwrap();

        let png = temp_dir.path().join("out/map.png");
        mosaic.save_png(&png).unwrap();
        let reloaded = image::open(&png).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (256, 256));
        assert_eq!(reloaded.get_pixel(1, 1), &Rgba([5, 6, 7, 255]));

        let json = temp_dir.path().join("out/map.png.json");
        mosaic.metadata().write_json(&json).unwrap();
        let meta = MosaicMetadata::read_json(&json).unwrap();
        assert_eq!(meta.range, *mosaic.range());
        assert_eq!((meta.width, meta.height, meta.tile_count), (256, 256, 1));
        assert!((meta.bounds.min_lat - mosaic.bounds().min_lat).abs() < 1e-12);
        assert!((meta.bounds.max_lon - mosaic.bounds().max_lon).abs() < 1e-12);
    }
}
