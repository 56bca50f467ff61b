//! Coordinate types for the slippy-map tile grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.051_128_78;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -MAX_LAT;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Minimum zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Maximum zoom level served by the OpenStreetMap tile servers.
pub const MAX_ZOOM: u8 = 19;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Errors produced by coordinate conversions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is NaN or infinite.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude is NaN, infinite or outside [-180, 180].
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    /// Zoom level above [`MAX_ZOOM`].
    #[error("Invalid zoom level: {0} (maximum is {max})", max = MAX_ZOOM)]
    InvalidZoom(u8),

    /// Tile index outside `[0, 2^zoom)`.
    #[error("Tile ({x}, {y}) is outside the grid at zoom {zoom}")]
    TileOutOfRange { x: i64, y: i64, zoom: u8 },
}

/// Number of tiles per axis at the given zoom level.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Identity of a single map tile.
///
/// Ordering is row-major (zoom, then `y`, then `x`) so sorted tile sets
/// iterate north to south, west to east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey {
    /// Zoom level
    pub zoom: u8,
    /// Tile row (grows southward)
    pub y: u32,
    /// Tile column (grows eastward)
    pub x: u32,
}

impl TileKey {
    /// Creates a tile key, validating that it lies inside the grid.
    pub fn new(x: i64, y: i64, zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = tiles_per_axis(zoom) as i64;
        if !(0..n).contains(&x) || !(0..n).contains(&y) {
            return Err(CoordError::TileOutOfRange { x, y, zoom });
        }
        Ok(Self {
            zoom,
            y: y as u32,
            x: x as u32,
        })
    }

    /// Returns this tile and its eight neighbours, skipping any that fall
    /// outside the grid.
    ///
    /// Keys are yielded in row-major order; the tile itself is the fifth
    /// element unless it sits on a grid edge.
    pub fn neighbors(&self) -> impl Iterator<Item = TileKey> {
        let (x, y, zoom) = (self.x as i64, self.y as i64, self.zoom);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (x + dx, y + dy)))
            .filter_map(move |(nx, ny)| TileKey::new(nx, ny, zoom).ok())
    }

    /// Latitude/longitude of this tile's north-west corner.
    pub fn corner_lat_lon(&self) -> (f64, f64) {
        super::tile_to_lat_lon(self.x as i64, self.y as i64, self.zoom)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Inclusive rectangle of tile indices at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
    pub zoom: u8,
}

impl TileRange {
    /// Computes the extremal range of a set of keys.
    ///
    /// Returns `None` for an empty input. Keys are assumed to share a zoom
    /// level; the zoom of the first key is used.
    pub fn from_keys<'a, I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TileKey>,
    {
        let mut iter = keys.into_iter();
        let first = iter.next()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            zoom: first.zoom,
        };
        Some(iter.fold(init, |mut range, key| {
            range.min_x = range.min_x.min(key.x);
            range.max_x = range.max_x.max(key.x);
            range.min_y = range.min_y.min(key.y);
            range.max_y = range.max_y.max(key.y);
            range
        }))
    }

    /// Width of the range in tiles.
    pub fn width_tiles(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height of the range in tiles.
    pub fn height_tiles(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Whether the key lies inside this range (same zoom required).
    pub fn contains(&self, key: &TileKey) -> bool {
        key.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&key.x)
            && (self.min_y..=self.max_y).contains(&key.y)
    }
}
