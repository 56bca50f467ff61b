use serde::{Deserialize, Serialize};

use crate::coord::{tile_to_lat_lon, TileRange};

/// Geographic extent of a stitched mosaic.
///
/// `(min_lat, min_lon)` is the north-west corner of the first tile and
/// `(max_lat, max_lon)` the south-east corner of the last one. Tile rows grow
/// southward, so `min_lat` is numerically the larger latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds covering every tile of `range`.
    pub fn from_range(range: &TileRange) -> Self {
        let (min_lat, min_lon) =
            tile_to_lat_lon(range.min_x as i64, range.min_y as i64, range.zoom);
        let (max_lat, max_lon) = tile_to_lat_lon(
            range.max_x as i64 + 1,
            range.max_y as i64 + 1,
            range.zoom,
        );
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Midpoint of the bounds in degrees.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Whether a point lies within the bounds, inclusive.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let (south, north) = if self.min_lat <= self.max_lat {
            (self.min_lat, self.max_lat)
        } else {
            (self.max_lat, self.min_lat)
        };
        (south..=north).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}
