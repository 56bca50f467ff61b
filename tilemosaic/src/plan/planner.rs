use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::coord::{to_tile_key, CoordError, GeoPoint, TileKey, TileRange, MAX_ZOOM};
use crate::plan::DownloadProgress;

/// Computes the tiles needed to cover a set of geo-points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlanner {
    zoom: u8,
}

impl TilePlanner {
    /// Creates a planner for `zoom`.
    pub fn new(zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        Ok(Self { zoom })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Plans the tile set for `points`.
    ///
    /// Each point contributes the tile it falls in plus the eight tiles
    /// around it. Neighbours past the edge of the grid are skipped. Points
    /// that cannot be converted are skipped and counted.
    pub fn plan(&self, points: &[GeoPoint]) -> TileSet {
        let mut keys = BTreeSet::new();
        let mut skipped_neighbors = 0;
        let mut rejected_points = 0;

        for point in points {
            let primary = match to_tile_key(point.lat, point.lon, self.zoom) {
                Ok(key) => key,
                Err(e) => {
                    warn!(point = %point, error = %e, "Skipping point outside the map");
                    rejected_points += 1;
                    continue;
                }
            };

            let before = keys.len();
            let mut in_grid = 0;
            for key in primary.neighbors() {
                keys.insert(key);
                in_grid += 1;
            }
            skipped_neighbors += 9 - in_grid;
            debug!(
                point = %point,
                tile = %primary,
                added = keys.len() - before,
                "Planned neighbourhood"
            );
        }

        if skipped_neighbors > 0 {
            debug!(skipped = skipped_neighbors, "Neighbours outside the grid were skipped");
        }

        TileSet {
            zoom: self.zoom,
            keys,
            skipped_neighbors,
            rejected_points,
        }
    }
}

/// The de-duplicated tiles of one request at one zoom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    zoom: u8,
    keys: BTreeSet<TileKey>,
    skipped_neighbors: usize,
    rejected_points: usize,
}

impl TileSet {
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.keys.contains(key)
    }

    /// Keys in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &TileKey> {
        self.keys.iter()
    }

    /// Neighbour candidates dropped because they fell off the grid. Counted
    /// per point, before de-duplication.
    pub fn skipped_neighbors(&self) -> usize {
        self.skipped_neighbors
    }

    /// Input points that could not be converted to a tile.
    pub fn rejected_points(&self) -> usize {
        self.rejected_points
    }

    /// Extent of the set, or `None` when empty.
    pub fn range(&self) -> Option<TileRange> {
        TileRange::from_keys(&self.keys)
    }

    /// Fresh progress counters with `needed` equal to the set size.
    pub fn progress(&self) -> DownloadProgress {
        DownloadProgress::new(self.keys.len())
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a TileKey;
    type IntoIter = std::collections::btree_set::Iter<'a, TileKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
