//! Geo-point to texture coordinate projection.

use crate::coord::GeoPoint;
use crate::mosaic::{GeoBounds, ProjectionError};

/// Maps geo-points into centred, normalised coordinates of a mosaic.
///
/// `u` grows eastward and `v` northward, both in `[-0.5, 0.5]` for
/// points inside the bounds, with the centre of the mosaic at `(0, 0)`.
/// Interpolation is linear in degrees across the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjector {
    bounds: GeoBounds,
    lat_span: f64,
    lon_span: f64,
}

impl MapProjector {
    pub fn new(bounds: GeoBounds) -> Result<Self, ProjectionError> {
        let lat_span = bounds.max_lat - bounds.min_lat;
        let lon_span = bounds.max_lon - bounds.min_lon;
        let finite = [bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon]
            .iter()
            .all(|v| v.is_finite());

        if !finite || lat_span == 0.0 || lon_span == 0.0 {
            return Err(ProjectionError::DegenerateBounds {
                min_lat: bounds.min_lat,
                min_lon: bounds.min_lon,
                max_lat: bounds.max_lat,
                max_lon: bounds.max_lon,
            });
        }

        Ok(Self {
            bounds,
            lat_span,
            lon_span,
        })
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Projects a point to `(u, v)`. Points outside the bounds project
    /// outside `[-0.5, 0.5]`; they are not clamped.
    pub fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let u = (lon - self.bounds.min_lon) / self.lon_span - 0.5;
        let v = (1.0 - (lat - self.bounds.min_lat) / self.lat_span) - 0.5;
        (u, v)
    }

    pub fn project_point(&self, point: GeoPoint) -> (f64, f64) {
        self.project(point.lat, point.lon)
    }

    /// Projects a point to pixel coordinates of a `width`×`height` raster,
    /// origin top-left.
    pub fn to_pixel(&self, lat: f64, lon: f64, width: u32, height: u32) -> (f64, f64) {
        let (u, v) = self.project(lat, lon);
        ((u + 0.5) * width as f64, (0.5 - v) * height as f64)
    }
}
