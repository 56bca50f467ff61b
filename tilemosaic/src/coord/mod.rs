//! Coordinate conversion module
//!
//! Converts between geographic coordinates (latitude/longitude) and the
//! Web Mercator slippy-map tile grid used by OpenStreetMap tile servers.

mod types;

pub use types::{
    tiles_per_axis, CoordError, GeoPoint, TileKey, TileRange, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

/// Converts a longitude to a tile column.
///
/// The result is not range checked: `lon = 180` yields `2^zoom`.
#[inline]
pub fn lon_to_tile_x(lon: f64, zoom: u8) -> i64 {
    let n = 2.0_f64.powi(zoom as i32);
    ((lon + 180.0) / 360.0 * n).floor() as i64
}

/// Converts a latitude to a tile row.
///
/// Latitude is clamped to the Web Mercator limits first, so polar input
/// lands on the edge row instead of producing a non-finite value.
#[inline]
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> i64 {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat.clamp(MIN_LAT, MAX_LAT).to_radians();
    let merc = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln();
    ((1.0 - merc / PI) / 2.0 * n).floor() as i64
}

/// Converts a tile corner back to geographic coordinates.
///
/// Returns the latitude/longitude of the north-west corner of tile `(x, y)`.
/// `x = 2^zoom` and `y = 2^zoom` are accepted and address the far edges of
/// the grid.
#[inline]
pub fn tile_to_lat_lon(x: i64, y: i64, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);

    let lon = x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lat, lon)
}

/// Converts geographic coordinates to a validated tile key.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, clamped to ±[`MAX_LAT`]
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to [`MAX_ZOOM`])
///
/// # Errors
///
/// Non-finite coordinates, a longitude outside `[-180, 180]` or a zoom level
/// above [`MAX_ZOOM`].
pub fn to_tile_key(lat: f64, lon: f64, zoom: u8) -> Result<TileKey, CoordError> {
    if !lat.is_finite() {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    // The eastern and polar edges evaluate to one past the last index.
    let last = tiles_per_axis(zoom) as i64 - 1;
    let x = lon_to_tile_x(lon, zoom).clamp(0, last);
    let y = lat_to_tile_y(lat, zoom).clamp(0, last);

    TileKey::new(x, y, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_san_francisco_at_zoom_12() {
        assert_eq!(lon_to_tile_x(-122.4, 12), 655);
        assert_eq!(lat_to_tile_y(37.8, 12), 1582);
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        let key = to_tile_key(40.7128, -74.0060, 16).unwrap();
        assert_eq!(key.x, 19295);
        assert_eq!(key.y, 24640);
        assert_eq!(key.zoom, 16);
    }

    #[test]
    fn test_nearby_points_share_tile() {
        let a = to_tile_key(37.8, -122.4, 12).unwrap();
        let b = to_tile_key(37.801, -122.401, 12).unwrap();
        let c = to_tile_key(37.7995, -122.3995, 12).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_tile_to_lat_lon_northwest_corner() {
        let (lat, lon) = tile_to_lat_lon(655, 1582, 12);
        assert!((lat - 37.857_5).abs() < 1e-3, "lat was {}", lat);
        assert!((lon - -122.431_6).abs() < 1e-3, "lon was {}", lon);

        let (lat, lon) = tile_to_lat_lon(656, 1583, 12);
        assert!((lat - 37.788_1).abs() < 1e-3, "lat was {}", lat);
        assert!((lon - -122.343_75).abs() < 1e-6, "lon was {}", lon);
    }

    #[test]
    fn test_grid_origin_and_far_edge() {
        let (lat, lon) = tile_to_lat_lon(0, 0, 0);
        assert!((lat - MAX_LAT).abs() < 1e-6);
        assert_eq!(lon, -180.0);

        let (lat, lon) = tile_to_lat_lon(1, 1, 0);
        assert!((lat - MIN_LAT).abs() < 1e-6);
        assert_eq!(lon, 180.0);
    }

    #[test]
    fn test_polar_latitude_is_clamped() {
        assert_eq!(lat_to_tile_y(89.9, 4).clamp(0, 15), 0);
        assert!(lat_to_tile_y(89.9, 4) <= 0);
        assert!(lat_to_tile_y(-89.9, 4) >= 15);

        let key = to_tile_key(90.0, 0.0, 10).unwrap();
        assert_eq!(key.y, 0);
        let key = to_tile_key(-90.0, 0.0, 10).unwrap();
        assert_eq!(key.y, 1023);
    }

    #[test]
    fn test_antimeridian_maps_to_last_column() {
        let key = to_tile_key(0.0, 180.0, 3).unwrap();
        assert_eq!(key.x, 7);
        let key = to_tile_key(0.0, -180.0, 3).unwrap();
        assert_eq!(key.x, 0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            to_tile_key(f64::NAN, 0.0, 10),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            to_tile_key(0.0, 181.0, 10),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert!(matches!(
            to_tile_key(0.0, f64::INFINITY, 10),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert_eq!(to_tile_key(0.0, 0.0, 20), Err(CoordError::InvalidZoom(20)));
    }

    #[test]
    fn test_corner_lat_lon_matches_free_function() {
        let key = TileKey::new(655, 1582, 12).unwrap();
        assert_eq!(key.corner_lat_lon(), tile_to_lat_lon(655, 1582, 12));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_point_lies_inside_its_tile(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let key = to_tile_key(lat, lon, zoom)?;
                let (north, west) = tile_to_lat_lon(key.x as i64, key.y as i64, zoom);
                let (south, east) = tile_to_lat_lon(key.x as i64 + 1, key.y as i64 + 1, zoom);

                let eps = 1e-9;
                prop_assert!(lat <= north + eps && lat >= south - eps,
                    "lat {} outside [{}, {}] at zoom {}", lat, south, north, zoom);
                prop_assert!(lon >= west - eps && lon <= east + eps,
                    "lon {} outside [{}, {}] at zoom {}", lon, west, east, zoom);
            }

            #[test]
            fn test_tile_key_in_grid(
                lat in -90.0..90.0_f64,
                lon in -180.0..=180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let key = to_tile_key(lat, lon, zoom)?;
                let n = tiles_per_axis(zoom);
                prop_assert!(key.x < n);
                prop_assert!(key.y < n);
            }

            #[test]
            fn test_columns_monotonic_in_longitude(
                lon_a in -180.0..180.0_f64,
                lon_b in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let (lo, hi) = if lon_a <= lon_b { (lon_a, lon_b) } else { (lon_b, lon_a) };
                prop_assert!(lon_to_tile_x(lo, zoom) <= lon_to_tile_x(hi, zoom));
            }
        }
    }
}
