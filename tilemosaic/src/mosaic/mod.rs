//! Mosaic stitching and viewport projection.
//!
//! [`stitch`] composes the resolved tiles of one request into a single
//! top-down RGBA raster and computes its [`GeoBounds`]. A [`MapProjector`]
//! built from those bounds maps geo-points into the raster's centred,
//! normalised texture space.

mod bounds;
mod error;
mod projector;
mod stitcher;

pub use bounds::GeoBounds;
pub use error::{MosaicError, ProjectionError};
pub use projector::MapProjector;
pub use stitcher::{stitch, Mosaic, MosaicMetadata, MAX_MOSAIC_EDGE};
