//! TileMosaic - map tile acquisition and mosaic stitching for drive playback
//!
//! Given the geo-points of a recorded drive, this library determines the
//! OpenStreetMap tiles covering the route, resolves each through a memory
//! cache, a disk cache and the network, stitches them into a single raster
//! and projects geo-points into that raster's texture space.
//!
//! ```ignore
//! use tilemosaic::app::MosaicApp;
//! use tilemosaic::config::ConfigFile;
//! use tilemosaic::coord::GeoPoint;
//!
//! let app = MosaicApp::from_config(&ConfigFile::load()?)?;
//! let outcome = app.build(&[GeoPoint::new(37.8, -122.4)], None, None).await?;
//! let projector = outcome.mosaic.projector()?;
//! let (u, v) = projector.project(37.8, -122.4);
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod coord;
pub mod fetch;
pub mod logging;
pub mod mosaic;
pub mod plan;
pub mod provider;
pub mod session;
pub mod tile;
