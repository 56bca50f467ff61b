//! CLI command implementations.
//!
//! - [`build`] - resolve and stitch the mosaic for a drive
//! - [`project`] - map a geo-point into a saved mosaic
//! - [`tile`] - show the tile covering a geo-point
//! - [`cache`] - disk cache maintenance (clear, stats)
//! - [`init`] - configuration initialization

pub mod build;
pub mod cache;
pub mod common;
pub mod init;
pub mod project;
pub mod tile;
