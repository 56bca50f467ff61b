//! Tile-set planning and progress accounting.

mod planner;
mod progress;

pub use planner::{TilePlanner, TileSet};
pub use progress::{DownloadProgress, ProgressObserver, ProgressSnapshot};
