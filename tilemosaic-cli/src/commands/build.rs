//! Build command - resolve, stitch and save the mosaic for a drive.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tilemosaic::app::MosaicApp;
use tilemosaic::config::ConfigFile;
use tilemosaic::coord::GeoPoint;
use tilemosaic::logging::{default_log_dir, default_log_file, init_logging};
use tilemosaic::plan::{ProgressObserver, ProgressSnapshot};
use tracing::info;

use super::common::{metadata_path, parse_point, read_points_file};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Drive point as LAT,LON (repeatable)
    #[arg(long = "point", value_name = "LAT,LON", value_parser = parse_point, allow_hyphen_values = true)]
    pub points: Vec<GeoPoint>,

    /// File with one LAT,LON pair per line
    #[arg(long, value_name = "FILE")]
    pub points_file: Option<PathBuf>,

    /// Zoom level (defaults to [map] zoom from the config)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Output PNG path; metadata is written next to it as <OUTPUT>.json
    #[arg(long, short)]
    pub output: PathBuf,

    /// Stitch when at least this fraction of tiles resolved (0.0-1.0)
    #[arg(long, value_name = "RATIO")]
    pub allow_partial: Option<f64>,

    /// Seconds allowed for fetching tiles
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,
}

impl BuildArgs {
    /// Applies command-line overrides on top of the config file.
    fn apply(&self, config: &mut ConfigFile) {
        if let Some(ratio) = self.allow_partial {
            config.mosaic.min_success_ratio = ratio.clamp(0.0, 1.0);
        }
        if let Some(deadline) = self.deadline {
            config.download.deadline = deadline.max(1);
        }
    }

    fn collect_points(&self) -> Result<Vec<GeoPoint>, CliError> {
        let mut points = self.points.clone();
        if let Some(path) = &self.points_file {
            points.extend(read_points_file(path)?);
        }
        if points.is_empty() {
            return Err(CliError::NoPoints);
        }
        Ok(points)
    }
}

pub fn run(args: BuildArgs, mut config: ConfigFile) -> Result<(), CliError> {
    args.apply(&mut config);
    let points = args.collect_points()?;

    let _logging = init_logging(&default_log_dir(), default_log_file())
        .map_err(CliError::LoggingInit)?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let app = MosaicApp::from_config(&config)?;
    let zoom = args.zoom.unwrap_or(app.default_zoom());

    info!(points = points.len(), zoom = zoom, "Building mosaic");
    let started = Instant::now();

    let bar = progress_bar();
    let observer: &ProgressObserver<'_> = &|snapshot| update_bar(&bar, snapshot);
    let result = runtime.block_on(app.build(&points, Some(zoom), Some(observer)));
    bar.finish_and_clear();
    let outcome = result?;

    let mosaic = &outcome.mosaic;
    save_outputs(mosaic, &args.output)?;

    println!(
        "Mosaic: {} ({}x{} px, {} tiles at zoom {})",
        args.output.display(),
        mosaic.width(),
        mosaic.height(),
        mosaic.tile_count(),
        zoom
    );
    println!(
        "Sources: {} memory, {} disk, {} network",
        outcome.sources.memory, outcome.sources.disk, outcome.sources.network
    );
    if outcome.partial {
        println!(
            "Partial: {} of {} tiles missing",
            outcome.failures.len(),
            outcome.summary.needed
        );
    }
    println!("Done in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}

fn save_outputs(mosaic: &tilemosaic::mosaic::Mosaic, output: &Path) -> Result<(), CliError> {
    mosaic.save_png(output).map_err(|error| CliError::Output {
        path: output.to_path_buf(),
        error,
    })?;

    let meta_path = metadata_path(output);
    mosaic
        .metadata()
        .write_json(&meta_path)
        .map_err(|error| CliError::Metadata {
            path: meta_path,
            error,
        })
}

fn progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} tiles {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(0).with_style(style)
}

fn update_bar(bar: &ProgressBar, snapshot: ProgressSnapshot) {
    bar.set_length(snapshot.needed as u64);
    bar.set_position((snapshot.completed + snapshot.failed) as u64);
    if snapshot.failed > 0 {
        bar.set_message(format!("({} failed)", snapshot.failed));
    }
}
