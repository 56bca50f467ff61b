//! TileMosaic CLI - build map mosaics for recorded drives.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use commands::cache::CacheAction;
use commands::common::load_config;
use commands::project::ProjectArgs;
use commands::tile::TileArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilemosaic", version)]
#[command(about = "Build stitched OpenStreetMap mosaics for recorded drives", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.tilemosaic/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and stitch the tiles covering a drive
    Build(BuildArgs),
    /// Project a geo-point into a saved mosaic
    Project(ProjectArgs),
    /// Show the tile covering a geo-point
    Tile(TileArgs),
    /// Manage the disk tile cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file with defaults
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build(args) => commands::build::run(args, load_config(config_path)?),
        Command::Project(args) => commands::project::run(args),
        Command::Tile(args) => commands::tile::run(args, &load_config(config_path)?),
        Command::Cache { action } => commands::cache::run(action, &load_config(config_path)?),
        Command::Init { force } => commands::init::run(config_path, force),
    }
}
