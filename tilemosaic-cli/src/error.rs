//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tilemosaic::app::AppError;
use tilemosaic::config::ConfigFileError;
use tilemosaic::coord::CoordError;
use tilemosaic::mosaic::{MosaicError, ProjectionError};
use tilemosaic::session::SessionError;

/// Failures listed before the rest are summarised.
const MAX_LISTED_FAILURES: usize = 10;

#[derive(Debug)]
pub enum CliError {
    LoggingInit(std::io::Error),
    Config(ConfigFileError),
    App(AppError),
    Runtime(std::io::Error),
    /// No points were given on the command line or in a file.
    NoPoints,
    PointsFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    Session(SessionError),
    Output { path: PathBuf, error: MosaicError },
    Metadata { path: PathBuf, error: MosaicError },
    Coord(CoordError),
    Projection(ProjectionError),
    CacheClear(std::io::Error),
    CacheStats(std::io::Error),
}

impl CliError {
    /// Prints the error with any follow-up hints and exits with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Session(SessionError::Incomplete { failures, .. }) => {
                eprintln!();
                eprintln!("Missing tiles:");
                for failure in failures.iter().take(MAX_LISTED_FAILURES) {
                    eprintln!("  {}: {}", failure.key, failure);
                }
                if failures.len() > MAX_LISTED_FAILURES {
                    eprintln!("  ... and {} more", failures.len() - MAX_LISTED_FAILURES);
                }
                eprintln!();
                eprintln!("Re-run to retry the missing tiles, or pass --allow-partial <RATIO>");
                eprintln!("to stitch a mosaic with gaps.");
            }
            CliError::NoPoints => {
                eprintln!();
                eprintln!("Pass --point LAT,LON (repeatable) or --points-file FILE.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or run 'tilemosaic init --force' to reset it.",
                    tilemosaic::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to create async runtime: {}", e),
            CliError::NoPoints => write!(f, "No drive points given"),
            CliError::PointsFile { path, line, reason } => {
                write!(f, "{}:{}: {}", path.display(), line, reason)
            }
            CliError::Session(e) => write!(f, "Failed to build mosaic: {}", e),
            CliError::Output { path, error } => {
                write!(f, "Failed to write mosaic '{}': {}", path.display(), error)
            }
            CliError::Metadata { path, error } => {
                write!(f, "Failed to access metadata '{}': {}", path.display(), error)
            }
            CliError::Coord(e) => write!(f, "Invalid coordinates: {}", e),
            CliError::Projection(e) => write!(f, "Cannot project into mosaic: {}", e),
            CliError::CacheClear(e) => write!(f, "Failed to clear disk cache: {}", e),
            CliError::CacheStats(e) => write!(f, "Failed to read disk cache: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) | CliError::Runtime(e) => Some(e),
            CliError::CacheClear(e) | CliError::CacheStats(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Session(e) => Some(e),
            CliError::Output { error, .. } | CliError::Metadata { error, .. } => Some(error),
            CliError::Coord(e) => Some(e),
            CliError::Projection(e) => Some(e),
            CliError::NoPoints | CliError::PointsFile { .. } => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<ProjectionError> for CliError {
    fn from(e: ProjectionError) -> Self {
        CliError::Projection(e)
    }
}
