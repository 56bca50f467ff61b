//! Init command - write the configuration file.

use std::path::Path;

use tilemosaic::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Writes the config to `path` (or the default location).
///
/// An existing file is only rewritten with `force`, which resets it to
/// defaults.
pub fn run(path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);

    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to reset it to defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to change the tile server, cache location and limits.");
    println!("Command-line arguments override config file values when given.");
    Ok(())
}
