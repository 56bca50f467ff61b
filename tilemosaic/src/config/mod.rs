//! User configuration.
//!
//! Settings are read from `~/.tilemosaic/config.ini`; every missing key
//! falls back to its default, so an absent file is a valid configuration.

mod file;
mod parser;
mod size;
mod writer;

pub use file::{
    config_directory, config_file_path, default_cache_directory, CacheSettings, ConfigFile,
    ConfigFileError, DownloadSettings, MapSettings, MosaicSettings, ProviderSettings,
    DEFAULT_MAX_RETRIES, DEFAULT_ZOOM,
};
pub use size::{format_size, parse_size, SizeParseError};
