//! Configuration file handling for `~/.tilemosaic/config.ini`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::cache::{DEFAULT_DISK_IO_CONCURRENCY, DEFAULT_MEMORY_CACHE_SIZE};
use crate::fetch::{RetryPolicy, DEFAULT_INITIAL_DELAY_MS};
use crate::provider::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, OSM_URL_TEMPLATE};
use crate::session::{
    CompletionPolicy, SessionConfig, DEFAULT_DEADLINE, DEFAULT_MAX_CONCURRENT_FETCHES,
};

/// Zoom level used when a request does not name one.
pub const DEFAULT_ZOOM: u8 = 12;

/// Retries after the first failed download of a tile.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(std::io::Error),

    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// XYZ URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
    pub user_agent: String,
    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub directory: PathBuf,
    pub memory_size: u64,
    pub disk_io_concurrency: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    pub max_concurrent: usize,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Fetch-phase budget of one request, in seconds.
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MosaicSettings {
    /// Fraction of tiles that must resolve. `1.0` requires all of them.
    pub min_success_ratio: f64,
}

/// User configuration, defaults overlaid with `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub map: MapSettings,
    pub provider: ProviderSettings,
    pub cache: CacheSettings,
    pub download: DownloadSettings,
    pub mosaic: MosaicSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            map: MapSettings { zoom: DEFAULT_ZOOM },
            provider: ProviderSettings {
                url: OSM_URL_TEMPLATE.to_string(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            cache: CacheSettings {
                directory: default_cache_directory(),
                memory_size: DEFAULT_MEMORY_CACHE_SIZE,
                disk_io_concurrency: DEFAULT_DISK_IO_CONCURRENCY,
            },
            download: DownloadSettings {
                max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
                max_retries: DEFAULT_MAX_RETRIES,
                retry_base_delay_ms: DEFAULT_INITIAL_DELAY_MS,
                deadline: DEFAULT_DEADLINE.as_secs(),
            },
            mosaic: MosaicSettings {
                min_success_ratio: 1.0,
            },
        }
    }
}

impl ConfigFile {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads configuration from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }
        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(ConfigFileError::WriteError)
    }

    /// Writes the default config file if none exists and returns its path.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Session tunables derived from the `[download]` and `[mosaic]` sections.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_max_concurrent_fetches(self.download.max_concurrent)
            .with_deadline(Duration::from_secs(self.download.deadline))
            .with_policy(CompletionPolicy::from_min_ratio(
                self.mosaic.min_success_ratio,
            ))
    }

    /// Download retry policy: one attempt plus `max_retries` retries.
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.download.max_retries == 0 {
            return RetryPolicy::None;
        }
        RetryPolicy::exponential_with_delay(
            self.download.max_retries + 1,
            Duration::from_millis(self.download.retry_base_delay_ms),
        )
    }
}

/// `~/.tilemosaic`
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tilemosaic")
}

/// `~/.tilemosaic/config.ini`
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Platform cache directory for tiles, falling back under the config directory.
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("tilemosaic"))
        .unwrap_or_else(|| config_directory().join("cache"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.provider.url, OSM_URL_TEMPLATE);
        assert_eq!(config.cache.memory_size, DEFAULT_MEMORY_CACHE_SIZE);
        assert_eq!(config.download.max_concurrent, 8);
        assert_eq!(config.download.deadline, 120);
        assert_eq!(config.mosaic.min_success_ratio, 1.0);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.ini");

        let mut config = ConfigFile::default();
        config.map.zoom = 15;
        config.cache.directory = temp_dir.path().join("tiles");
        config.cache.memory_size = 64 * 1024 * 1024;
        config.download.max_retries = 5;
        config.mosaic.min_success_ratio = 0.9;
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_session_config_from_settings() {
        let mut config = ConfigFile::default();
        config.download.max_concurrent = 3;
        config.download.deadline = 45;
        config.mosaic.min_success_ratio = 0.75;

        let session = config.session_config();
        assert_eq!(session.max_concurrent_fetches, 3);
        assert_eq!(session.deadline, Duration::from_secs(45));
        assert_eq!(
            session.policy,
            CompletionPolicy::AllowPartial { min_ratio: 0.75 }
        );
    }

    #[test]
    fn test_retry_policy() {
        let mut config = ConfigFile::default();
        assert_eq!(config.retry_policy().max_attempts(), 4);

        config.download.max_retries = 0;
        assert_eq!(config.retry_policy(), RetryPolicy::None);
    }
}
