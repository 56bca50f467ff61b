//! Application wiring.
//!
//! `MosaicApp` builds every component from a [`ConfigFile`] and hands them to
//! each other explicitly:
//!
//! ```text
//! AsyncReqwestClient ─► OsmTileProvider ─┐
//! MemoryTileCache ───────────────────────┼─► TileFetcher ─► MosaicSession
//! DiskTileCache ─────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::error::AppError;
use crate::cache::{DiskTileCache, MemoryTileCache};
use crate::config::{format_size, ConfigFile};
use crate::coord::{GeoPoint, MAX_ZOOM};
use crate::fetch::TileFetcher;
use crate::plan::ProgressObserver;
use crate::provider::{AsyncReqwestClient, OsmTileProvider};
use crate::session::{MosaicOutcome, MosaicSession, SessionError};

/// Provider used by the application: OSM-style XYZ over reqwest.
pub type AppProvider = OsmTileProvider<AsyncReqwestClient>;

/// Session type produced by [`MosaicApp`].
pub type AppSession = MosaicSession<AppProvider, DiskTileCache>;

/// A configured tile pipeline.
pub struct MosaicApp {
    session: AppSession,
    default_zoom: u8,
}

impl MosaicApp {
    /// Builds the pipeline described by `config`.
    ///
    /// Creates the cache directory if it does not exist yet.
    pub fn from_config(config: &ConfigFile) -> Result<Self, AppError> {
        if config.map.zoom > MAX_ZOOM {
            return Err(AppError::Config(format!(
                "default zoom {} exceeds {}",
                config.map.zoom, MAX_ZOOM
            )));
        }

        std::fs::create_dir_all(&config.cache.directory).map_err(AppError::CacheDirectory)?;

        let client =
            AsyncReqwestClient::with_options(config.provider.timeout, &config.provider.user_agent)?;
        let provider = OsmTileProvider::with_template(client, config.provider.url.as_str())?;

        let memory = Arc::new(MemoryTileCache::new(config.cache.memory_size));
        let disk = Arc::new(DiskTileCache::new(
            config.cache.directory.clone(),
            config.cache.disk_io_concurrency,
        ));
        let fetcher = Arc::new(TileFetcher::new(
            memory,
            disk,
            provider,
            config.retry_policy(),
        ));
        let session = MosaicSession::new(fetcher, config.session_config());

        info!(
            cache_dir = %config.cache.directory.display(),
            memory_cache = %format_size(config.cache.memory_size),
            url = %config.provider.url,
            zoom = config.map.zoom,
            "Tile pipeline ready"
        );

        Ok(Self {
            session,
            default_zoom: config.map.zoom,
        })
    }

    pub fn session(&self) -> &AppSession {
        &self.session
    }

    pub fn memory_cache(&self) -> &Arc<MemoryTileCache> {
        self.session.fetcher().memory_cache()
    }

    pub fn disk_cache(&self) -> &Arc<DiskTileCache> {
        self.session.fetcher().disk_cache()
    }

    pub fn cache_directory(&self) -> &Path {
        self.disk_cache().root()
    }

    pub fn default_zoom(&self) -> u8 {
        self.default_zoom
    }

    /// Builds a mosaic, using the configured zoom when `zoom` is `None`.
    pub async fn build(
        &self,
        points: &[GeoPoint],
        zoom: Option<u8>,
        observer: Option<&ProgressObserver<'_>>,
    ) -> Result<MosaicOutcome, SessionError> {
        self.session
            .build(points, zoom.unwrap_or(self.default_zoom), observer)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CompletionPolicy;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> ConfigFile {
        let mut config = ConfigFile::default();
        config.cache.directory = temp_dir.path().join("cache");
        config.cache.memory_size = 16 * 1024 * 1024;
        config
    }

    #[test]
    fn test_from_config_wires_components() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.map.zoom = 14;
        config.download.max_concurrent = 3;
        config.download.deadline = 10;
        config.mosaic.min_success_ratio = 0.5;

        let app = MosaicApp::from_config(&config).unwrap();

        assert!(config.cache.directory.is_dir());
        assert_eq!(app.cache_directory(), config.cache.directory.as_path());
        assert_eq!(app.default_zoom(), 14);
        assert_eq!(app.memory_cache().stats().max_size_bytes, 16 * 1024 * 1024);

        let session = app.session().config();
        assert_eq!(session.max_concurrent_fetches, 3);
        assert_eq!(session.deadline, Duration::from_secs(10));
        assert_eq!(session.policy, CompletionPolicy::AllowPartial { min_ratio: 0.5 });
    }

    #[test]
    fn test_invalid_template_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.provider.url = "https://tiles.example/{z}.png".to_string();

        let result = MosaicApp::from_config(&config);
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[test]
    fn test_zoom_out_of_range_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.map.zoom = 22;

        let result = MosaicApp::from_config(&config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_build_uses_default_zoom_for_validation() {
        let temp_dir = TempDir::new().unwrap();
        let app = MosaicApp::from_config(&test_config(&temp_dir)).unwrap();

        let result = app.build(&[], None, None).await;
        assert!(matches!(result, Err(SessionError::NoTiles { rejected: 0 })));

        let result = app.build(&[GeoPoint::new(0.0, 0.0)], Some(30), None).await;
        assert!(matches!(result, Err(SessionError::InvalidRequest(_))));
    }
}
