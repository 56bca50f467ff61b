//! OpenStreetMap standard tile layer.
//!
//! # URL Pattern
//!
//! `https://tile.openstreetmap.org/{z}/{x}/{y}.png`
//!
//! The template is configurable so a mirror or a self-hosted tile server
//! can be used instead. `{z}`, `{x}` and `{y}` are substituted per tile.
//!
//! # Terms of Use
//!
//! Requests must carry an identifying User-Agent and bulk downloading is
//! forbidden. See <https://operations.osmfoundation.org/policies/tiles/>.

use crate::coord::{TileKey, MAX_ZOOM, MIN_ZOOM};
use crate::provider::{AsyncHttpClient, ProviderError, TileProvider};

/// Default OpenStreetMap tile URL template.
pub const OSM_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Tile provider for OpenStreetMap-compatible XYZ servers.
pub struct OsmTileProvider<C: AsyncHttpClient> {
    http_client: C,
    url_template: String,
}

impl<C: AsyncHttpClient> OsmTileProvider<C> {
    /// Creates a provider for the public OpenStreetMap tile servers.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            url_template: OSM_URL_TEMPLATE.to_string(),
        }
    }

    /// Creates a provider for a custom XYZ URL template.
    ///
    /// The template must contain `{z}`, `{x}` and `{y}`.
    pub fn with_template(
        http_client: C,
        url_template: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let url_template = url_template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(ProviderError::InvalidConfig(format!(
                    "URL template '{}' is missing {}",
                    url_template, placeholder
                )));
            }
        }
        Ok(Self {
            http_client,
            url_template,
        })
    }

    /// Builds the tile URL for the given key.
    pub fn build_url(&self, key: &TileKey) -> String {
        self.url_template
            .replace("{z}", &key.zoom.to_string())
            .replace("{x}", &key.x.to_string())
            .replace("{y}", &key.y.to_string())
    }
}

impl<C: AsyncHttpClient> TileProvider for OsmTileProvider<C> {
    async fn download_tile(&self, key: TileKey) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(key.zoom) {
            return Err(ProviderError::UnsupportedZoom(key.zoom));
        }

        let url = self.build_url(&key);
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        "OpenStreetMap"
    }

    fn min_zoom(&self) -> u8 {
        MIN_ZOOM
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockAsyncHttpClient, ScriptedHttpClient};

    fn key() -> TileKey {
        TileKey::new(655, 1582, 12).unwrap()
    }

    #[test]
    fn test_url_construction() {
        let provider = OsmTileProvider::new(MockAsyncHttpClient {
            response: Ok(vec![]),
        });
        assert_eq!(
            provider.build_url(&key()),
            "https://tile.openstreetmap.org/12/655/1582.png"
        );
    }

    #[test]
    fn test_custom_template() {
        let provider = OsmTileProvider::with_template(
            MockAsyncHttpClient {
                response: Ok(vec![]),
            },
            "http://localhost:8080/tiles/{z}/{x}/{y}.png",
        )
        .unwrap();
        assert_eq!(
            provider.build_url(&key()),
            "http://localhost:8080/tiles/12/655/1582.png"
        );
    }

    #[test]
    fn test_template_missing_placeholder() {
        let result = OsmTileProvider::with_template(
            MockAsyncHttpClient {
                response: Ok(vec![]),
            },
            "http://localhost/{z}/{x}.png",
        );
        assert!(matches!(result, Err(ProviderError::InvalidConfig(_))));
    }

    #[test]
    fn test_provider_metadata() {
        let provider = OsmTileProvider::new(MockAsyncHttpClient {
            response: Ok(vec![]),
        });
        assert_eq!(provider.name(), "OpenStreetMap");
        assert!(provider.supports_zoom(0));
        assert!(provider.supports_zoom(19));
        assert!(!provider.supports_zoom(20));
    }

    #[tokio::test]
    async fn test_download_requests_tile_url() {
        let client = ScriptedHttpClient::new(vec![Ok(vec![1, 2, 3])]);
        let provider = OsmTileProvider::new(client.clone());

        let data = provider.download_tile(key()).await.unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(
            client.urls(),
            vec!["https://tile.openstreetmap.org/12/655/1582.png"]
        );
    }

    #[tokio::test]
    async fn test_download_propagates_http_error() {
        let provider = OsmTileProvider::new(MockAsyncHttpClient {
            response: Err(ProviderError::HttpStatus {
                status: 404,
                url: "x".into(),
            }),
        });
        let result = provider.download_tile(key()).await;
        assert!(matches!(
            result,
            Err(ProviderError::HttpStatus { status: 404, .. })
        ));
    }
}
