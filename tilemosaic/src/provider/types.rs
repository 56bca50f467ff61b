//! Provider types and traits

use std::fmt;
use std::future::Future;

use crate::coord::TileKey;

/// Errors that can occur when downloading tiles from a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read)
    HttpError(String),
    /// Server answered with a non-success status
    HttpStatus { status: u16, url: String },
    /// Zoom level not supported by this provider
    UnsupportedZoom(u8),
    /// Provider was configured with an unusable value
    InvalidConfig(String),
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport errors, 5xx responses and 429 are transient; other status
    /// codes and configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::HttpError(_) => true,
            ProviderError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            ProviderError::UnsupportedZoom(_) | ProviderError::InvalidConfig(_) => false,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by provider", zoom)
            }
            ProviderError::InvalidConfig(msg) => write!(f, "Invalid provider config: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Async source of encoded map tiles.
pub trait TileProvider: Send + Sync {
    /// Downloads the encoded image for a tile.
    fn download_tile(
        &self,
        key: TileKey,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if a zoom level is supported.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}
