//! Map tile provider abstraction
//!
//! Traits and implementations for downloading encoded tiles from XYZ tile
//! servers. The HTTP transport sits behind [`AsyncHttpClient`] so providers
//! can be exercised with mock clients.

mod http;
mod osm;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use osm::{OsmTileProvider, OSM_URL_TEMPLATE};
pub use types::{ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, ScriptedHttpClient};
