//! Map tile provider
//!
//! This module provides the tile fetching boundary of the map pipeline: the
//! [`TileFetcher`] trait, the slippy-map implementation [`OsmTileFetcher`],
//! and the [`HttpClient`] seam it talks through.
//!
//! ```ignore
//! use geotagger::provider::{OsmTileFetcher, ReqwestClient, TileFetcher};
//!
//! let http_client = ReqwestClient::new()?;
//! let fetcher = OsmTileFetcher::new(http_client);
//! let raster = fetcher.fetch(TileId::new(130984, 87178, 18)?)?;
//! ```

mod http;
mod osm;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use osm::{OsmTileFetcher, DEFAULT_TILE_URL, URL_PLACEHOLDERS};
pub use types::{ProviderError, TileFetcher, TileRaster};

#[cfg(test)]
pub use http::tests::MockHttpClient;
