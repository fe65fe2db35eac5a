//! OpenStreetMap-style raster tile fetcher.
//!
//! Fetches tiles from any server following the slippy-map URL layout.
//!
//! # URL Pattern
//!
//! `http://a.tile.openstreetmap.org/{z}/{x}/{y}.png`
//!
//! - `{z}`: zoom level
//! - `{x}`: column (0 to 2^zoom - 1, west to east)
//! - `{y}`: row (0 to 2^zoom - 1, north to south)
//!
//! # Terms of Use
//!
//! The OpenStreetMap tile servers are run on donated resources and require
//! an identifying User-Agent. See: <https://operations.osmfoundation.org/policies/tiles/>

use tracing::debug;

use crate::coord::TileId;
use crate::provider::{HttpClient, ProviderError, TileFetcher, TileRaster};

/// Default tile URL template.
pub const DEFAULT_TILE_URL: &str = "http://a.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Placeholders a tile URL template must contain.
pub const URL_PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// Fetches raster tiles from a slippy-map tile server.
///
/// # Example
///
/// ```ignore
/// use geotagger::provider::{OsmTileFetcher, ReqwestClient};
///
/// let client = ReqwestClient::new()?;
/// let fetcher = OsmTileFetcher::new(client);
/// // Hand the fetcher to a TileCache...
/// ```
pub struct OsmTileFetcher<C: HttpClient> {
    http_client: C,
    url_template: String,
}

impl<C: HttpClient> OsmTileFetcher<C> {
    /// Creates a fetcher for the public OpenStreetMap tile server.
    pub fn new(http_client: C) -> Self {
        Self::with_url_template(http_client, DEFAULT_TILE_URL)
    }

    /// Creates a fetcher for a custom tile server.
    ///
    /// `template` must contain `{z}`, `{x}` and `{y}`.
    pub fn with_url_template(http_client: C, template: impl Into<String>) -> Self {
        Self {
            http_client,
            url_template: template.into(),
        }
    }

    /// Builds the tile URL for the given tile.
    fn build_url(&self, tile: TileId) -> String {
        self.url_template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

impl<C: HttpClient> TileFetcher for OsmTileFetcher<C> {
    fn fetch(&self, tile: TileId) -> Result<TileRaster, ProviderError> {
        let url = self.build_url(tile);
        debug!(tile = %tile, url = %url, "Fetching tile");

        let body = self.http_client.get(&url)?;
        TileRaster::decode(&body)
    }

    fn name(&self) -> &str {
        "OpenStreetMap"
    }
}
