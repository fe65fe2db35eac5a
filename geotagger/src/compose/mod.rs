//! Map composition
//!
//! Builds the small map raster stamped onto a photo:
//!
//! 1. project the location into tile space,
//! 2. find the tiles covering the requested area,
//! 3. fetch them through the [`TileCache`] on a bounded worker pool and
//!    stitch them into one canvas,
//! 4. crop the canvas so the location sits at the exact center,
//! 5. draw the position ring and, if the photo has a heading, the
//!    field-of-view cone.
//!
//! A single unavailable tile fails the whole map; no partial raster is
//! ever returned.

mod draw;
mod style;

pub use draw::ConeGeometry;
pub use style::MarkerStyle;

use image::{imageops, RgbaImage};
use rayon::prelude::*;
use rayon::ThreadPool;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::TileCache;
use crate::coord::{project, CoordError, GeoLocation, TileBox, TileId, MAX_ZOOM, TILE_SIZE};
use crate::provider::{ProviderError, TileFetcher, TileRaster};

/// Default number of tiles fetched concurrently.
pub const DEFAULT_PARALLEL_FETCHES: usize = 4;

/// Annotated map, `round(area · 256)` pixels square.
pub type MapRaster = RgbaImage;

/// Upper bound on concurrent tile fetches.
///
/// Public tile servers ban clients that open many connections.
pub const MAX_PARALLEL_FETCHES: usize = 16;

/// Errors that can occur while composing a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// A tile in the bounding box could not be fetched or decoded
    #[error("Tile {tile} unavailable: {source}")]
    TileUnavailable {
        tile: TileId,
        #[source]
        source: ProviderError,
    },

    /// Zoom level beyond what tile servers provide
    #[error("Invalid zoom level {0} (must be at most {max})", max = MAX_ZOOM)]
    InvalidZoom(u8),

    /// Area is not a positive, finite number of tiles
    #[error("Invalid map area: {0} tiles")]
    InvalidArea(f64),

    /// Location cannot be projected
    #[error("Invalid location: {0}")]
    InvalidLocation(GeoLocation),

    /// Requested area reaches past the poles
    #[error("Map area leaves the tile grid: {0}")]
    OutsideGrid(#[from] CoordError),

    /// Fetch worker pool could not be created
    #[error("Failed to start tile workers: {0}")]
    WorkerPool(String),

    /// Raster could not be wrapped for drawing
    #[error("Cannot draw on a {width}×{height} raster")]
    Canvas { width: u32, height: u32 },
}

/// Assembles annotated map rasters from cached tiles.
///
/// Owns its [`TileCache`], so tiles fetched for one photo are reused for
/// every later photo handled by the same composer.
///
/// # Example
///
/// ```ignore
/// use geotagger::cache::TileCache;
/// use geotagger::compose::MapComposer;
/// use geotagger::coord::GeoLocation;
/// use geotagger::provider::{OsmTileFetcher, ReqwestClient};
///
/// let cache = TileCache::new(OsmTileFetcher::new(ReqwestClient::new()?));
/// let composer = MapComposer::new(cache, 4)?;
/// let map = composer.compose(&GeoLocation::new(51.5, -0.12), 18, 1.0)?;
/// ```
pub struct MapComposer<F: TileFetcher> {
    cache: TileCache<F>,
    pool: ThreadPool,
    style: MarkerStyle,
}

impl<F: TileFetcher> MapComposer<F> {
    /// Creates a composer fetching up to `parallel_fetches` tiles at once.
    ///
    /// The value is clamped to `1..=MAX_PARALLEL_FETCHES`.
    pub fn new(cache: TileCache<F>, parallel_fetches: usize) -> Result<Self, MapError> {
        let threads = parallel_fetches.clamp(1, MAX_PARALLEL_FETCHES);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tile-fetch-{}", i))
            .build()
            .map_err(|e| MapError::WorkerPool(e.to_string()))?;

        Ok(Self {
            cache,
            pool,
            style: MarkerStyle::default(),
        })
    }

    /// The cache feeding this composer.
    pub fn cache(&self) -> &TileCache<F> {
        &self.cache
    }

    /// Composes a map of `area` tiles square centered on `location`.
    ///
    /// The result is `round(area · 256)` pixels on each side.
    pub fn compose(
        &self,
        location: &GeoLocation,
        zoom: u8,
        area: f64,
    ) -> Result<MapRaster, MapError> {
        if zoom > MAX_ZOOM {
            return Err(MapError::InvalidZoom(zoom));
        }
        let side = (area * TILE_SIZE as f64).round();
        if !area.is_finite() || side < 1.0 {
            return Err(MapError::InvalidArea(area));
        }
        if !location.latitude.is_finite()
            || !location.longitude.is_finite()
            || location.latitude.abs() >= 90.0
        {
            return Err(MapError::InvalidLocation(*location));
        }

        let center = project(location, zoom);
        let tile_box = TileBox::covering(center, area);
        debug!(
            location = %location,
            zoom,
            area,
            columns = tile_box.columns(),
            rows = tile_box.rows(),
            "Composing map"
        );

        let canvas = self.stitch(&tile_box, zoom)?;

        let tile = TILE_SIZE as f64;
        let side = side as u32;
        let left = crop_origin(
            center.x - area / 2.0 - tile_box.x_min as f64,
            tile,
            side,
            canvas.width(),
        );
        let top = crop_origin(
            center.y - area / 2.0 - tile_box.y_min as f64,
            tile,
            side,
            canvas.height(),
        );
        let mut map = imageops::crop_imm(&canvas, left, top, side, side).to_image();

        let heading = location.normalized_heading();
        draw::annotate(&mut map, heading, &self.style)?;

        info!(
            location = %location,
            zoom,
            size = side,
            tiles = tile_box.columns() * tile_box.rows(),
            direction = heading.is_some(),
            "Map composed"
        );
        Ok(map)
    }

    /// Fetches every tile in the box and pastes it onto one canvas.
    fn stitch(&self, tile_box: &TileBox, zoom: u8) -> Result<RgbaImage, MapError> {
        let cells = tile_box
            .cells()
            .map(|(x, y)| TileId::wrapping(x, y, zoom).map(|tile| (x, y, tile)))
            .collect::<Result<Vec<_>, _>>()?;

        let rasters: Vec<(i64, i64, TileRaster)> = self.pool.install(|| {
            cells
                .par_iter()
                .map(|&(x, y, tile)| {
                    self.cache
                        .get(tile)
                        .map(|raster| (x, y, raster))
                        .map_err(|source| MapError::TileUnavailable { tile, source })
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let width = tile_box.columns() * TILE_SIZE;
        let height = tile_box.rows() * TILE_SIZE;
        let mut canvas = RgbaImage::new(width, height);
        for (x, y, raster) in &rasters {
            let offset_x = (x - tile_box.x_min) * TILE_SIZE as i64;
            let offset_y = (y - tile_box.y_min) * TILE_SIZE as i64;
            imageops::replace(&mut canvas, &**raster, offset_x, offset_y);
        }

        Ok(canvas)
    }
}

/// Pixel offset of the crop along one axis.
///
/// `tiles` is the distance in tiles from the canvas edge to the crop edge.
/// Rounded, then kept inside the canvas.
fn crop_origin(tiles: f64, tile_size: f64, side: u32, extent: u32) -> u32 {
    let origin = (tiles * tile_size).round().max(0.0) as u32;
    origin.min(extent.saturating_sub(side))
}
