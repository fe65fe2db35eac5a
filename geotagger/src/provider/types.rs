//! Provider types and traits

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use image::RgbaImage;

use crate::coord::{TileId, TILE_SIZE};

/// Errors that can occur while fetching a tile.
///
/// Every variant means the tile is unavailable; none are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived
    HttpError(String),
    /// Server answered with something other than 200 OK
    HttpStatus { status: u16, url: String },
    /// Response body is not a decodable image
    InvalidResponse(String),
    /// Decoded image is not a standard tile
    UnexpectedSize { width: u32, height: u32 },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::UnexpectedSize { width, height } => write!(
                f,
                "Tile is {}×{}, expected {}×{}",
                width, height, TILE_SIZE, TILE_SIZE
            ),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A decoded 256×256 tile image.
///
/// Cheap to clone; all clones share one read-only buffer.
#[derive(Debug, Clone)]
pub struct TileRaster(Arc<RgbaImage>);

impl TileRaster {
    /// Wraps a decoded image, rejecting anything that is not tile sized.
    pub fn new(image: RgbaImage) -> Result<Self, ProviderError> {
        let (width, height) = image.dimensions();
        if width != TILE_SIZE || height != TILE_SIZE {
            return Err(ProviderError::UnexpectedSize { width, height });
        }
        Ok(Self(Arc::new(image)))
    }

    /// Decodes raw bytes (PNG, JPEG, ...) into a tile.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProviderError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Self::new(image.to_rgba8())
    }
}

impl Deref for TileRaster {
    type Target = RgbaImage;

    fn deref(&self) -> &RgbaImage {
        &self.0
    }
}

/// Source of tile rasters.
///
/// The only network boundary of the map pipeline. Implementations must be
/// thread-safe so one fetcher can serve a pool of workers.
pub trait TileFetcher: Send + Sync {
    /// Fetches and decodes one tile. Performs I/O on every call.
    fn fetch(&self, tile: TileId) -> Result<TileRaster, ProviderError>;

    /// Returns the fetcher's name for logging.
    fn name(&self) -> &str;
}

impl<T: TileFetcher + ?Sized> TileFetcher for Arc<T> {
    fn fetch(&self, tile: TileId) -> Result<TileRaster, ProviderError> {
        (**self).fetch(tile)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
