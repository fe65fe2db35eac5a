//! Coordinate type definitions

use std::fmt;

/// Zoom levels served by standard slippy-map tile servers
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

/// Edge length of one tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A geographic position read from a photo.
///
/// `heading` is the direction the camera was pointing in degrees clockwise
/// from north. It is `None` when the photo does not record one; `Some(0.0)`
/// is a valid heading (true north).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
    /// Capture direction in degrees, 0 = north, clockwise
    pub heading: Option<f64>,
}

impl GeoLocation {
    /// Creates a location without a heading.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            heading: None,
        }
    }

    /// Returns a copy of this location with the given heading.
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Heading folded into `[0, 360)`.
    ///
    /// Non-finite headings are treated as absent.
    pub fn normalized_heading(&self) -> Option<f64> {
        self.heading
            .filter(|h| h.is_finite())
            .map(|h| h.rem_euclid(360.0))
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)?;
        if let Some(heading) = self.heading {
            write!(f, " heading {:.1}°", heading)?;
        }
        Ok(())
    }
}

/// Continuous position in tile space at a given zoom level.
///
/// The integer part names a tile, the fractional part is the position
/// inside it. Not clamped to the tile grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalTileCoord {
    pub x: f64,
    pub y: f64,
}

/// Identity of one tile in the slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Column, 0 at the antimeridian going east
    pub x: u32,
    /// Row, 0 at the north edge
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileId {
    /// Creates a tile id, checking that it lies on the grid for `zoom`.
    pub fn new(x: u32, y: u32, zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = grid_size(zoom);
        if u64::from(x) >= n || u64::from(y) >= n {
            return Err(CoordError::OutsideGrid {
                x: i64::from(x),
                y: i64::from(y),
                zoom,
            });
        }
        Ok(Self { x, y, zoom })
    }

    /// Resolves a possibly off-grid column/row pair to a tile.
    ///
    /// Columns wrap around the antimeridian. Rows beyond the poles have no
    /// tile and produce `CoordError::OutsideGrid`.
    pub fn wrapping(x: i64, y: i64, zoom: u8) -> Result<Self, CoordError> {
        let n = grid_size(zoom) as i64;
        if !(0..n).contains(&y) {
            return Err(CoordError::OutsideGrid { x, y, zoom });
        }
        Self::new(x.rem_euclid(n) as u32, y as u32, zoom)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn grid_size(zoom: u8) -> u64 {
    1u64 << zoom
}

/// Inclusive range of tile columns and rows.
///
/// Bounds are signed so that a box hanging over the antimeridian can be
/// described before wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBox {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
}

impl TileBox {
    /// Smallest box covering a square of `area` tiles centered on `center`.
    ///
    /// Lower edges are floored. An upper edge landing exactly on a tile
    /// boundary stops short of the tile that starts there, since none of its
    /// pixels would survive the crop.
    pub fn covering(center: FractionalTileCoord, area: f64) -> Self {
        let half = area / 2.0;
        let lower = |v: f64| (v - half).floor() as i64;
        let upper = |v: f64, min: i64| ((v + half).ceil() as i64 - 1).max(min);

        let x_min = lower(center.x);
        let y_min = lower(center.y);
        Self {
            x_min,
            x_max: upper(center.x, x_min),
            y_min,
            y_max: upper(center.y, y_min),
        }
    }

    /// Number of tile columns.
    pub fn columns(&self) -> u32 {
        (self.x_max - self.x_min + 1) as u32
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        (self.y_max - self.y_min + 1) as u32
    }

    /// Iterates over `(x, y)` in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (self.x_min..=self.x_max).flat_map(move |x| (self.y_min..=self.y_max).map(move |y| (x, y)))
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is outside valid range (0 to 19)
    InvalidZoom(u8),
    /// Tile position does not exist at this zoom level
    OutsideGrid { x: i64, y: i64, zoom: u8 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutsideGrid { x, y, zoom } => {
                write!(f, "Tile ({}, {}) is outside the grid at zoom {}", x, y, zoom)
            }
        }
    }
}

impl std::error::Error for CoordError {}
