//! Settings structs, one per `[section]` of the INI file, and their defaults.

use std::path::PathBuf;

use crate::compose::DEFAULT_PARALLEL_FETCHES;
use crate::photo::MapSettings;
use crate::provider::{DEFAULT_TILE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Lowest zoom level offered to users.
pub const MIN_MAP_ZOOM: u8 = 10;

/// Highest zoom level offered to users.
pub const MAX_MAP_ZOOM: u8 = 19;

pub const DEFAULT_ZOOM: u8 = 18;

/// Bounds for `area` and `scale`, in percent.
pub const MIN_PERCENT: u32 = 10;
pub const MAX_PERCENT: u32 = 500;

pub const DEFAULT_AREA_PERCENT: u32 = 100;
pub const DEFAULT_SCALE_PERCENT: u32 = 100;

/// Longest accepted tile request timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "geotagger.log";

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// Tile server settings
    pub tiles: TilesSettings,
    /// Defaults for the map stamped on each photo
    pub map: MapDefaults,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    /// URL template containing `{z}`, `{x}` and `{y}`
    pub url: String,
    /// User-Agent sent with every tile request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Tiles fetched concurrently
    pub parallel_fetches: usize,
}

/// Map defaults, overridable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDefaults {
    pub zoom: u8,
    /// Map side as a percentage of one tile
    pub area: u32,
    /// Map resize as a percentage
    pub scale: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory holding the log file
    pub directory: PathBuf,
}

impl MapDefaults {
    /// Converts percentages into the factors the annotator works with.
    pub fn to_map_settings(self) -> MapSettings {
        MapSettings {
            zoom: self.zoom,
            area: self.area as f64 / 100.0,
            scale: self.scale as f64 / 100.0,
        }
    }
}

impl Default for TilesSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_TILE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            parallel_fetches: DEFAULT_PARALLEL_FETCHES,
        }
    }
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            area: DEFAULT_AREA_PERCENT,
            scale: DEFAULT_SCALE_PERCENT,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: crate::logging::default_log_dir(),
        }
    }
}
