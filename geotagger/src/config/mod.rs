//! User configuration for geotagger.
//!
//! Settings are read from `~/.geotagger/config.ini`. Every key is optional;
//! anything not present falls back to the defaults in [`settings`].
//!
//! ```ini
//! [tiles]
//! url = http://a.tile.openstreetmap.org/{z}/{x}/{y}.png
//! user_agent = Geotagger/1.0
//! timeout = 30
//! parallel_fetches = 4
//!
//! [map]
//! zoom = 18
//! area = 100
//! scale = 100
//!
//! [logging]
//! directory = ~/.geotagger/logs
//! ```

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
pub use settings::{
    LoggingSettings, MapDefaults, TilesSettings, DEFAULT_AREA_PERCENT, DEFAULT_LOG_FILE,
    DEFAULT_SCALE_PERCENT, DEFAULT_ZOOM, MAX_MAP_ZOOM, MAX_PERCENT, MAX_TIMEOUT_SECS, MIN_MAP_ZOOM,
    MIN_PERCENT,
};
