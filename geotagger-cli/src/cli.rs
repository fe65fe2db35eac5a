//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use geotagger::config::{ConfigFile, MapDefaults, MAX_MAP_ZOOM, MIN_MAP_ZOOM};

#[derive(Debug, Parser)]
#[command(name = "geotagger", version)]
#[command(
    about = "Stamp a map of where each photo was taken into its corner",
    long_about = None
)]
pub struct Args {
    /// Photos to annotate; each argument is a glob pattern (e.g. "trip/*.jpg")
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Map zoom level [default: 18]
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(MIN_MAP_ZOOM as i64..=MAX_MAP_ZOOM as i64))]
    pub zoom: Option<u8>,

    /// Map side as a percentage of one 256px tile [default: 100]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=500))]
    pub area: Option<u32>,

    /// Resize the map by this percentage before stamping [default: 100]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(10..=500))]
    pub scale: Option<u32>,

    /// Configuration file [default: ~/.geotagger/config.ini]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of tiles downloaded concurrently [default: 4]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub parallel: Option<u32>,
}

impl Args {
    /// Map defaults from the config file with command-line overrides applied.
    pub fn map_defaults(&self, config: &ConfigFile) -> MapDefaults {
        MapDefaults {
            zoom: self.zoom.unwrap_or(config.map.zoom),
            area: self.area.unwrap_or(config.map.area),
            scale: self.scale.unwrap_or(config.map.scale),
        }
    }

    /// Concurrent tile downloads, command line first.
    pub fn parallel_fetches(&self, config: &ConfigFile) -> usize {
        self.parallel
            .map(|p| p as usize)
            .unwrap_or(config.tiles.parallel_fetches)
    }
}
