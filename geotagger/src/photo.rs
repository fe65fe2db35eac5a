//! Photo annotation.
//!
//! [`PhotoAnnotator`] is the end-to-end step for a single photo: decode it,
//! read where it was taken, compose a map of that spot and stamp the map
//! into the bottom-right corner of a copy saved next to the original.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::compose::{MapComposer, MapError};
use crate::metadata::{self, MetadataError};
use crate::provider::TileFetcher;

/// Suffix appended to the file stem of annotated copies.
pub const OUTPUT_SUFFIX: &str = "_map";

/// Errors for a single photo. None of them should stop a batch.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// File missing or not a decodable image
    #[error("File {path} is not an image: {reason}")]
    UnreadableImage { path: PathBuf, reason: String },

    /// EXIF block present but malformed
    #[error("Image {path} has unreadable metadata: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },

    /// No GPS coordinates recorded
    #[error("Image {0} does not contain coordinates")]
    MetadataAbsent(PathBuf),

    /// Map could not be composed
    #[error("Failed to generate map for {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: MapError,
    },

    /// Annotated copy could not be written
    #[error("Failed to save {path}: {reason}")]
    Save { path: PathBuf, reason: String },
}

/// How the map stamped onto each photo is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    /// Tile zoom level
    pub zoom: u8,
    /// Map side length in tiles (1.0 = 256 px before scaling)
    pub area: f64,
    /// Resize factor applied to the composed map
    pub scale: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: 18,
            area: 1.0,
            scale: 1.0,
        }
    }
}

/// Stamps location maps onto photos.
pub struct PhotoAnnotator<F: TileFetcher> {
    composer: MapComposer<F>,
    settings: MapSettings,
}

impl<F: TileFetcher> PhotoAnnotator<F> {
    pub fn new(composer: MapComposer<F>, settings: MapSettings) -> Self {
        Self { composer, settings }
    }

    pub fn composer(&self) -> &MapComposer<F> {
        &self.composer
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Annotates the photo at `path` and returns where the copy was saved.
    pub fn annotate(&self, path: &Path) -> Result<PathBuf, PhotoError> {
        let photo = decode(path)?;

        let file = File::open(path).map_err(|e| PhotoError::UnreadableImage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let location = metadata::read_location(&mut BufReader::new(file))
            .map_err(|source| PhotoError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| PhotoError::MetadataAbsent(path.to_path_buf()))?;

        if location.heading.is_some() {
            info!(path = %path.display(), "Generating map for {}", path.display());
        } else {
            info!(
                path = %path.display(),
                "Generating map for {} (direction not included)",
                path.display()
            );
        }

        let map = self
            .composer
            .compose(&location, self.settings.zoom, self.settings.area)
            .map_err(|source| PhotoError::Map {
                path: path.to_path_buf(),
                source,
            })?;
        let map = scale_map(map, self.settings.scale);

        let output = map_output_path(path);
        let annotated = stamp(photo, &map);
        annotated.save(&output).map_err(|e| PhotoError::Save {
            path: output.clone(),
            reason: e.to_string(),
        })?;

        debug!(
            output = %output.display(),
            map_size = map.width(),
            "Annotated photo saved"
        );
        Ok(output)
    }
}

/// `<dir>/<stem>_map.<ext>` for a photo at `<dir>/<stem>.<ext>`.
pub fn map_output_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    path.with_file_name(name)
}

fn decode(path: &Path) -> Result<DynamicImage, PhotoError> {
    let unreadable = |reason: String| PhotoError::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };

    ImageReader::open(path)
        .map_err(|e| unreadable(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))
}

/// Nearest-neighbour resize; identity when `scale` is 1.
///
/// Scaled sizes are truncated to whole pixels, never below one.
fn scale_map(map: RgbaImage, scale: f64) -> RgbaImage {
    if (scale - 1.0).abs() < f64::EPSILON {
        return map;
    }
    let width = ((map.width() as f64 * scale).floor() as u32).max(1);
    let height = ((map.height() as f64 * scale).floor() as u32).max(1);
    imageops::resize(&map, width, height, FilterType::Nearest)
}

/// Pastes `map` into the bottom-right corner of `photo`.
///
/// The photo keeps its alpha channel only if it had one.
fn stamp(photo: DynamicImage, map: &RgbaImage) -> DynamicImage {
    let has_alpha = photo.color().has_alpha();
    let mut canvas = photo.into_rgba8();

    let x = canvas.width() as i64 - map.width() as i64;
    let y = canvas.height() as i64 - map.height() as i64;
    imageops::replace(&mut canvas, map, x, y);

    let canvas = DynamicImage::ImageRgba8(canvas);
    if has_alpha {
        canvas
    } else {
        DynamicImage::ImageRgb8(canvas.into_rgb8())
    }
}
