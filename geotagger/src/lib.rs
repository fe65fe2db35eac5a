//! Geotagger - location maps for geotagged photos
//!
//! Reads the GPS position (and, when recorded, the camera heading) from a
//! photo's EXIF data, builds a small map of that spot from OpenStreetMap
//! tiles and stamps it into the corner of a copy of the photo.
//!
//! The pipeline is split into small layers:
//!
//! - [`coord`]: Web-Mercator projection and tile bounding boxes
//! - [`provider`]: tile download over HTTP
//! - [`cache`]: in-memory tile reuse across photos
//! - [`compose`]: stitching, cropping and drawing the marker
//! - [`metadata`]: EXIF GPS extraction
//! - [`photo`]: end-to-end annotation of one photo
//! - [`config`] and [`logging`]: ambient setup for the CLI

pub mod cache;
pub mod compose;
pub mod config;
pub mod coord;
pub mod logging;
pub mod metadata;
pub mod photo;
pub mod provider;
