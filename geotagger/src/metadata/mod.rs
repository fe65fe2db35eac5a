//! Photo location metadata.
//!
//! Reads the GPS block of a photo's EXIF data and turns it into a
//! [`GeoLocation`]. Extraction is split in two so the conversion can be
//! tested without image files:
//!
//! - [`GpsTags::from_exif`] collects the raw tag values,
//! - [`GpsTags::to_location`] converts degrees/minutes/seconds plus the
//!   hemisphere reference into signed decimal degrees.

use std::io::{BufRead, Seek};

use exif::{Exif, In, Tag, Value};
use thiserror::Error;

use crate::coord::GeoLocation;

/// Errors that can occur while reading metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The EXIF container exists but is malformed
    #[error("Failed to parse EXIF data: {0}")]
    Exif(#[from] exif::Error),
}

/// Raw GPS tag values of one photo.
///
/// Coordinates are `[degrees, minutes, seconds]`; references are the first
/// character of the hemisphere tag (`N`/`S`, `E`/`W`) and the direction
/// reference (`T` true, `M` magnetic).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsTags {
    pub latitude: Option<[f64; 3]>,
    pub latitude_ref: Option<char>,
    pub longitude: Option<[f64; 3]>,
    pub longitude_ref: Option<char>,
    pub direction_ref: Option<char>,
    pub direction: Option<f64>,
}

impl GpsTags {
    /// Collects the GPS tags present in `exif`.
    pub fn from_exif(exif: &Exif) -> Self {
        Self {
            latitude: dms_field(exif, Tag::GPSLatitude),
            latitude_ref: ref_field(exif, Tag::GPSLatitudeRef),
            longitude: dms_field(exif, Tag::GPSLongitude),
            longitude_ref: ref_field(exif, Tag::GPSLongitudeRef),
            direction_ref: ref_field(exif, Tag::GPSImgDirectionRef),
            direction: rational_field(exif, Tag::GPSImgDirection),
        }
    }

    /// Converts the tags into a location.
    ///
    /// Returns `None` unless latitude, longitude and both hemisphere
    /// references are present. The heading is set only when the direction
    /// tag exists; a heading of 0° is kept.
    pub fn to_location(&self) -> Option<GeoLocation> {
        let latitude = dms_to_degrees(self.latitude?, self.latitude_ref?);
        let longitude = dms_to_degrees(self.longitude?, self.longitude_ref?);

        Some(GeoLocation {
            latitude,
            longitude,
            heading: self.direction,
        })
    }
}

/// Converts degrees/minutes/seconds to signed decimal degrees.
///
/// Southern and western hemispheres are negative.
pub fn dms_to_degrees(dms: [f64; 3], hemisphere: char) -> f64 {
    let [degrees, minutes, seconds] = dms;
    let magnitude = degrees + (minutes + seconds / 60.0) / 60.0;
    match hemisphere.to_ascii_uppercase() {
        'S' | 'W' => -magnitude,
        _ => magnitude,
    }
}

/// Reads the location recorded in a photo.
///
/// `Ok(None)` when the photo has no EXIF data or no usable GPS block,
/// including formats that cannot carry EXIF (BMP, GIF, ...).
pub fn read_location<R: BufRead + Seek>(
    reader: &mut R,
) -> Result<Option<GeoLocation>, MetadataError> {
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_) | exif::Error::InvalidFormat(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    Ok(GpsTags::from_exif(&exif).to_location())
}

fn dms_field(exif: &Exif, tag: Tag) -> Option<[f64; 3]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(parts) if parts.len() >= 3 => Some([
            parts[0].to_f64(),
            parts[1].to_f64(),
            parts[2].to_f64(),
        ]),
        _ => None,
    }
}

fn rational_field(exif: &Exif, tag: Tag) -> Option<f64> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(parts) => parts.first().map(|r| r.to_f64()),
        _ => None,
    }
}

fn ref_field(exif: &Exif, tag: Tag) -> Option<char> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(strings) => strings
            .first()
            .and_then(|s| s.first())
            .map(|b| char::from(*b).to_ascii_uppercase()),
        _ => None,
    }
}
