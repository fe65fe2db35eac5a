//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::*;
use crate::compose::MAX_PARALLEL_FETCHES;
use crate::provider::URL_PLACEHOLDERS;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if let Some(missing) = URL_PLACEHOLDERS.iter().find(|p| !v.contains(**p)) {
                return Err(invalid(
                    "tiles",
                    "url",
                    v,
                    format!("must contain the {} placeholder", missing),
                ));
            }
            config.tiles.url = v.to_string();
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("tiles", "user_agent", v, "must not be empty"));
            }
            config.tiles.user_agent = v.to_string();
        }
        if let Some(timeout) = parse_ranged(
            section,
            "tiles",
            "timeout",
            1..=MAX_TIMEOUT_SECS,
            "must be a number of seconds between 1 and 3600",
        )? {
            config.tiles.timeout = timeout;
        }
        if let Some(parallel) = parse_ranged(
            section,
            "tiles",
            "parallel_fetches",
            1..=MAX_PARALLEL_FETCHES,
            "must be a number between 1 and 16",
        )? {
            config.tiles.parallel_fetches = parallel;
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        let percent = "must be a percentage between 10 and 500";
        if let Some(zoom) = parse_ranged(
            section,
            "map",
            "zoom",
            MIN_MAP_ZOOM..=MAX_MAP_ZOOM,
            "must be a zoom level between 10 and 19",
        )? {
            config.map.zoom = zoom;
        }
        if let Some(area) =
            parse_ranged(section, "map", "area", MIN_PERCENT..=MAX_PERCENT, percent)?
        {
            config.map.area = area;
        }
        if let Some(scale) =
            parse_ranged(section, "map", "scale", MIN_PERCENT..=MAX_PERCENT, percent)?
        {
            config.map.scale = scale;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Reads `key` as a number within `range`, if present.
fn parse_ranged<T>(
    section: &Properties,
    section_name: &str,
    key: &str,
    range: RangeInclusive<T>,
    reason: &str,
) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + PartialOrd,
{
    let Some(raw) = section.get(key) else {
        return Ok(None);
    };
    let raw = raw.trim();

    match raw.parse::<T>() {
        Ok(value) if range.contains(&value) => Ok(Some(value)),
        _ => Err(invalid(section_name, key, raw, reason)),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
