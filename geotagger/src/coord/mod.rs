//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and the Web Mercator tile space used by slippy-map tile servers.
//!
//! Latitudes of exactly ±90° are a singularity of the projection and are not
//! supported; positions beyond roughly ±85.05° project outside the tile grid.

mod types;

pub use types::{
    grid_size, CoordError, FractionalTileCoord, GeoLocation, TileBox, TileId, MAX_ZOOM, MIN_ZOOM,
    TILE_SIZE,
};

use std::f64::consts::PI;

/// Projects a location into fractional tile coordinates.
///
/// Longitude maps linearly onto `[0, 2^zoom)`; latitude goes through the
/// spherical Mercator transform `(1 - ln(tan φ + sec φ) / π) / 2 · 2^zoom`.
#[inline]
pub fn project(location: &GeoLocation, zoom: u8) -> FractionalTileCoord {
    let n = grid_size(zoom) as f64;
    let lat_rad = location.latitude.to_radians();

    let x = (location.longitude + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    FractionalTileCoord { x, y }
}

/// Converts fractional tile coordinates back to `(latitude, longitude)`.
#[inline]
pub fn unproject(coord: FractionalTileCoord, zoom: u8) -> (f64, f64) {
    let n = grid_size(zoom) as f64;

    let lon = coord.x / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * coord.y / n)).sinh().atan();

    (lat_rad.to_degrees(), lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_grid_center() {
        for zoom in 1..=MAX_ZOOM {
            let coord = project(&GeoLocation::new(0.0, 0.0), zoom);
            let half = grid_size(zoom - 1) as f64;
            assert_eq!(coord.x, half, "x at zoom {}", zoom);
            assert_eq!(coord.y, half, "y at zoom {}", zoom);
        }
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let coord = project(&GeoLocation::new(40.7128, -74.0060), 16);

        assert_eq!(coord.x.floor() as u32, 19295);
        assert_eq!(coord.y.floor() as u32, 24640);
    }

    #[test]
    fn test_london_at_zoom_18() {
        let coord = project(&GeoLocation::new(51.5, -0.12), 18);

        assert_eq!(coord.x.floor() as u32, 130984);
        assert_eq!(coord.y.floor() as u32, 87178);
    }

    #[test]
    fn test_heading_does_not_affect_projection() {
        let plain = GeoLocation::new(48.8566, 2.3522);
        let with_heading = plain.with_heading(135.0);

        assert_eq!(project(&plain, 15), project(&with_heading, 15));
    }

    #[test]
    fn test_southern_hemisphere_is_below_equator() {
        let coord = project(&GeoLocation::new(-33.8688, 151.2093), 10);
        assert!(coord.y > 512.0, "Sydney should be in the southern half");
        assert!(coord.x > 512.0, "Sydney should be in the eastern half");
    }

    #[test]
    fn test_unproject_roundtrip() {
        let original = GeoLocation::new(40.7128, -74.0060);
        let coord = project(&original, 16);
        let (lat, lon) = unproject(coord, 16);

        assert!((lat - original.latitude).abs() < 1e-9);
        assert!((lon - original.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_tile_id_rejects_off_grid() {
        assert!(TileId::new(3, 3, 2).is_ok());
        assert!(matches!(
            TileId::new(4, 0, 2),
            Err(CoordError::OutsideGrid { .. })
        ));
        assert!(matches!(
            TileId::new(0, 0, 20),
            Err(CoordError::InvalidZoom(20))
        ));
    }

    #[test]
    fn test_tile_id_wraps_columns() {
        let east = TileId::wrapping(4, 1, 2).unwrap();
        assert_eq!((east.x, east.y), (0, 1));

        let west = TileId::wrapping(-1, 1, 2).unwrap();
        assert_eq!((west.x, west.y), (3, 1));
    }

    #[test]
    fn test_tile_id_rejects_rows_beyond_poles() {
        assert!(TileId::wrapping(0, -1, 3).is_err());
        assert!(TileId::wrapping(0, 8, 3).is_err());
    }

    #[test]
    fn test_tile_id_display() {
        let tile = TileId::new(130984, 87178, 18).unwrap();
        assert_eq!(tile.to_string(), "18/130984/87178");
    }

    #[test]
    fn test_box_for_tile_centered_location_is_single_tile() {
        let center = FractionalTileCoord { x: 0.5, y: 0.5 };
        let tile_box = TileBox::covering(center, 1.0);

        assert_eq!(
            tile_box,
            TileBox {
                x_min: 0,
                x_max: 0,
                y_min: 0,
                y_max: 0
            }
        );
        assert_eq!(tile_box.cells().count(), 1);
    }

    #[test]
    fn test_box_straddling_tiles() {
        let center = FractionalTileCoord { x: 10.3, y: 20.9 };
        let tile_box = TileBox::covering(center, 1.0);

        assert_eq!((tile_box.x_min, tile_box.x_max), (9, 10));
        assert_eq!((tile_box.y_min, tile_box.y_max), (20, 21));
        assert_eq!(tile_box.columns(), 2);
        assert_eq!(tile_box.rows(), 2);
    }

    #[test]
    fn test_box_on_tile_corner_skips_unused_tiles() {
        let center = FractionalTileCoord { x: 8.0, y: 8.0 };
        let tile_box = TileBox::covering(center, 2.0);

        assert_eq!((tile_box.x_min, tile_box.x_max), (7, 8));
        assert_eq!((tile_box.y_min, tile_box.y_max), (7, 8));
    }

    #[test]
    fn test_small_area_is_at_least_one_tile() {
        let center = FractionalTileCoord { x: 3.5, y: 3.5 };
        let tile_box = TileBox::covering(center, 0.1);

        assert_eq!(tile_box.columns(), 1);
        assert_eq!(tile_box.rows(), 1);
    }

    #[test]
    fn test_cells_iterate_column_major() {
        let tile_box = TileBox {
            x_min: 0,
            x_max: 1,
            y_min: 5,
            y_max: 6,
        };
        let cells: Vec<_> = tile_box.cells().collect();
        assert_eq!(cells, vec![(0, 5), (0, 6), (1, 5), (1, 6)]);
    }

    #[test]
    fn test_normalized_heading() {
        let loc = GeoLocation::new(0.0, 0.0);
        assert_eq!(loc.normalized_heading(), None);
        assert_eq!(loc.with_heading(0.0).normalized_heading(), Some(0.0));
        assert_eq!(loc.with_heading(360.0).normalized_heading(), Some(0.0));
        assert_eq!(loc.with_heading(450.0).normalized_heading(), Some(90.0));
        assert_eq!(loc.with_heading(-90.0).normalized_heading(), Some(270.0));
        assert_eq!(loc.with_heading(f64::NAN).normalized_heading(), None);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projection_in_grid(
                lat in -85.05..85.05_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let coord = project(&GeoLocation::new(lat, lon), zoom);
                let n = grid_size(zoom) as f64;

                prop_assert!(coord.x >= 0.0 && coord.x < n, "x {} outside [0, {})", coord.x, n);
                prop_assert!(coord.y >= 0.0 && coord.y < n, "y {} outside [0, {})", coord.y, n);
            }

            #[test]
            fn test_roundtrip_property(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let coord = project(&GeoLocation::new(lat, lon), zoom);
                let (converted_lat, converted_lon) = unproject(coord, zoom);

                prop_assert!((converted_lat - lat).abs() < 1e-6);
                prop_assert!((converted_lon - lon).abs() < 1e-6);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in 0.0..1.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                zoom in 10u8..=MAX_ZOOM
            ) {
                let a = project(&GeoLocation::new(lat, lon1), zoom);
                let b = project(&GeoLocation::new(lat, lon2), zoom);
                prop_assert!(a.x < b.x);
            }

            #[test]
            fn test_box_covers_requested_area(
                x in 2.0..1000.0_f64,
                y in 2.0..1000.0_f64,
                area in 0.1..5.0_f64
            ) {
                let center = FractionalTileCoord { x, y };
                let tile_box = TileBox::covering(center, area);

                prop_assert!(tile_box.x_max >= tile_box.x_min);
                prop_assert!(tile_box.y_max >= tile_box.y_min);
                prop_assert!(tile_box.x_min as f64 <= x - area / 2.0);
                prop_assert!((tile_box.x_max + 1) as f64 >= x + area / 2.0);
                prop_assert!(tile_box.y_min as f64 <= y - area / 2.0);
                prop_assert!((tile_box.y_max + 1) as f64 >= y + area / 2.0);
            }
        }
    }
}
