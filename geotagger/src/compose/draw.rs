//! Marker and field-of-view drawing.
//!
//! Angles follow compass convention: 0° points up (north) and grows
//! clockwise, so a direction `a` from center `(cx, cy)` at distance `r`
//! lands on `(cx + sin(a)·r, cy − cos(a)·r)` in screen space.

use image::RgbaImage;
use tiny_skia::{Paint, PathBuilder, PixmapMut, Shader, Stroke, Transform};

use super::style::MarkerStyle;
use super::MapError;

/// Maximum angular step between arc vertices, in degrees.
const ARC_STEP_DEGREES: f64 = 2.0;

/// Screen-space geometry of a field-of-view cone.
#[derive(Debug, Clone, PartialEq)]
pub struct ConeGeometry {
    /// Cone apex, the exact raster center
    pub apex: (f64, f64),
    /// End of the counter-clockwise boundary line
    pub left: (f64, f64),
    /// End of the clockwise boundary line
    pub right: (f64, f64),
    /// Length of the boundary lines
    pub line_radius: f64,
    /// Polyline approximating the arc, left to right
    pub arc: Vec<(f64, f64)>,
}

impl ConeGeometry {
    /// Lays out a cone for `heading` (degrees, already in `[0, 360)`) on a
    /// `width`×`height` raster.
    pub fn new(width: u32, height: u32, heading: f64, style: &MarkerStyle) -> Self {
        let apex = (width as f64 / 2.0, height as f64 / 2.0);
        let half_side = width.min(height) as f64 / 2.0;
        let line_radius = half_side * style.line_fraction;
        let arc_radius = half_side * style.arc_fraction;

        let start = heading - style.fov_degrees / 2.0;
        let end = heading + style.fov_degrees / 2.0;

        let steps = ((end - start) / ARC_STEP_DEGREES).ceil().max(1.0) as usize;
        let arc = (0..=steps)
            .map(|i| {
                let angle = start + (end - start) * i as f64 / steps as f64;
                polar(apex, angle, arc_radius)
            })
            .collect();

        Self {
            apex,
            left: polar(apex, start, line_radius),
            right: polar(apex, end, line_radius),
            line_radius,
            arc,
        }
    }
}

/// Point at `distance` from `origin` in compass direction `degrees`.
fn polar(origin: (f64, f64), degrees: f64, distance: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (
        origin.0 + radians.sin() * distance,
        origin.1 - radians.cos() * distance,
    )
}

/// Draws the position ring and, when a heading is given, the cone.
///
/// Fails with [`MapError::Canvas`] if the raster cannot be wrapped for
/// drawing, e.g. when it is empty.
pub fn annotate(
    map: &mut RgbaImage,
    heading: Option<f64>,
    style: &MarkerStyle,
) -> Result<(), MapError> {
    let (width, height) = map.dimensions();
    let buffer: &mut [u8] = map;
    let mut pixmap =
        PixmapMut::from_bytes(buffer, width, height).ok_or(MapError::Canvas { width, height })?;

    let [r, g, b, a] = style.color;
    let paint = Paint {
        shader: Shader::SolidColor(tiny_skia::Color::from_rgba8(r, g, b, a)),
        anti_alias: false,
        ..Default::default()
    };
    let stroke = Stroke {
        width: style.stroke_width,
        ..Default::default()
    };

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    if let Some(ring) = PathBuilder::from_circle(cx, cy, style.marker_radius) {
        pixmap.stroke_path(&ring, &paint, &stroke, Transform::default(), None);
    }

    if let Some(heading) = heading {
        let cone = ConeGeometry::new(width, height, heading, style);
        for end in [cone.left, cone.right] {
            let mut pb = PathBuilder::new();
            pb.move_to(cone.apex.0 as f32, cone.apex.1 as f32);
            pb.line_to(end.0 as f32, end.1 as f32);
            if let Some(line) = pb.finish() {
                pixmap.stroke_path(&line, &paint, &stroke, Transform::default(), None);
            }
        }

        let mut pb = PathBuilder::new();
        let mut points = cone.arc.iter();
        if let Some(first) = points.next() {
            pb.move_to(first.0 as f32, first.1 as f32);
            for point in points {
                pb.line_to(point.0 as f32, point.1 as f32);
            }
        }
        if let Some(arc) = pb.finish() {
            pixmap.stroke_path(&arc, &paint, &stroke, Transform::default(), None);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BACKGROUND: Rgba<u8> = Rgba([30, 160, 60, 255]);

    fn blank(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, BACKGROUND)
    }

    fn changed_pixels(image: &RgbaImage) -> Vec<(u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn distance_from_center(image: &RgbaImage, (x, y): (u32, u32)) -> f64 {
        let dx = x as f64 + 0.5 - image.width() as f64 / 2.0;
        let dy = y as f64 + 0.5 - image.height() as f64 / 2.0;
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn test_north_cone_points_up() {
        let cone = ConeGeometry::new(256, 256, 0.0, &MarkerStyle::default());

        assert_eq!(cone.apex, (128.0, 128.0));
        assert_eq!(cone.line_radius, 64.0);
        assert!(cone.left.0 < 128.0 && cone.left.1 < 128.0);
        assert!(cone.right.0 > 128.0 && cone.right.1 < 128.0);
        assert!((cone.left.1 - cone.right.1).abs() < 1e-9);
    }

    #[test]
    fn test_east_cone_points_right() {
        let cone = ConeGeometry::new(256, 256, 90.0, &MarkerStyle::default());

        assert!(cone.left.0 > 128.0 && cone.left.1 < 128.0);
        assert!(cone.right.0 > 128.0 && cone.right.1 > 128.0);
    }

    #[test]
    fn test_cone_lines_within_radius() {
        let style = MarkerStyle::default();
        for heading in [0.0, 45.0, 123.4, 270.0, 359.9] {
            let cone = ConeGeometry::new(300, 200, heading, &style);
            for end in [cone.left, cone.right] {
                let d = ((end.0 - cone.apex.0).powi(2) + (end.1 - cone.apex.1).powi(2)).sqrt();
                assert!(d <= cone.line_radius + 1e-9);
                assert!(end.0 >= 0.0 && end.0 <= 300.0);
                assert!(end.1 >= 0.0 && end.1 <= 200.0);
            }
        }
    }

    #[test]
    fn test_line_radius_uses_shorter_side() {
        let cone = ConeGeometry::new(400, 100, 0.0, &MarkerStyle::default());
        assert_eq!(cone.line_radius, 25.0);
    }

    #[test]
    fn test_arc_spans_fov() {
        let style = MarkerStyle::default();
        let cone = ConeGeometry::new(256, 256, 0.0, &style);
        let arc_radius = 128.0 * style.arc_fraction;

        assert!(cone.arc.len() > 2);
        for point in &cone.arc {
            let d = ((point.0 - 128.0).powi(2) + (point.1 - 128.0).powi(2)).sqrt();
            assert!((d - arc_radius).abs() < 1e-9);
        }
        let first = cone.arc.first().unwrap();
        let last = cone.arc.last().unwrap();
        assert!((first.0 - (128.0 - (22.5f64).to_radians().sin() * arc_radius)).abs() < 1e-9);
        assert!((last.0 - (128.0 + (22.5f64).to_radians().sin() * arc_radius)).abs() < 1e-9);
    }

    #[test]
    fn test_ring_only_without_heading() {
        let style = MarkerStyle::default();
        let mut map = blank(256);
        annotate(&mut map, None, &style).unwrap();

        let changed = changed_pixels(&map);
        assert!(!changed.is_empty());
        let bound = style.marker_radius as f64 + style.stroke_width as f64;
        for pixel in changed {
            assert!(distance_from_center(&map, pixel) <= bound, "{:?}", pixel);
        }

        // Outline only: the center itself stays untouched.
        assert_eq!(map.get_pixel(128, 128), &BACKGROUND);
        // A point on the ring carries the marker color.
        assert_eq!(map.get_pixel(132, 128), &Rgba(style.color));
        assert_eq!(map.get_pixel(123, 128), &Rgba(style.color));
    }

    #[test]
    fn test_cone_drawn_with_heading() {
        let style = MarkerStyle::default();
        let mut map = blank(256);
        annotate(&mut map, Some(90.0), &style).unwrap();

        assert_eq!(map.get_pixel(128, 128), &Rgba(style.color));

        let changed = changed_pixels(&map);
        let far = changed
            .iter()
            .filter(|p| distance_from_center(&map, **p) > 10.0)
            .count();
        assert!(far > 0, "cone should reach beyond the marker");

        let bound = 64.0 + style.stroke_width as f64 + 1.0;
        for pixel in changed {
            assert!(distance_from_center(&map, pixel) <= bound, "{:?}", pixel);
        }
    }

    #[test]
    fn test_north_heading_is_drawn() {
        let mut map = blank(256);
        annotate(&mut map, Some(0.0), &MarkerStyle::default()).unwrap();

        let above = changed_pixels(&map)
            .into_iter()
            .filter(|&(_, y)| y < 100)
            .count();
        assert!(above > 0);
        let below = changed_pixels(&map)
            .into_iter()
            .filter(|&(_, y)| y > 140)
            .count();
        assert_eq!(below, 0);
    }

    #[test]
    fn test_empty_raster_is_canvas_error() {
        let mut map = RgbaImage::new(0, 0);
        let err = annotate(&mut map, Some(10.0), &MarkerStyle::default()).unwrap_err();
        assert!(matches!(err, MapError::Canvas { width: 0, height: 0 }));
    }
}
