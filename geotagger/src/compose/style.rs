//! Annotation style.

/// Appearance of the position marker and field-of-view cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// RGBA color of every annotation stroke
    pub color: [u8; 4],
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// Radius of the position ring in pixels, independent of zoom and area
    pub marker_radius: f32,
    /// Full angular width of the field-of-view cone in degrees
    pub fov_degrees: f64,
    /// Cone line length as a fraction of half the shorter raster side
    pub line_fraction: f64,
    /// Cone arc radius as a fraction of half the shorter raster side
    pub arc_fraction: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            stroke_width: 2.0,
            marker_radius: 4.0,
            fov_degrees: 45.0,
            line_fraction: 0.5,
            arc_fraction: 0.2,
        }
    }
}
