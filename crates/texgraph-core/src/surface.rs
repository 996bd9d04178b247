//! Drawing surface contract consumed by item `draw` implementations.
//!
//! Paths are built with kurbo and handed to the surface whole, so a backend only
//! needs to know how to fill, stroke, blit and place text.

use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Stroke};
use peniko::Color;
use peniko::color::{AlphaColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

/// Path flattening tolerance used when converting kurbo shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Opaque handle to a thumbnail owned by the image backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThumbnailId(pub u64);

/// Font description for text measurement and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family name.
    pub family: String,
    /// Size in surface units.
    pub size: f64,
    /// CSS-style weight (400 = regular, 700 = bold).
    pub weight: u16,
}

impl FontSpec {
    /// Default UI family.
    pub const DEFAULT_FAMILY: &'static str = "Open Sans";

    /// Create a regular-weight font of the given size in the default family.
    pub fn new(size: f64) -> Self {
        Self {
            family: Self::DEFAULT_FAMILY.to_string(),
            size,
            weight: 400,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    /// Set the family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Primitive drawing operations plus an affine transform stack.
///
/// All coordinates passed in are interpreted through the current transform.
pub trait Surface {
    /// Fill a path with a solid color.
    fn fill(&mut self, path: &BezPath, color: Color);

    /// Stroke a path. Line width and dash pattern come from `style`.
    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color);

    /// Blit a thumbnail into `dest`.
    fn draw_image(&mut self, image: ThumbnailId, dest: Rect);

    /// Advance width of `text` in surface units.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64;

    /// Fill `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color);

    /// Current transform.
    fn transform(&self) -> Affine;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop the transform pushed by the matching `save`.
    fn restore(&mut self);
}

/// Closed rectangular path.
pub fn rect_path(rect: Rect) -> BezPath {
    rect.to_path(PATH_TOLERANCE)
}

/// Rounded rectangle path. A non-positive radius yields a sharp rectangle.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    if radius > 0.0 {
        RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE)
    } else {
        rect_path(rect)
    }
}

/// Color from CSS-style HSL: hue in degrees, saturation and lightness in
/// percent, alpha in `0..=1`.
pub fn hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Color {
    AlphaColor::<Hsl>::new([hue as f32, saturation as f32, lightness as f32, alpha as f32]).convert::<Srgb>()
}

/// Dashed stroke with the given width and dash/gap pattern.
pub fn dashed_stroke(width: f64, pattern: &[f64]) -> Stroke {
    Stroke::new(width).with_dashes(0.0, pattern.iter().copied())
}
