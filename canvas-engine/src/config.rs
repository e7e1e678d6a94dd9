//! Engine configuration and the value types shared across operations.
//!
//! The caller owns a [`CanvasConfig`] and mutates it between operations;
//! each engine call reads one consistent snapshot.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// The active drawing tool.
///
/// Tool routing happens in the input layer: brush gestures become strokes,
/// bucket and pattern taps become fills. The engine carries the value for
/// the caller but does not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand stroke drawing.
    Brush,
    /// Tap-to-fill with the configured pattern.
    Bucket,
    /// Tap-to-fill with an explicitly chosen pattern.
    Pattern,
}

/// Repeating fill pattern kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Grid of small discs.
    Dots,
    /// Parallel diagonal stripes.
    Stripes,
    /// Crossed diagonal stripes.
    Crosshatch,
}

/// An RGBA color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Copy of this color with its alpha scaled by `opacity` in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Channels as `[r, g, b, a]`.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A point in logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Logical canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in logical units.
    pub width: f32,
    /// Height in logical units.
    pub height: f32,
}

impl CanvasSize {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel dimensions: logical units rounded to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_dimensions(self) -> (u32, u32) {
        (self.width.round().max(0.0) as u32, self.height.round().max(0.0) as u32)
    }
}

/// Configuration snapshot read by every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Active drawing tool.
    pub active_tool: Tool,
    /// Render strokes as two parallel offset lines.
    pub double_stroke: bool,
    /// Stroke color; fills stamp it at 0.8 opacity.
    pub stroke_color: Color,
    /// Stroke width in logical units.
    pub stroke_width: f32,
    /// Perpendicular distance of each double-stroke line from the path.
    pub double_stroke_offset: f32,
    /// Apply causal motion smoothing to stroke input.
    pub stabilizer: bool,
    /// Snap near-center points onto the vertical mid-axis.
    pub symmetry: bool,
    /// Pixel radius within which a near-boundary pixel still blocks fill.
    pub gap_tolerance: u32,
    /// Merge the template-derived boundary into the fill boundary.
    pub boundary_includes_template: bool,
    /// Display hint for the external compositor: fill layer sits below ink.
    pub fill_below_ink: bool,
    /// Pattern used by fill operations.
    pub pattern: PatternKind,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            active_tool: Tool::Brush,
            double_stroke: false,
            stroke_color: Color::BLACK,
            stroke_width: 3.2,
            double_stroke_offset: 4.0,
            stabilizer: true,
            symmetry: true,
            gap_tolerance: 3,
            boundary_includes_template: true,
            fill_below_ink: true,
            pattern: PatternKind::Dots,
        }
    }
}

impl CanvasConfig {
    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
