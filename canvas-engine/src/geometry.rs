//! Stroke conditioning and coordinate geometry.
//!
//! Transforms a raw input point sequence into a drawable polyline:
//! symmetry snapping toward the vertical mid-axis, causal low-pass
//! smoothing, and parallel-offset computation for double strokes.

use crate::config::{CanvasConfig, CanvasSize, Point};

/// Points within this distance of the vertical mid-axis snap onto it.
pub const SYMMETRY_SNAP_RADIUS: f32 = 10.0;

/// Smoothing factor of the causal low-pass stabilizer.
pub const STABILIZER_ALPHA: f32 = 0.22;

/// Floor for tangent length when computing offset normals.
const MIN_TANGENT: f32 = 0.001;

/// An axis-aligned rectangle in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Shrink the rectangle by `d` on every side. May produce negative
    /// dimensions; callers check before drawing.
    #[must_use]
    pub fn inset(self, d: f32) -> Self {
        Self {
            x: self.x + d,
            y: self.y + d,
            width: self.width - 2.0 * d,
            height: self.height - 2.0 * d,
        }
    }
}

/// The largest rectangle of `image_size`'s aspect ratio centered in
/// `bounds`.
#[must_use]
pub fn aspect_fit_rect(image_size: (f32, f32), bounds: Rect) -> Rect {
    let ar = image_size.0 / image_size.1.max(1.0);
    let br = bounds.width / bounds.height.max(1.0);
    if ar > br {
        let w = bounds.width;
        let h = w / ar;
        Rect::new(bounds.x, bounds.y + bounds.height / 2.0 - h / 2.0, w, h)
    } else {
        let h = bounds.height;
        let w = h * ar;
        Rect::new(bounds.x + bounds.width / 2.0 - w / 2.0, bounds.y, w, h)
    }
}

/// Snap points near the vertical mid-axis exactly onto it.
///
/// Snap-to-axis only: points farther than [`SYMMETRY_SNAP_RADIUS`] pass
/// through unchanged, and nothing is mirrored to the other side.
#[must_use]
pub fn snap_to_axis(points: &[Point], canvas_width: f32) -> Vec<Point> {
    let mid_x = canvas_width / 2.0;
    points
        .iter()
        .map(|p| {
            if (p.x - mid_x).abs() < SYMMETRY_SNAP_RADIUS {
                Point::new(mid_x, p.y)
            } else {
                *p
            }
        })
        .collect()
}

/// Causal exponential smoothing: each output point is
/// `prev + alpha * (raw - prev)`, seeded by the first raw point.
///
/// Sequences of two or fewer points pass through unchanged. The filter is
/// strictly causal, so it lags behind fast input rather than rounding it
/// symmetrically.
#[must_use]
pub fn low_pass_smooth(points: &[Point], alpha: f32) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len());
    let mut prev = points[0];
    out.push(prev);
    for p in &points[1..] {
        let next = Point::new(prev.x + alpha * (p.x - prev.x), prev.y + alpha * (p.y - prev.y));
        out.push(next);
        prev = next;
    }
    out
}

/// Two polylines offset by `±offset` along the local unit normal.
///
/// The tangent at each point is the direction between its immediate
/// neighbors, clamped at the sequence ends; its length is floored to avoid
/// division blow-up on degenerate segments. Fewer than two points returns
/// both polylines unchanged.
#[must_use]
pub fn offset_polylines(points: &[Point], offset: f32) -> (Vec<Point>, Vec<Point>) {
    if points.len() < 2 {
        return (points.to_vec(), points.to_vec());
    }
    let mut left = Vec::with_capacity(points.len());
    let mut right = Vec::with_capacity(points.len());

    for (i, p) in points.iter().enumerate() {
        let prev = points[i.saturating_sub(1)];
        let next = points[(i + 1).min(points.len() - 1)];
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let len = (dx * dx + dy * dy).sqrt().max(MIN_TANGENT);
        let nx = -dy / len;
        let ny = dx / len;
        left.push(Point::new(p.x + nx * offset, p.y + ny * offset));
        right.push(Point::new(p.x - nx * offset, p.y - ny * offset));
    }
    (left, right)
}

/// Run the configured conditioning passes over raw stroke input:
/// symmetry snap, then stabilizer.
#[must_use]
pub fn condition(points: &[Point], size: CanvasSize, config: &CanvasConfig) -> Vec<Point> {
    let mut pts = if config.symmetry {
        snap_to_axis(points, size.width)
    } else {
        points.to_vec()
    };
    if config.stabilizer {
        pts = low_pass_smooth(&pts, STABILIZER_ALPHA);
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_inside_radius() {
        let points = [Point::new(91.0, 5.0), Point::new(109.0, 6.0)];
        let snapped = snap_to_axis(&points, 200.0);
        assert!((snapped[0].x - 100.0).abs() < f32::EPSILON);
        assert!((snapped[1].x - 100.0).abs() < f32::EPSILON);
        assert!((snapped[0].y - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snap_outside_radius_unchanged() {
        let points = [Point::new(89.0, 5.0), Point::new(111.0, 6.0)];
        let snapped = snap_to_axis(&points, 200.0);
        assert!((snapped[0].x - 89.0).abs() < f32::EPSILON);
        assert!((snapped[1].x - 111.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_smooth_fraction_along_constant_direction() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
        ];
        let smoothed = low_pass_smooth(&points, STABILIZER_ALPHA);
        assert_eq!(smoothed.len(), points.len());
        assert!((smoothed[0].x - 0.0).abs() < f32::EPSILON);
        let mut prev = smoothed[0];
        for (raw, s) in points.iter().zip(&smoothed).skip(1) {
            let fraction = (s.x - prev.x) / (raw.x - prev.x);
            assert!((fraction - STABILIZER_ALPHA).abs() < 1e-5);
            assert!(s.x > prev.x && s.x < raw.x);
            prev = *s;
        }
    }

    #[test]
    fn test_smooth_passes_short_sequences_through() {
        let points = [Point::new(0.0, 0.0), Point::new(50.0, 50.0)];
        let smoothed = low_pass_smooth(&points, STABILIZER_ALPHA);
        assert_eq!(smoothed, points.to_vec());
    }

    #[test]
    fn test_offsets_are_parallel_and_separated() {
        let points = [
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
        ];
        let (left, right) = offset_polylines(&points, 4.0);
        for (l, r) in left.iter().zip(&right) {
            assert!((l.y - 14.0).abs() < 1e-4);
            assert!((r.y - 6.0).abs() < 1e-4);
            assert!((l.x - r.x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_offsets_survive_duplicate_points() {
        let points = [
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
        ];
        let (left, right) = offset_polylines(&points, 4.0);
        for p in left.iter().chain(&right) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_aspect_fit_wide_image_in_square() {
        let fitted = aspect_fit_rect((200.0, 100.0), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!((fitted.width - 100.0).abs() < f32::EPSILON);
        assert!((fitted.height - 50.0).abs() < f32::EPSILON);
        assert!((fitted.y - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_aspect_fit_tall_image_in_square() {
        let fitted = aspect_fit_rect((100.0, 200.0), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!((fitted.height - 100.0).abs() < f32::EPSILON);
        assert!((fitted.width - 50.0).abs() < f32::EPSILON);
        assert!((fitted.x - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_condition_applies_passes_in_order() {
        let config = CanvasConfig::default();
        let size = CanvasSize::new(200.0, 200.0);
        let points = [
            Point::new(95.0, 0.0),
            Point::new(95.0, 10.0),
            Point::new(95.0, 20.0),
        ];
        let conditioned = condition(&points, size, &config);
        // Snapped onto the axis first, so smoothing sees constant x.
        for p in &conditioned {
            assert!((p.x - 100.0).abs() < f32::EPSILON);
        }
        // Stabilizer lag on y.
        assert!((conditioned[1].y - 2.2).abs() < 1e-4);
    }
}
