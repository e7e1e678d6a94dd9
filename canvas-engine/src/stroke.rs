//! Stroke rendering onto the ink layer.
//!
//! Produces a replacement ink layer: the previous ink is drawn as the base
//! of the new render, then the conditioned polyline (or the two offset
//! polylines in double mode) is stamped over it.

use canvas_raster::{draw, Raster};

use crate::config::{CanvasConfig, Point};
use crate::error::EngineResult;
use crate::geometry;

fn as_tuples(points: &[Point]) -> Vec<(f32, f32)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

/// Render a conditioned polyline over `base` and return the new ink layer.
///
/// Double mode stamps the two parallel offset polylines independently with
/// the same color and width.
///
/// # Errors
///
/// Returns an error if the replacement buffer cannot be allocated.
pub fn render_stroke(base: &Raster, points: &[Point], config: &CanvasConfig) -> EngineResult<Raster> {
    let mut ink = base.clone();
    let color = config.stroke_color.to_rgba();

    if config.double_stroke {
        let (left, right) = geometry::offset_polylines(points, config.double_stroke_offset);
        draw::stroke_polyline(&mut ink, &as_tuples(&left), config.stroke_width, color);
        draw::stroke_polyline(&mut ink, &as_tuples(&right), config.stroke_width, color);
    } else {
        draw::stroke_polyline(&mut ink, &as_tuples(points), config.stroke_width, color);
    }

    Ok(ink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;

    fn base(w: u32, h: u32) -> Raster {
        Raster::transparent(w, h).expect("base layer")
    }

    fn test_config() -> CanvasConfig {
        CanvasConfig {
            stabilizer: false,
            symmetry: false,
            ..CanvasConfig::default()
        }
    }

    #[test]
    fn test_single_stroke_marks_path() {
        let config = test_config();
        let points = [Point::new(5.0, 20.0), Point::new(35.0, 20.0)];
        let ink = render_stroke(&base(40, 40), &points, &config).expect("render");
        assert!(ink.pixel(20, 20)[3] > 0);
        assert_eq!(ink.pixel(20, 35)[3], 0);
    }

    #[test]
    fn test_stroke_preserves_existing_ink() {
        let config = test_config();
        let first = [Point::new(5.0, 10.0), Point::new(35.0, 10.0)];
        let second = [Point::new(5.0, 30.0), Point::new(35.0, 30.0)];
        let ink = render_stroke(&base(40, 40), &first, &config).expect("first");
        let ink = render_stroke(&ink, &second, &config).expect("second");
        assert!(ink.pixel(20, 10)[3] > 0);
        assert!(ink.pixel(20, 30)[3] > 0);
    }

    #[test]
    fn test_double_stroke_leaves_gap_between_lines() {
        let config = CanvasConfig {
            double_stroke: true,
            double_stroke_offset: 6.0,
            stroke_width: 2.0,
            ..test_config()
        };
        let points = [Point::new(5.0, 20.0), Point::new(35.0, 20.0)];
        let ink = render_stroke(&base(40, 40), &points, &config).expect("render");
        // Both offset bands inked, centerline untouched.
        assert!(ink.pixel(20, 14)[3] > 0);
        assert!(ink.pixel(20, 26)[3] > 0);
        assert_eq!(ink.pixel(20, 20)[3], 0);
    }

    #[test]
    fn test_stroke_uses_configured_color() {
        let config = CanvasConfig {
            stroke_color: Color::rgb(180, 30, 30),
            ..test_config()
        };
        let points = [Point::new(5.0, 20.0), Point::new(35.0, 20.0)];
        let ink = render_stroke(&base(40, 40), &points, &config).expect("render");
        let px = ink.pixel(20, 20);
        assert_eq!((px[0], px[1], px[2]), (180, 30, 30));
    }
}
