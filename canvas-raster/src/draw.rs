//! Disc-stamped painting onto raster buffers.
//!
//! Strokes are rendered by stamping filled discs at sub-pixel steps along
//! each segment, which gives round caps and round joins without a vector
//! path representation. Stamps replace a pixel only when the stamp alpha is
//! at least the existing alpha, so overlapping stamps of a translucent
//! color do not accumulate darker.

use crate::buffer::Raster;

/// Minimum stamp radius; thinner widths still mark the pixels under the path.
const MIN_RADIUS: f32 = 0.5;

/// Segment shorter than this is stamped once at its start.
const MIN_SEGMENT: f32 = 0.1;

/// Stamp a filled disc of the given diameter centered at `(cx, cy)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fill_circle(target: &mut Raster, cx: f32, cy: f32, diameter: f32, color: [u8; 4]) {
    let radius = (diameter * 0.5).max(MIN_RADIUS);
    let (w, h) = target.dimensions();
    let x_min = (cx - radius).floor().max(0.0) as u32;
    let y_min = (cy - radius).floor().max(0.0) as u32;
    let x_max = ((cx + radius).ceil() as i64).clamp(0, i64::from(w) - 1) as u32;
    let y_max = ((cy + radius).ceil() as i64).clamp(0, i64::from(h) - 1) as u32;

    let image = target.image_mut();
    for py in y_min..=y_max {
        for px in x_min..=x_max {
            #[allow(clippy::cast_precision_loss)]
            let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let dst = image.get_pixel_mut(px, py);
            if color[3] >= dst.0[3] {
                dst.0 = color;
            }
        }
    }
}

/// Stamp discs along the segment from `(x0, y0)` to `(x1, y1)` at steps of
/// at most one pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stamp_line(
    target: &mut Raster,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    color: [u8; 4],
) {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let distance = (dx * dx + dy * dy).sqrt();
    if distance < MIN_SEGMENT {
        fill_circle(target, x0, y0, width, color);
        return;
    }

    let steps = distance.ceil() as usize;
    for i in 0..=steps {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f32 / steps as f32;
        fill_circle(target, x0 + dx * t, y0 + dy * t, width, color);
    }
}

/// Stamp a polyline through consecutive points. Fewer than two points is a
/// no-op.
pub fn stroke_polyline(target: &mut Raster, points: &[(f32, f32)], width: f32, color: [u8; 4]) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        stamp_line(target, x0, y0, x1, y1, width, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_circle_covers_center() {
        let mut r = Raster::transparent(10, 10).expect("buffer");
        fill_circle(&mut r, 5.0, 5.0, 4.0, [0, 0, 0, 255]);
        assert_eq!(r.pixel(5, 5)[3], 255);
        assert_eq!(r.pixel(4, 4)[3], 255);
        assert_eq!(r.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_fill_circle_clips_at_edges() {
        let mut r = Raster::transparent(6, 6).expect("buffer");
        fill_circle(&mut r, 0.0, 0.0, 6.0, [255, 0, 0, 255]);
        assert_eq!(r.pixel(0, 0)[3], 255);
        assert_eq!(r.pixel(5, 5)[3], 0);
    }

    #[test]
    fn test_thin_width_still_marks_path() {
        let mut r = Raster::transparent(8, 8).expect("buffer");
        stamp_line(&mut r, 1.5, 4.5, 6.5, 4.5, 0.4, [0, 0, 0, 255]);
        assert_eq!(r.pixel(4, 4)[3], 255);
    }

    #[test]
    fn test_stamp_line_covers_endpoints() {
        let mut r = Raster::transparent(20, 20).expect("buffer");
        stamp_line(&mut r, 2.5, 2.5, 17.5, 17.5, 3.0, [0, 0, 255, 255]);
        assert_eq!(r.pixel(2, 2)[3], 255);
        assert_eq!(r.pixel(17, 17)[3], 255);
        assert_eq!(r.pixel(10, 10)[3], 255);
        assert_eq!(r.pixel(2, 17)[3], 0);
    }

    #[test]
    fn test_translucent_stamps_do_not_accumulate() {
        let mut r = Raster::transparent(10, 10).expect("buffer");
        let translucent = [100, 0, 0, 204];
        fill_circle(&mut r, 5.0, 5.0, 4.0, translucent);
        fill_circle(&mut r, 5.0, 5.0, 4.0, translucent);
        assert_eq!(r.pixel(5, 5), translucent);
    }

    #[test]
    fn test_polyline_stamps_every_segment() {
        let mut r = Raster::transparent(20, 20).expect("buffer");
        let points = [(2.5, 2.5), (17.5, 2.5), (17.5, 17.5)];
        stroke_polyline(&mut r, &points, 2.0, [0, 0, 0, 255]);
        assert_eq!(r.pixel(10, 2)[3], 255);
        assert_eq!(r.pixel(17, 10)[3], 255);
        assert_eq!(r.pixel(5, 10)[3], 0);
    }
}
