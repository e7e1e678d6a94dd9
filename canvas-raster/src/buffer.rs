//! RGBA raster buffer with alpha compositing.
//!
//! Buffers hold straight (non-premultiplied) RGBA8 pixels. Compositing
//! follows the source-over rule; the multiply mode applies the W3C multiply
//! blend to the color channels before compositing.

use image::{imageops, Rgba, RgbaImage};

use crate::error::{RasterError, RasterResult};

/// Blend mode for compositing one buffer over another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Plain source-over alpha compositing.
    Normal,
    /// Multiply the color channels, then composite source-over.
    Multiply,
}

/// A fixed-size RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    data: RgbaImage,
}

impl Raster {
    /// Create a fully transparent buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if either dimension is zero.
    pub fn transparent(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data: RgbaImage::new(width, height),
        })
    }

    /// Create a buffer filled with a single color.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if either dimension is zero.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data: RgbaImage::from_pixel(width, height, Rgba(color)),
        })
    }

    /// Wrap an existing decoded image.
    #[must_use]
    pub fn from_image(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Buffer dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.data.dimensions()
    }

    /// Read one pixel as `[r, g, b, a]`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.data.get_pixel(x, y).0
    }

    /// Write one pixel as `[r, g, b, a]`, replacing the existing value.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.data.get_pixel_mut(x, y).0 = color;
    }

    /// Raw RGBA bytes, row-major, 4 bytes per pixel.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.data.as_raw()
    }

    /// Whether every pixel has zero alpha.
    #[must_use]
    pub fn is_fully_transparent(&self) -> bool {
        self.data.pixels().all(|p| p.0[3] == 0)
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.data
    }

    /// Composite `src` over this buffer at equal dimensions.
    ///
    /// `opacity` in `[0, 1]` scales the source alpha before compositing.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::DimensionMismatch`] if the buffers differ in size.
    pub fn composite(&mut self, src: &Raster, mode: BlendMode, opacity: f32) -> RasterResult<()> {
        if self.dimensions() != src.dimensions() {
            return Err(RasterError::DimensionMismatch {
                expected: self.dimensions(),
                actual: src.dimensions(),
            });
        }
        for (dst_px, src_px) in self.data.pixels_mut().zip(src.data.pixels()) {
            dst_px.0 = blend_pixel(dst_px.0, src_px.0, mode, opacity);
        }
        Ok(())
    }

    /// Composite `src` over this buffer with its top-left corner at
    /// `(offset_x, offset_y)`. Source pixels falling outside the
    /// destination are clipped.
    pub fn composite_at(
        &mut self,
        src: &Raster,
        offset_x: i32,
        offset_y: i32,
        mode: BlendMode,
        opacity: f32,
    ) {
        let (dw, dh) = self.dimensions();
        for (sx, sy, src_px) in src.data.enumerate_pixels() {
            #[allow(clippy::cast_possible_wrap)]
            let (tx, ty) = (sx as i32 + offset_x, sy as i32 + offset_y);
            if tx < 0 || ty < 0 {
                continue;
            }
            #[allow(clippy::cast_sign_loss)]
            let (tx, ty) = (tx as u32, ty as u32);
            if tx >= dw || ty >= dh {
                continue;
            }
            let dst_px = self.data.get_pixel_mut(tx, ty);
            dst_px.0 = blend_pixel(dst_px.0, src_px.0, mode, opacity);
        }
    }

    /// Resample `src` into the rectangle `(x, y, width, height)` of this
    /// buffer and composite it source-over at the given opacity.
    ///
    /// A rectangle that rounds below one pixel in either dimension is
    /// skipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw_fitted(&mut self, src: &Raster, x: f32, y: f32, width: f32, height: f32, opacity: f32) {
        let (tw, th) = (width.round() as i64, height.round() as i64);
        if tw < 1 || th < 1 {
            tracing::trace!("fitted draw skipped: target {width}x{height} below one pixel");
            return;
        }
        let resampled = imageops::resize(&src.data, tw as u32, th as u32, imageops::FilterType::Triangle);
        let resampled = Raster { data: resampled };
        self.composite_at(&resampled, x.round() as i32, y.round() as i32, BlendMode::Normal, opacity);
    }
}

/// Composite one straight-alpha pixel over another.
///
/// Multiply uses the W3C formulation: the source color is mixed toward
/// `Cs * Cb` by the backdrop alpha before source-over compositing, so a
/// transparent backdrop leaves the source untouched and an opaque white
/// backdrop reduces multiply to a plain copy.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_pixel(dst: [u8; 4], src: [u8; 4], mode: BlendMode, opacity: f32) -> [u8; 4] {
    let sa = f32::from(src[3]) / 255.0 * opacity.clamp(0.0, 1.0);
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let sc = f32::from(src[c]) / 255.0;
        let dc = f32::from(dst[c]) / 255.0;
        let mixed = match mode {
            BlendMode::Normal => sc,
            BlendMode::Multiply => (1.0 - da) * sc + da * (sc * dc),
        };
        let co = sa * mixed + da * dc * (1.0 - sa);
        out[c] = ((co / out_a) * 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_creation() {
        let r = Raster::transparent(4, 3).expect("buffer");
        assert_eq!(r.dimensions(), (4, 3));
        assert!(r.is_fully_transparent());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Raster::transparent(0, 10).is_err());
        assert!(Raster::filled(10, 0, [255, 255, 255, 255]).is_err());
    }

    #[test]
    fn test_source_over_opaque() {
        let mut dst = Raster::filled(2, 2, [255, 255, 255, 255]).expect("dst");
        let src = Raster::filled(2, 2, [255, 0, 0, 255]).expect("src");
        dst.composite(&src, BlendMode::Normal, 1.0).expect("composite");
        assert_eq!(dst.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_source_over_transparent_source_is_noop() {
        let mut dst = Raster::filled(2, 2, [10, 20, 30, 255]).expect("dst");
        let src = Raster::transparent(2, 2).expect("src");
        dst.composite(&src, BlendMode::Normal, 1.0).expect("composite");
        assert_eq!(dst.pixel(1, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_multiply_over_white_keeps_source_color() {
        let mut dst = Raster::filled(2, 2, [255, 255, 255, 255]).expect("dst");
        let src = Raster::filled(2, 2, [40, 80, 120, 255]).expect("src");
        dst.composite(&src, BlendMode::Multiply, 1.0).expect("composite");
        assert_eq!(dst.pixel(0, 0), [40, 80, 120, 255]);
    }

    #[test]
    fn test_multiply_transparent_source_keeps_backdrop() {
        let mut dst = Raster::filled(2, 2, [255, 255, 255, 255]).expect("dst");
        let src = Raster::transparent(2, 2).expect("src");
        dst.composite(&src, BlendMode::Multiply, 1.0).expect("composite");
        assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_multiply_darkens() {
        let mut dst = Raster::filled(1, 1, [128, 128, 128, 255]).expect("dst");
        let src = Raster::filled(1, 1, [128, 128, 128, 255]).expect("src");
        dst.composite(&src, BlendMode::Multiply, 1.0).expect("composite");
        let px = dst.pixel(0, 0);
        assert!(px[0] < 128, "multiply should darken, got {}", px[0]);
    }

    #[test]
    fn test_opacity_scales_source_alpha() {
        let mut dst = Raster::filled(1, 1, [0, 0, 0, 255]).expect("dst");
        let src = Raster::filled(1, 1, [255, 255, 255, 255]).expect("src");
        dst.composite(&src, BlendMode::Normal, 0.5).expect("composite");
        let px = dst.pixel(0, 0);
        assert!((126..=129).contains(&px[0]), "expected ~half gray, got {}", px[0]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut dst = Raster::transparent(2, 2).expect("dst");
        let src = Raster::transparent(3, 2).expect("src");
        assert!(matches!(
            dst.composite(&src, BlendMode::Normal, 1.0),
            Err(RasterError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_composite_at_clips() {
        let mut dst = Raster::transparent(4, 4).expect("dst");
        let src = Raster::filled(3, 3, [255, 0, 0, 255]).expect("src");
        dst.composite_at(&src, 2, 2, BlendMode::Normal, 1.0);
        assert_eq!(dst.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(dst.pixel(3, 3), [255, 0, 0, 255]);
        assert_eq!(dst.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_fitted_scales_into_rect() {
        let mut dst = Raster::transparent(10, 10).expect("dst");
        let src = Raster::filled(2, 2, [0, 255, 0, 255]).expect("src");
        dst.draw_fitted(&src, 2.0, 2.0, 6.0, 6.0, 1.0);
        assert_eq!(dst.pixel(4, 4)[1], 255);
        assert_eq!(dst.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(dst.pixel(9, 9), [0, 0, 0, 0]);
    }
}
