//! Pattern tile generation and mask-clipped fill rendering.
//!
//! A single 24x24 tile is rasterized once per fill, repeated across the
//! canvas from the origin, clipped to the flood-fill region mask, and
//! composited over the previous fill layer.

use canvas_raster::{draw, BlendMode, Raster, RegionMask};

use crate::config::{Color, PatternKind};
use crate::error::EngineResult;

/// Pattern tile edge length in pixels.
pub const TILE_SIZE: u32 = 24;

/// Spacing between stripe diagonals.
const STRIPE_SPACING: usize = 6;

/// Rasterize one pattern tile in the given color.
///
/// Stripes and crosshatch overflow the tile bounds so edges align when the
/// tile repeats.
///
/// # Errors
///
/// Returns an error if the tile buffer cannot be allocated.
pub fn pattern_tile(kind: PatternKind, color: Color) -> EngineResult<Raster> {
    let mut tile = Raster::transparent(TILE_SIZE, TILE_SIZE)?;
    let rgba = color.to_rgba();

    match kind {
        PatternKind::Dots => {
            for y in (4..=20).step_by(8) {
                for x in (4..=20).step_by(8) {
                    #[allow(clippy::cast_precision_loss)]
                    draw::fill_circle(&mut tile, x as f32 + 1.5, y as f32 + 1.5, 3.0, rgba);
                }
            }
        }
        PatternKind::Stripes => {
            for x in (-24..=48).step_by(STRIPE_SPACING) {
                #[allow(clippy::cast_precision_loss)]
                let x = x as f32;
                draw::stamp_line(&mut tile, x, 0.0, x + 24.0, 24.0, 2.0, rgba);
            }
        }
        PatternKind::Crosshatch => {
            for x in (-24..=48).step_by(STRIPE_SPACING) {
                #[allow(clippy::cast_precision_loss)]
                let x = x as f32;
                draw::stamp_line(&mut tile, x, 0.0, x + 24.0, 24.0, 1.6, rgba);
                draw::stamp_line(&mut tile, x, 24.0, x + 24.0, 0.0, 1.6, rgba);
            }
        }
    }
    Ok(tile)
}

/// Repeat a tile across a full-canvas buffer starting at the origin.
///
/// # Errors
///
/// Returns an error if the canvas buffer cannot be allocated.
pub fn tile_across(tile: &Raster, width: u32, height: u32) -> EngineResult<Raster> {
    let mut tiled = Raster::transparent(width, height)?;
    let (tw, th) = tile.dimensions();
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            #[allow(clippy::cast_possible_wrap)]
            tiled.composite_at(tile, x as i32, y as i32, BlendMode::Normal, 1.0);
            x += tw;
        }
        y += th;
    }
    Ok(tiled)
}

/// Clip a tiled pattern to a region mask.
///
/// # Errors
///
/// Returns an error if the output buffer cannot be allocated or the mask
/// and pattern dimensions disagree.
pub fn clip_to_mask(tiled: &Raster, mask: &RegionMask) -> EngineResult<Raster> {
    let (w, h) = tiled.dimensions();
    if (mask.width(), mask.height()) != (w, h) {
        return Err(canvas_raster::RasterError::DimensionMismatch {
            expected: (w, h),
            actual: (mask.width(), mask.height()),
        }
        .into());
    }
    let mut clipped = Raster::transparent(w, h)?;
    for y in 0..h {
        for x in 0..w {
            if mask.is_inside(x, y) {
                clipped.put_pixel(x, y, tiled.pixel(x, y));
            }
        }
    }
    Ok(clipped)
}

/// Render a fill operation: tile the pattern over the canvas, clip it to
/// the region mask, and composite over the previous fill layer. Returns
/// the replacement fill layer.
///
/// # Errors
///
/// Returns an error on buffer allocation failure or dimension mismatch.
pub fn render_fill(
    base_fill: &Raster,
    mask: &RegionMask,
    kind: PatternKind,
    color: Color,
) -> EngineResult<Raster> {
    let (w, h) = base_fill.dimensions();
    let tile = pattern_tile(kind, color)?;
    let tiled = tile_across(&tile, w, h)?;
    let clipped = clip_to_mask(&tiled, mask)?;

    let mut fill = base_fill.clone();
    fill.composite(&clipped, BlendMode::Normal, 1.0)?;
    Ok(fill)
}
