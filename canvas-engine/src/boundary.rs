//! Boundary bitmap construction and tolerance-aware flood fill.
//!
//! The boundary bitmap starts opaque white; the template boundary layer
//! (when enabled) and the ink layer are multiply-blended over it, so any
//! drawn pixel darkens the bitmap. A pixel counts as boundary iff the sum
//! of its R+G+B channels falls below [`BOUNDARY_THRESHOLD`].

use canvas_raster::{BlendMode, Raster, RegionMask};

use crate::config::{CanvasSize, Point};
use crate::error::{EngineError, EngineResult};

/// A pixel is boundary iff `r + g + b` is below this (not near-white).
pub const BOUNDARY_THRESHOLD: u32 = 240 * 3;

/// Build the boundary bitmap for a fill operation.
///
/// # Errors
///
/// Returns an error if the white base buffer cannot be allocated or the
/// layer dimensions disagree.
pub fn build_boundary_bitmap(
    ink: &Raster,
    template_boundary: Option<&Raster>,
    include_template: bool,
) -> EngineResult<Raster> {
    let (w, h) = ink.dimensions();
    let mut bitmap = Raster::filled(w, h, [255, 255, 255, 255])?;
    if include_template {
        if let Some(template) = template_boundary {
            bitmap.composite(template, BlendMode::Multiply, 1.0)?;
        }
    }
    bitmap.composite(ink, BlendMode::Multiply, 1.0)?;
    Ok(bitmap)
}

/// Per-pixel boundary flags for a bitmap.
fn boundary_flags(bitmap: &Raster) -> Vec<bool> {
    bitmap
        .as_raw()
        .chunks_exact(4)
        .map(|px| u32::from(px[0]) + u32::from(px[1]) + u32::from(px[2]) < BOUNDARY_THRESHOLD)
        .collect()
}

/// Dilate boundary flags by a Chebyshev radius.
///
/// Two separable passes (rows, then columns) produce exactly the same
/// blocked set as scanning the full `(2 * tol + 1)²` window per pixel.
fn dilate_flags(flags: &[bool], width: usize, height: usize, tol: usize) -> Vec<bool> {
    if tol == 0 {
        return flags.to_vec();
    }
    let mut rows = vec![false; flags.len()];
    for y in 0..height {
        for x in 0..width {
            let lo = x.saturating_sub(tol);
            let hi = (x + tol).min(width - 1);
            rows[y * width + x] = (lo..=hi).any(|xx| flags[y * width + xx]);
        }
    }
    let mut out = vec![false; flags.len()];
    for y in 0..height {
        let lo = y.saturating_sub(tol);
        let hi = (y + tol).min(height - 1);
        for x in 0..width {
            out[y * width + x] = (lo..=hi).any(|yy| rows[yy * width + x]);
        }
    }
    out
}

/// Map a logical seed point to boundary-bitmap pixel coordinates, clamped
/// to the valid range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn map_seed(seed: Point, size: CanvasSize, width: u32, height: u32) -> (u32, u32) {
    let sx = (seed.x * width as f32 / size.width) as i64;
    let sy = (seed.y * height as f32 / size.height) as i64;
    (
        sx.clamp(0, i64::from(width) - 1) as u32,
        sy.clamp(0, i64::from(height) - 1) as u32,
    )
}

/// Flood-fill the bitmap from a seed point and return the region mask.
///
/// Iterative 4-connected traversal. A neighbor blocks when it is boundary
/// itself or when any boundary pixel lies within `gap_tolerance` of it;
/// the blocking set is a dilation of the boundary, but the emitted mask is
/// not dilated.
///
/// # Errors
///
/// Returns [`EngineError::SeedOnBoundary`] if the mapped seed pixel is a
/// boundary pixel, or a raster error if the mask cannot be built.
#[allow(clippy::cast_possible_truncation)]
pub fn flood_fill_mask(
    bitmap: &Raster,
    seed: Point,
    size: CanvasSize,
    gap_tolerance: u32,
) -> EngineResult<RegionMask> {
    let (w, h) = bitmap.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let (sx, sy) = map_seed(seed, size, w, h);

    let flags = boundary_flags(bitmap);
    let seed_idx = sy as usize * wu + sx as usize;
    if flags[seed_idx] {
        return Err(EngineError::SeedOnBoundary { x: sx, y: sy });
    }

    let blocked = dilate_flags(&flags, wu, hu, gap_tolerance as usize);

    let mut visited = vec![false; wu * hu];
    let mut region = vec![0u8; wu * hu];
    let mut stack: Vec<u32> = Vec::with_capacity(4096);
    visited[seed_idx] = true;
    stack.push(seed_idx as u32);

    while let Some(idx) = stack.pop() {
        let idx = idx as usize;
        region[idx] = 255;
        let (x, y) = (idx % wu, idx / wu);

        let mut neighbors = [usize::MAX; 4];
        if x > 0 {
            neighbors[0] = idx - 1;
        }
        if x + 1 < wu {
            neighbors[1] = idx + 1;
        }
        if y > 0 {
            neighbors[2] = idx - wu;
        }
        if y + 1 < hu {
            neighbors[3] = idx + wu;
        }

        for &ni in &neighbors {
            if ni == usize::MAX || visited[ni] {
                continue;
            }
            visited[ni] = true;
            if blocked[ni] {
                continue;
            }
            stack.push(ni as u32);
        }
    }

    Ok(RegionMask::from_raw(w, h, region)?)
}
