//! # Canvas Raster
//!
//! Pixel-buffer primitives for the layered canvas engine.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              canvas-raster                  │
//! ├──────────────────────┬──────────────────────┤
//! │  Raster              │  RegionMask          │
//! │  - RGBA8, straight α │  - single channel    │
//! │  - normal/multiply   │  - 0 = outside       │
//! │  - fitted draws      │  - 255 = inside      │
//! ├──────────────────────┴──────────────────────┤
//! │  draw: disc stamps, stamped lines/polylines │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod draw;
pub mod error;
pub mod mask;

pub use buffer::{BlendMode, Raster};
pub use error::{RasterError, RasterResult};
pub use mask::RegionMask;

/// Raster crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
