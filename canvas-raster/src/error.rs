//! Error types for raster buffer operations.

use thiserror::Error;

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur in raster buffer operations.
#[derive(Debug, Error)]
pub enum RasterError {
    /// A buffer was requested with a zero dimension.
    #[error("Invalid buffer dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Two buffers that must match in size do not.
    #[error("Buffer dimensions differ: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        /// Dimensions of the destination buffer.
        expected: (u32, u32),
        /// Dimensions of the source buffer.
        actual: (u32, u32),
    },
}
