//! Error types for engine operations.
//!
//! Public mutators keep the silent no-op contract of an interactive drawing
//! surface; the `try_*` variants surface these values so tests and embedders
//! can tell a no-op from an error.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in canvas engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation needs layers but the canvas size was never set.
    #[error("Canvas not initialized")]
    NotInitialized,

    /// A stroke had fewer than two points.
    #[error("Stroke needs at least 2 points, got {0}")]
    DegenerateStroke(usize),

    /// The flood-fill seed landed on a boundary pixel.
    #[error("Fill seed at ({x}, {y}) is a boundary pixel")]
    SeedOnBoundary {
        /// Seed x in boundary-bitmap pixels.
        x: u32,
        /// Seed y in boundary-bitmap pixels.
        y: u32,
    },

    /// Raster buffer failure.
    #[error("Raster error: {0}")]
    Raster(#[from] canvas_raster::RasterError),

    /// Config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
