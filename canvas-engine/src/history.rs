//! Undo/redo history of whole-layer snapshots.
//!
//! Layers are replaced wholesale on every mutation and shared behind
//! `Arc`, so a snapshot is two reference clones and exact restore is free.

use std::sync::Arc;

use canvas_raster::Raster;

/// Maximum retained snapshots per stack; pushing past it drops the oldest.
pub const HISTORY_CAP: usize = 50;

/// A paired snapshot of the fill and ink layers.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Fill layer at snapshot time.
    pub fill: Arc<Raster>,
    /// Ink layer at snapshot time.
    pub ink: Arc<Raster>,
}

/// Bounded undo/redo stacks of layer snapshots.
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    /// Create empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-operation state. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.undo.len() == HISTORY_CAP {
            self.undo.remove(0);
        }
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Pop the last undo snapshot, moving `current` onto the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.undo.pop()?;
        if self.redo.len() == HISTORY_CAP {
            self.redo.remove(0);
        }
        self.redo.push(current);
        Some(restored)
    }

    /// Pop the last redo snapshot, moving `current` back onto the undo
    /// stack without clearing redo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.redo.pop()?;
        if self.undo.len() == HISTORY_CAP {
            self.undo.remove(0);
        }
        self.undo.push(current);
        Some(restored)
    }

    /// Whether an undo snapshot is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo snapshot is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Current undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Current redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
