//! The canvas engine: layer ownership, operation orchestration, history.
//!
//! Public mutators are silent no-ops on degenerate input (an interactive
//! surface answers a bad gesture with "nothing happened"); each wraps a
//! `try_*` method that reports the reason, so embedders and tests can
//! distinguish a no-op from an error.
//!
//! Logical coordinates map 1:1 onto layer pixels; layers are allocated at
//! the rounded canvas size on the first `set_canvas_size` call and keep
//! those dimensions for the engine's lifetime.

use std::sync::Arc;

use canvas_raster::{BlendMode, Raster};

use crate::boundary;
use crate::config::{CanvasConfig, CanvasSize, Point};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{self, Rect};
use crate::history::{History, Snapshot};
use crate::pattern;
use crate::stroke;

/// Opacity at which fills stamp the stroke color.
const FILL_OPACITY: f32 = 0.8;

/// Template boundary placement: inset from the aspect-fitted rect.
const TEMPLATE_INSET: f32 = 24.0;

/// Template boundary placement: draw opacity, kept strong for detection.
const TEMPLATE_OPACITY: f32 = 0.55;

#[derive(Debug, Clone)]
struct Layers {
    ink: Arc<Raster>,
    fill: Arc<Raster>,
}

/// A layered raster canvas with stroke, fill, and history operations.
///
/// One instance per document; operations run synchronously on the calling
/// thread.
#[derive(Debug, Default)]
pub struct CanvasEngine {
    /// Configuration snapshot read by each operation; the caller mutates
    /// it between calls.
    pub config: CanvasConfig,
    layers: Option<Layers>,
    template_boundary: Option<Arc<Raster>>,
    history: History,
}

impl CanvasEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Whether layers have been allocated.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.layers.is_some()
    }

    /// The current ink layer, if initialized.
    #[must_use]
    pub fn ink_layer(&self) -> Option<&Raster> {
        self.layers.as_ref().map(|l| l.ink.as_ref())
    }

    /// The current fill layer, if initialized.
    #[must_use]
    pub fn fill_layer(&self) -> Option<&Raster> {
        self.layers.as_ref().map(|l| l.fill.as_ref())
    }

    /// The derived template boundary layer, if any.
    #[must_use]
    pub fn template_boundary_layer(&self) -> Option<&Raster> {
        self.template_boundary.as_deref()
    }

    /// Whether an undo snapshot is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo snapshot is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Current undo stack depth.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Current redo stack depth.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Allocate blank layers at the given size. Silent no-op variant of
    /// [`Self::try_set_canvas_size`].
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if let Err(err) = self.try_set_canvas_size(size) {
            tracing::debug!("set_canvas_size ignored: {err}");
        }
    }

    /// Allocate blank layers at the given size.
    ///
    /// The first call moves the engine to its ready state; later calls are
    /// no-ops — resizing after first use is unsupported by design.
    ///
    /// # Errors
    ///
    /// Returns an error if the size rounds below one pixel.
    pub fn try_set_canvas_size(&mut self, size: CanvasSize) -> EngineResult<()> {
        if self.layers.is_some() {
            tracing::debug!("canvas already initialized; resize unsupported");
            return Ok(());
        }
        let (w, h) = size.pixel_dimensions();
        let ink = Raster::transparent(w, h)?;
        let fill = Raster::transparent(w, h)?;
        self.layers = Some(Layers {
            ink: Arc::new(ink),
            fill: Arc::new(fill),
        });
        tracing::info!("canvas initialized at {w}x{h}");
        Ok(())
    }

    /// Derive the flood-fill boundary layer from a reference template.
    /// Silent no-op variant of [`Self::try_set_template_boundary`].
    pub fn set_template_boundary(&mut self, template: Option<&Raster>, size: CanvasSize) {
        if let Err(err) = self.try_set_template_boundary(template, size) {
            tracing::debug!("set_template_boundary ignored: {err}");
        }
    }

    /// Derive the flood-fill boundary layer from a reference template.
    ///
    /// The template is aspect-fitted into the canvas rect inset by 24
    /// logical units and drawn at 0.55 opacity over a transparent base.
    /// Passing `None`, or disabling `boundary_includes_template`, clears
    /// the stored boundary layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas size rounds below one pixel.
    pub fn try_set_template_boundary(
        &mut self,
        template: Option<&Raster>,
        size: CanvasSize,
    ) -> EngineResult<()> {
        if !self.config.boundary_includes_template {
            self.template_boundary = None;
            return Ok(());
        }
        let Some(template) = template else {
            self.template_boundary = None;
            return Ok(());
        };

        let (w, h) = size.pixel_dimensions();
        let mut layer = Raster::transparent(w, h)?;
        #[allow(clippy::cast_precision_loss)]
        let template_size = (template.width() as f32, template.height() as f32);
        let fit = geometry::aspect_fit_rect(template_size, Rect::new(0.0, 0.0, size.width, size.height))
            .inset(TEMPLATE_INSET);
        if fit.width < 1.0 || fit.height < 1.0 {
            tracing::debug!("template too small after inset; boundary cleared");
            self.template_boundary = None;
            return Ok(());
        }
        layer.draw_fitted(template, fit.x, fit.y, fit.width, fit.height, TEMPLATE_OPACITY);
        self.template_boundary = Some(Arc::new(layer));
        tracing::debug!("template boundary derived at {w}x{h}");
        Ok(())
    }

    /// Draw a conditioned stroke onto the ink layer. Silent no-op variant
    /// of [`Self::try_apply_stroke`].
    pub fn apply_stroke(&mut self, points: &[Point], size: CanvasSize) {
        if let Err(err) = self.try_apply_stroke(points, size) {
            tracing::debug!("stroke ignored: {err}");
        }
    }

    /// Draw a conditioned stroke onto the ink layer.
    ///
    /// Pushes the pre-operation snapshot, runs the conditioning passes,
    /// and replaces the ink layer with a fresh render.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegenerateStroke`] for fewer than two points
    /// (checked before any history push) and
    /// [`EngineError::NotInitialized`] before the first canvas size.
    pub fn try_apply_stroke(&mut self, points: &[Point], size: CanvasSize) -> EngineResult<()> {
        if points.len() < 2 {
            return Err(EngineError::DegenerateStroke(points.len()));
        }
        let layers = self.layers.as_ref().ok_or(EngineError::NotInitialized)?;
        let base = Arc::clone(&layers.ink);

        self.push_snapshot();

        let conditioned = geometry::condition(points, size, &self.config);
        let ink = stroke::render_stroke(&base, &conditioned, &self.config)?;
        self.replace_ink(ink);
        tracing::debug!("stroke rendered from {} points", points.len());
        Ok(())
    }

    /// Flood-fill from a seed point and stamp the configured pattern.
    /// Silent no-op variant of [`Self::try_fill_at`].
    pub fn fill_at(&mut self, seed: Point, size: CanvasSize) {
        if let Err(err) = self.try_fill_at(seed, size) {
            tracing::debug!("fill ignored: {err}");
        }
    }

    /// Flood-fill from a seed point and stamp the configured pattern,
    /// clipped to the filled region, over the fill layer.
    ///
    /// The undo snapshot is pushed before the seed is validated, so a fill
    /// that turns out to be a no-op still leaves an undo entry: undoing it
    /// changes nothing visible.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] before the first canvas
    /// size and [`EngineError::SeedOnBoundary`] when the seed lands on a
    /// boundary pixel.
    pub fn try_fill_at(&mut self, seed: Point, size: CanvasSize) -> EngineResult<()> {
        let layers = self.layers.as_ref().ok_or(EngineError::NotInitialized)?;
        let (ink, fill) = (Arc::clone(&layers.ink), Arc::clone(&layers.fill));

        self.push_snapshot();

        let bitmap = boundary::build_boundary_bitmap(
            &ink,
            self.template_boundary.as_deref(),
            self.config.boundary_includes_template,
        )?;
        let mask = boundary::flood_fill_mask(&bitmap, seed, size, self.config.gap_tolerance)?;

        let color = self.config.stroke_color.with_opacity(FILL_OPACITY);
        let new_fill = pattern::render_fill(&fill, &mask, self.config.pattern, color)?;
        self.replace_fill(new_fill);
        tracing::debug!("fill applied, region {} px", mask.coverage());
        Ok(())
    }

    /// Restore the previous snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let Some(layers) = self.layers.as_ref() else {
            return false;
        };
        let current = Snapshot {
            fill: Arc::clone(&layers.fill),
            ink: Arc::clone(&layers.ink),
        };
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                tracing::debug!("undo applied");
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(layers) = self.layers.as_ref() else {
            return false;
        };
        let current = Snapshot {
            fill: Arc::clone(&layers.fill),
            ink: Arc::clone(&layers.ink),
        };
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                tracing::debug!("redo applied");
                true
            }
            None => false,
        }
    }

    /// Reset both layers to blank. Silent no-op variant of
    /// [`Self::try_clear_all`].
    pub fn clear_all(&mut self, size: CanvasSize) {
        if let Err(err) = self.try_clear_all(size) {
            tracing::debug!("clear ignored: {err}");
        }
    }

    /// Push an undo snapshot and reset both layers to blank.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] before the first canvas
    /// size, or an allocation error if the size rounds below one pixel.
    pub fn try_clear_all(&mut self, size: CanvasSize) -> EngineResult<()> {
        if self.layers.is_none() {
            return Err(EngineError::NotInitialized);
        }
        let (w, h) = size.pixel_dimensions();
        let ink = Raster::transparent(w, h)?;
        let fill = Raster::transparent(w, h)?;

        self.push_snapshot();
        self.layers = Some(Layers {
            ink: Arc::new(ink),
            fill: Arc::new(fill),
        });
        tracing::debug!("canvas cleared");
        Ok(())
    }

    /// Flatten fill under ink over a transparent background at the ink
    /// layer's native size. `None` before initialization.
    #[must_use]
    pub fn rendered_composite(&self) -> Option<Raster> {
        let layers = self.layers.as_ref()?;
        let (w, h) = layers.ink.dimensions();
        let mut out = Raster::transparent(w, h).ok()?;
        out.composite(&layers.fill, BlendMode::Normal, 1.0).ok()?;
        out.composite(&layers.ink, BlendMode::Normal, 1.0).ok()?;
        Some(out)
    }

    fn push_snapshot(&mut self) {
        if let Some(layers) = self.layers.as_ref() {
            self.history.push(Snapshot {
                fill: Arc::clone(&layers.fill),
                ink: Arc::clone(&layers.ink),
            });
        }
    }

    fn replace_ink(&mut self, ink: Raster) {
        if let Some(layers) = self.layers.as_mut() {
            layers.ink = Arc::new(ink);
        }
    }

    fn replace_fill(&mut self, fill: Raster) {
        if let Some(layers) = self.layers.as_mut() {
            layers.fill = Arc::new(fill);
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.layers = Some(Layers {
            ink: snapshot.ink,
            fill: snapshot.fill,
        });
    }
}
