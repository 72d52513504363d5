//! # Canvas
//!
//! A raster surface paired with its stroke history. This is the contract the input layer drives:
//! begin a stroke, draw into the surface while it's active, end it (recording exactly one snapshot),
//! or cancel it. Undo, redo, and clear repaint the surface themselves, so after any call returns
//! the surface shows the top of the undo stack, or the blank state if there is none.
//!
//! History operations are refused while a stroke is in progress - the surface would hold
//! a half-drawn stroke that no snapshot describes.

use std::sync::Arc;

use crate::{
    history::{Capacity, HistoryError, HistoryManager, Restore},
    raster::{DimensionMismatch, Dimensions, RasterSurface, ResizableSurface},
};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasError {
    #[error("a stroke is in progress")]
    StrokeInProgress,
    #[error("no stroke is in progress")]
    NoActiveStroke,
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("surface refused the snapshot: {0}")]
    Surface(#[from] DimensionMismatch),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Active,
}

/// Which history controls should be enabled.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Availability {
    pub can_undo: bool,
    pub can_redo: bool,
}

pub struct Canvas<Surface: RasterSurface> {
    surface: Surface,
    history: HistoryManager,
    stroke: StrokeState,
}
impl<Surface: RasterSurface> Canvas<Surface> {
    /// Take ownership of a surface, blanking it. History starts empty.
    pub fn new(mut surface: Surface, capacity: Capacity) -> Self {
        surface.reset_to_empty();
        let history = HistoryManager::new(surface.dimensions(), capacity);
        Self {
            surface,
            history,
            stroke: StrokeState::Idle,
        }
    }
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
    #[must_use]
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }
    #[must_use]
    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.stroke == StrokeState::Active
    }
    #[must_use]
    pub fn availability(&self) -> Availability {
        Availability {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
    pub fn set_capacity(&mut self, capacity: Capacity) {
        self.history.set_capacity(capacity);
    }
    /// Start a new stroke. The surface becomes writable through [`Self::stroke_surface`].
    pub fn begin_stroke(&mut self) -> Result<(), CanvasError> {
        if self.is_drawing() {
            return Err(CanvasError::StrokeInProgress);
        }
        self.stroke = StrokeState::Active;
        Ok(())
    }
    /// Mutable access to the surface, only while a stroke is active.
    pub fn stroke_surface(&mut self) -> Result<&mut Surface, CanvasError> {
        if self.is_drawing() {
            Ok(&mut self.surface)
        } else {
            Err(CanvasError::NoActiveStroke)
        }
    }
    /// Finish the active stroke, recording a single snapshot of the surface as it is now.
    ///
    /// If the history rejects the snapshot, the stroke is rolled back off the surface.
    pub fn end_stroke(&mut self) -> Result<(), CanvasError> {
        if !self.is_drawing() {
            return Err(CanvasError::NoActiveStroke);
        }
        self.stroke = StrokeState::Idle;
        let snapshot = self.surface.capture_snapshot();
        if let Err(e) = self.history.record_stroke(snapshot) {
            self.repaint()?;
            return Err(e.into());
        }
        Ok(())
    }
    /// Abandon the active stroke without recording it. The surface goes back to the last
    /// recorded state. Returns `false` if there was no stroke to cancel.
    pub fn cancel_stroke(&mut self) -> Result<bool, CanvasError> {
        if !self.is_drawing() {
            return Ok(false);
        }
        log::debug!("Stroke cancelled");
        self.stroke = StrokeState::Idle;
        self.repaint()?;
        Ok(true)
    }
    /// Undo the last stroke and repaint. `Ok(false)` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, CanvasError> {
        self.ensure_idle()?;
        match self.history.undo() {
            None => Ok(false),
            Some(restore) => {
                Self::paint(&mut self.surface, restore)?;
                Ok(true)
            }
        }
    }
    /// Redo the last undone stroke and repaint. `Ok(false)` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, CanvasError> {
        self.ensure_idle()?;
        match self.history.redo() {
            None => Ok(false),
            Some(snapshot) => {
                self.surface.restore_snapshot(snapshot)?;
                Ok(true)
            }
        }
    }
    /// Blank the surface and forget all history. Can't be undone.
    pub fn clear(&mut self) -> Result<(), CanvasError> {
        self.ensure_idle()?;
        self.history.clear();
        self.surface.reset_to_empty();
        Ok(())
    }
    /// Break the canvas back into its pieces.
    pub fn into_parts(self) -> (Surface, HistoryManager) {
        (self.surface, self.history)
    }
    fn ensure_idle(&self) -> Result<(), CanvasError> {
        if self.is_drawing() {
            Err(CanvasError::StrokeInProgress)
        } else {
            Ok(())
        }
    }
    // Bring the surface back in line with the history.
    fn repaint(&mut self) -> Result<(), DimensionMismatch> {
        Self::paint(&mut self.surface, self.history.current())
    }
    fn paint(surface: &mut Surface, restore: Restore<'_>) -> Result<(), DimensionMismatch> {
        match restore {
            Restore::Snapshot(snapshot) => surface.restore_snapshot(snapshot),
            Restore::Empty => {
                surface.reset_to_empty();
                Ok(())
            }
        }
    }
}
impl<Surface: ResizableSurface> Canvas<Surface> {
    /// Change the size of the surface. All history is lost, as none of it fits anymore.
    pub fn resize(&mut self, dimensions: Dimensions) -> Result<(), CanvasError> {
        self.ensure_idle()?;
        log::info!(
            "Resizing canvas {} -> {dimensions}, history discarded",
            self.surface.dimensions()
        );
        self.surface.resize(dimensions);
        self.surface.reset_to_empty();
        self.history.reset_dimensions(dimensions);
        Ok(())
    }
}

/// A canvas shareable between threads. Every access holds one lock over the surface and
/// the history together, so no thread can observe one updated without the other.
pub struct SharedCanvas<Surface: RasterSurface> {
    inner: Arc<parking_lot::Mutex<Canvas<Surface>>>,
}
impl<Surface: RasterSurface> Clone for SharedCanvas<Surface> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
impl<Surface: RasterSurface> SharedCanvas<Surface> {
    pub fn new(canvas: Canvas<Surface>) -> Self {
        Self {
            inner: Arc::new(canvas.into()),
        }
    }
    /// Lock the canvas for the span of the closure.
    pub fn write_with<F, T>(&self, write: F) -> T
    where
        F: FnOnce(&mut Canvas<Surface>) -> T,
    {
        let mut lock = self.inner.lock();
        write(&mut lock)
    }
    #[must_use]
    pub fn availability(&self) -> Availability {
        self.inner.lock().availability()
    }
    pub fn undo(&self) -> Result<bool, CanvasError> {
        self.write_with(Canvas::undo)
    }
    pub fn redo(&self) -> Result<bool, CanvasError> {
        self.write_with(Canvas::redo)
    }
    pub fn clear(&self) -> Result<(), CanvasError> {
        self.write_with(Canvas::clear)
    }
}
impl<Surface: RasterSurface> From<Canvas<Surface>> for SharedCanvas<Surface> {
    fn from(value: Canvas<Surface>) -> Self {
        Self::new(value)
    }
}
