//! # Input layer
//!
//! Turns pointer, key, and action events into canvas calls. A press begins a stroke, each drag
//! paints a segment straight onto the surface, and the release records the whole stroke as a
//! single history entry. Requests that the canvas refuses mid-stroke are logged and dropped,
//! the same as a greyed-out button would drop them.

use sketchpad_core::{
    canvas::{Canvas, CanvasError},
    raster::{Dimensions, PixelBuffer},
};

use crate::{
    actions::{hotkeys::KeysToActions, Action},
    brush::Brush,
    script::Event,
};

pub struct Session<'keys> {
    canvas: Canvas<PixelBuffer>,
    brush: Brush,
    keys: &'keys KeysToActions,
    /// Where the pointer was last seen during the active stroke.
    last_point: Option<[f32; 2]>,
}
impl<'keys> Session<'keys> {
    pub fn new(canvas: Canvas<PixelBuffer>, brush: Brush, keys: &'keys KeysToActions) -> Self {
        Self {
            canvas,
            brush,
            keys,
            last_point: None,
        }
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas<PixelBuffer> {
        &self.canvas
    }
    /// Handle every event in order, stopping at the first hard failure.
    pub fn replay(&mut self, events: impl IntoIterator<Item = Event>) -> anyhow::Result<()> {
        events.into_iter().try_for_each(|event| self.handle(event))
    }
    /// Handle one event. Refused requests are not errors, only failures to export or a canvas
    /// that has fallen out of step with its history are.
    pub fn handle(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Down(at) => self.press(at)?,
            Event::Move(to) => self.drag(to)?,
            Event::Up => self.release()?,
            Event::Cancel => {
                self.last_point = None;
                if !self.canvas.cancel_stroke()? {
                    log::debug!("Cancel with no stroke in progress");
                }
            }
            Event::Action(action) => self.perform(action)?,
            Event::Key(key) => match self.keys.action_of(key) {
                Some(action) => self.perform(action)?,
                None => log::debug!("Unbound hotkey {key}"),
            },
            Event::BrushWidth(width) => self.brush.width = width,
            Event::BrushColor(color) => self.brush.color = color,
            Event::Resize { width, height } => {
                let dimensions = Dimensions::new(width, height)?;
                refused(self.canvas.resize(dimensions))?;
            }
            Event::Export(path) => crate::export::write_png(self.canvas.surface(), &path)?,
        }
        log::trace!("{:?}", self.canvas.availability());
        Ok(())
    }
    /// Run an action against the canvas. Empty history is a no-op.
    pub fn perform(&mut self, action: Action) -> Result<(), CanvasError> {
        let result = match action {
            Action::Undo => self.canvas.undo(),
            Action::Redo => self.canvas.redo(),
            Action::Clear => self.canvas.clear().map(|()| true),
        };
        match refused(result)? {
            Some(false) => log::debug!("Nothing to {}", action.as_ref().to_lowercase()),
            Some(true) => log::trace!("{action:?} applied"),
            None => (),
        }
        Ok(())
    }
    fn press(&mut self, at: [f32; 2]) -> Result<(), CanvasError> {
        if refused(self.canvas.begin_stroke())?.is_none() {
            return Ok(());
        }
        self.brush.dab(self.canvas.stroke_surface()?, at);
        self.last_point = Some(at);
        Ok(())
    }
    fn drag(&mut self, to: [f32; 2]) -> Result<(), CanvasError> {
        // Hovering, nothing to paint.
        let Some(from) = self.last_point else {
            return Ok(());
        };
        self.brush.segment(self.canvas.stroke_surface()?, from, to);
        self.last_point = Some(to);
        Ok(())
    }
    fn release(&mut self) -> Result<(), CanvasError> {
        if self.last_point.take().is_none() {
            log::debug!("Release with no stroke in progress");
            return Ok(());
        }
        self.canvas.end_stroke()
    }
}

/// Swallow a mid-stroke refusal with a warning, passing everything else through.
/// `Ok(None)` if refused.
fn refused<T>(result: Result<T, CanvasError>) -> Result<Option<T>, CanvasError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CanvasError::StrokeInProgress) => {
            log::warn!("Ignoring request while a stroke is in progress");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
