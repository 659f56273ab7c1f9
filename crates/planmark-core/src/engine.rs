//! Canvas engine: composes viewport, strokes and gesture routing behind one
//! command surface.
//!
//! Hosts feed pointer events in through [`CanvasEngine::handle_pointer`] and
//! wire their buttons to [`CanvasEngine::zoom_in`], [`CanvasEngine::zoom_out`],
//! [`CanvasEngine::undo`] and [`CanvasEngine::clear_annotations`]. Every state
//! change bumps [`CanvasEngine::revision`]; a host redraws from
//! [`CanvasEngine::frame`] whenever the revision moves.

use crate::color::PenColor;
use crate::config::{EngineConfig, validate_viewport_size};
use crate::error::{ConfigError, EngineError, EngineResult};
use crate::gesture::{GestureOutcome, GestureRouter, GestureState, Mode};
use crate::input::PointerEvent;
use crate::notes::Note;
use crate::strokes::{Stroke, StrokeRecorder};
use crate::view::View;
use crate::viewport::ViewportController;
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// A background image the engine can display. Only its pixel extent matters here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub name: String,
    pub extent: Size,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            extent: Size::new(width, height),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let Size { width, height } = self.extent;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidImageExtent {
                name: self.name.clone(),
                width,
                height,
            })
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub revision: u64,
    pub view: View,
    pub viewport_size: Size,
    pub image_index: usize,
    pub image: &'a ImageAsset,
    /// Committed strokes, oldest first (image space).
    pub strokes: &'a [Stroke],
    /// Stroke being drawn, if any (image space).
    pub current_stroke: Option<&'a Stroke>,
    pub notes: &'a [Note],
}

impl Frame<'_> {
    /// Image-to-screen transform.
    pub fn transform(&self) -> Affine {
        self.view.transform()
    }

    /// Where the background image lands on screen.
    pub fn image_screen_rect(&self) -> Rect {
        let image_rect = Rect::from_origin_size(Point::ZERO, self.image.extent);
        self.transform().transform_rect_bbox(image_rect)
    }

    /// Committed strokes followed by the in-progress one.
    pub fn all_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.current_stroke)
    }
}

/// The floor-plan annotation canvas.
#[derive(Debug, Clone)]
pub struct CanvasEngine {
    config: EngineConfig,
    images: Vec<ImageAsset>,
    active_image: usize,
    mode: Mode,
    pen_color: PenColor,
    viewport: ViewportController,
    strokes: StrokeRecorder,
    notes: Vec<Note>,
    router: GestureRouter,
    revision: u64,
}

impl CanvasEngine {
    /// Create an engine showing the first image.
    pub fn new(config: EngineConfig, images: Vec<ImageAsset>) -> EngineResult<Self> {
        config.validate()?;
        let first = images.first().ok_or(ConfigError::NoImages)?;
        for image in &images {
            image.validate()?;
        }

        let viewport = ViewportController::new(config.viewport, config.viewport_size, first.extent)?;
        let strokes = StrokeRecorder::new(config.strokes.width, config.strokes.keep_dots);
        log::debug!("Canvas engine created with {} image(s), showing '{}'", images.len(), first.name);

        Ok(Self {
            pen_color: config.pen_color,
            config,
            images,
            active_image: 0,
            mode: Mode::default(),
            viewport,
            strokes,
            notes: Vec::new(),
            router: GestureRouter::new(),
            revision: 0,
        })
    }

    // --- Control surface -------------------------------------------------

    pub fn zoom_in(&mut self) {
        if self.viewport.zoom_in() {
            self.mark_changed();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.viewport.zoom_out() {
            self.mark_changed();
        }
    }

    /// Remove the most recent committed stroke.
    pub fn undo(&mut self) {
        if let Some(stroke) = self.strokes.undo() {
            log::debug!("Undo stroke {}", stroke.id());
            self.mark_changed();
        }
    }

    /// Remove all strokes (including one in progress) and notes.
    pub fn clear_annotations(&mut self) {
        let had_strokes = self.strokes.clear();
        let had_notes = !self.notes.is_empty();
        self.notes.clear();
        if self.router.state() == GestureState::Drawing {
            self.router.reset();
        }
        if had_strokes || had_notes {
            self.mark_changed();
        }
    }

    // --- Configuration ---------------------------------------------------

    pub fn active_image_index(&self) -> usize {
        self.active_image
    }

    pub fn active_image(&self) -> &ImageAsset {
        &self.images[self.active_image]
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// Display another image, resetting the view and dropping all annotations.
    pub fn set_active_image(&mut self, index: usize) -> EngineResult<()> {
        let count = self.images.len();
        if index >= count {
            return Err(EngineError::ImageIndexOutOfRange { index, count });
        }
        if index == self.active_image {
            return Ok(());
        }
        self.active_image = index;
        self.router.reset();
        self.strokes.clear();
        self.notes.clear();
        let image = &self.images[index];
        self.viewport.reset_for_image(image.extent);
        log::debug!("Switched to image {} '{}'", index, image.name);
        self.mark_changed();
        Ok(())
    }

    /// Advance to the next image, wrapping around.
    pub fn next_image(&mut self) {
        let next = (self.active_image + 1) % self.images.len();
        self.switch_to(next);
    }

    /// Go back to the previous image, wrapping around.
    pub fn previous_image(&mut self) {
        let count = self.images.len();
        let previous = (self.active_image + count - 1) % count;
        self.switch_to(previous);
    }

    fn switch_to(&mut self, index: usize) {
        if let Err(e) = self.set_active_image(index) {
            // Indices here are always computed modulo the image count.
            log::warn!("Image switch failed: {}", e);
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Takes effect at the next pointer-down.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn pen_color(&self) -> PenColor {
        self.pen_color
    }

    /// Color for strokes started from now on.
    pub fn set_pen_color(&mut self, color: PenColor) {
        self.pen_color = color;
    }

    /// Resize the viewport. Invalid sizes are ignored.
    pub fn set_viewport_size(&mut self, size: Size) {
        if let Err(e) = validate_viewport_size(size) {
            log::warn!("{}", e);
            return;
        }
        self.config.viewport_size = size;
        if self.viewport.set_viewport_size(size) {
            self.mark_changed();
        }
    }

    // --- Input -----------------------------------------------------------

    /// Route a pointer event through the gesture state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> GestureOutcome {
        let outcome = self.router.handle(
            event,
            self.mode,
            self.pen_color,
            &mut self.viewport,
            &mut self.strokes,
        );
        if outcome.needs_redraw() {
            self.mark_changed();
        }
        outcome
    }

    /// Pin a text note at a screen position. Returns false if the position is
    /// off the image or the text is blank.
    pub fn add_note(&mut self, screen_point: Point, text: &str) -> bool {
        let position = self.viewport.view().to_image_space(screen_point);
        if !self.viewport.contains_image_point(position) {
            log::debug!("Note at {:?} is outside the image", screen_point);
            return false;
        }
        match Note::new(position, text) {
            Some(note) => {
                self.notes.push(note);
                self.mark_changed();
                true
            }
            None => false,
        }
    }

    // --- State -----------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn view(&self) -> View {
        self.viewport.view()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    /// Committed strokes for the current image, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        self.strokes.committed()
    }

    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.strokes.current()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn gesture_state(&self) -> GestureState {
        self.router.state()
    }

    /// Counter bumped on every visible state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of everything a renderer needs.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            revision: self.revision,
            view: self.viewport.view(),
            viewport_size: self.viewport.viewport_size(),
            image_index: self.active_image,
            image: self.active_image(),
            strokes: self.strokes.committed(),
            current_stroke: self.strokes.current(),
            notes: &self.notes,
        }
    }

    fn mark_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
