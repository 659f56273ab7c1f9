//! Drive a [`CanvasEngine`] through a scripted session.

use crate::error::{AppError, AppResult};
use crate::session::{Session, Step};
use kurbo::{Point, Size, Vec2};
use planmark_core::{CanvasEngine, GestureOutcome};
use planmark_render::{RenderContext, SvgRenderer};
use std::path::Path;

/// Summary of the engine state after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    pub image_index: usize,
    pub image_name: String,
    pub strokes: usize,
    pub notes: usize,
    pub scale: f64,
    pub translate: Vec2,
    pub revision: u64,
}

/// An engine plus the rendering details of a loaded session.
pub struct Replay {
    engine: CanvasEngine,
    hrefs: Vec<Option<String>>,
    scale_factor: f64,
}

impl Replay {
    /// Build the engine for `session`, resolving image files against `base_dir`.
    pub fn new(session: &Session, base_dir: &Path) -> AppResult<Self> {
        let mut assets = Vec::with_capacity(session.images.len());
        let mut hrefs = Vec::with_capacity(session.images.len());
        for spec in &session.images {
            let resolved = spec.resolve(base_dir)?;
            assets.push(resolved.asset);
            hrefs.push(resolved.href);
        }
        let engine = CanvasEngine::new(session.config.clone(), assets)?;
        Ok(Self {
            engine,
            hrefs,
            scale_factor: session.scale_factor,
        })
    }

    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    /// Apply one step.
    pub fn apply(&mut self, step: &Step) -> AppResult<()> {
        let engine = &mut self.engine;
        match step {
            Step::Pointer(event) => {
                let outcome = engine.handle_pointer(*event);
                if outcome == GestureOutcome::StrokeAborted {
                    log::info!("Stroke left the image at {:?} and was discarded", event.position());
                }
            }
            Step::SetMode(mode) => engine.set_mode(*mode),
            Step::SetPenColor(color) => engine.set_pen_color(*color),
            Step::SelectImage(index) => engine.set_active_image(*index)?,
            Step::NextImage => engine.next_image(),
            Step::PreviousImage => engine.previous_image(),
            Step::ZoomIn => engine.zoom_in(),
            Step::ZoomOut => engine.zoom_out(),
            Step::Undo => engine.undo(),
            Step::ClearAnnotations => engine.clear_annotations(),
            Step::Note { x, y, text } => {
                if !engine.add_note(Point::new(*x, *y), text) {
                    log::warn!("Note '{}' at ({}, {}) was not placed", text, x, y);
                }
            }
            Step::Resize { width, height } => engine.set_viewport_size(Size::new(*width, *height)),
        }
        Ok(())
    }

    /// Apply every step in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[Step]) -> AppResult<ReplayReport> {
        for (index, step) in steps.iter().enumerate() {
            self.apply(step).map_err(|e| match e {
                AppError::Engine(source) => AppError::Step { index, source },
                other => other,
            })?;
        }
        Ok(self.report(steps.len()))
    }

    pub fn report(&self, steps: usize) -> ReplayReport {
        let engine = &self.engine;
        let view = engine.view();
        ReplayReport {
            steps,
            image_index: engine.active_image_index(),
            image_name: engine.active_image().name.clone(),
            strokes: engine.strokes().len(),
            notes: engine.notes().len(),
            scale: view.scale,
            translate: view.translate,
            revision: engine.revision(),
        }
    }

    /// Render the current frame as SVG.
    pub fn render_svg(&self) -> AppResult<String> {
        let mut renderer = SvgRenderer::new();
        for (index, href) in self.hrefs.iter().enumerate() {
            if let Some(href) = href {
                renderer.set_image_href(index, href.clone());
            }
        }
        let ctx = RenderContext::new(self.engine.frame()).with_scale_factor(self.scale_factor);
        Ok(renderer.render_to_string(&ctx)?)
    }
}
