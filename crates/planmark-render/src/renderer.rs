//! Renderer trait abstraction.

use kurbo::{Affine, Size};
use peniko::Color;
use planmark_core::Frame;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The engine state to draw.
    pub frame: Frame<'a>,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Color behind the image (visible when the image is smaller than the viewport).
    pub background_color: Color,
    /// Whether to draw the stroke currently being drawn.
    pub show_current_stroke: bool,
    /// Note font size in image-space pixels.
    pub note_font_size: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(frame: Frame<'a>) -> Self {
        Self {
            frame,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            show_current_stroke: true,
            note_font_size: 16.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Hide or show the in-progress stroke.
    pub fn with_current_stroke(mut self, show: bool) -> Self {
        self.show_current_stroke = show;
        self
    }

    /// Viewport size in physical pixels.
    pub fn physical_size(&self) -> Size {
        Size::new(
            self.frame.viewport_size.width * self.scale_factor,
            self.frame.viewport_size.height * self.scale_factor,
        )
    }

    /// Image space to physical pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.frame.transform()
    }

    /// Fail early on contexts no backend can draw.
    pub fn validate(&self) -> RenderResult<()> {
        let size = self.physical_size();
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(RendererError::RenderFailed(format!(
                "invalid scale factor {}",
                self.scale_factor
            )));
        }
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(RendererError::RenderFailed(format!("empty viewport {:?}", size)));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
///
/// Implementations can record commands, write documents, or drive a GPU
/// scene; the engine does not care which.
pub trait Renderer {
    /// Build the scene for a frame: background image, committed strokes in
    /// order, then the in-progress stroke, all through the frame's view.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
