//! Planmark Render Library
//!
//! Renderer abstraction for Planmark frames. Two implementations ship here:
//! a backend-neutral [`DisplayList`] for hosts that drive their own graphics
//! stack, and an [`SvgRenderer`] that writes the frame as an SVG document.

mod display_list;
mod renderer;
mod svg;

pub use display_list::{DisplayList, DrawCommand};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
