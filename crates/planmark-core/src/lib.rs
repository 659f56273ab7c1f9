//! Planmark Core Library
//!
//! Viewport transform and annotation capture for floor-plan markup: a pan/zoom
//! view over a background image that never drifts off-screen, and freehand
//! strokes recorded in image space so they stay attached to the plan at any
//! zoom level.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod input;
pub mod notes;
pub mod strokes;
pub mod view;
pub mod viewport;

pub use color::{ParseColorError, PenColor};
pub use config::{EngineConfig, StrokeConfig, ViewportConfig, ZoomStep};
pub use engine::{CanvasEngine, Frame, ImageAsset};
pub use error::{ConfigError, EngineError, EngineResult};
pub use gesture::{GestureOutcome, GestureRouter, GestureState, Mode};
pub use input::PointerEvent;
pub use notes::Note;
pub use strokes::{Stroke, StrokeId, StrokeRecorder};
pub use view::{View, to_image_space, to_screen_space};
pub use viewport::ViewportController;
