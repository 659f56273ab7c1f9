//! Error types for engine construction and configuration.
//!
//! Gesture handling and the control surface never fail; only setting the
//! engine up (or pointing it at an image that does not exist) can.

use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Viewport size must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("Image '{name}' has invalid extent {width}x{height}")]
    InvalidImageExtent { name: String, width: f64, height: f64 },
    #[error("Image extent must be finite and positive, got {width}x{height}")]
    InvalidExtent { width: f64, height: f64 },
    #[error("Zoom limits must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidZoomLimits { min: f64, max: f64 },
    #[error("Invalid zoom step: {0}")]
    InvalidZoomStep(String),
    #[error("Pan smoothing must be in (0, 1], got {0}")]
    InvalidPanSmoothing(f64),
    #[error("Pan threshold must be finite and non-negative, got {0}")]
    InvalidPanThreshold(f64),
    #[error("Stroke width must be finite and positive, got {0}")]
    InvalidStrokeWidth(f64),
    #[error("At least one background image is required")]
    NoImages,
    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Image index {index} out of range ({count} images)")]
    ImageIndexOutOfRange { index: usize, count: usize },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
