//! Application errors.

use planmark_core::EngineError;
use planmark_render::RendererError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid session file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read image {}: {}", .path.display(), .source)]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: EngineError,
    },
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Result type for the replay tool.
pub type AppResult<T> = Result<T, AppError>;
