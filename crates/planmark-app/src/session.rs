//! Session files: engine config, background images and a scripted sequence
//! of pointer events and toolbar commands.

use crate::error::{AppError, AppResult};
use kurbo::Point;
use planmark_core::{EngineConfig, ImageAsset, Mode, PenColor, PointerEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A background image, either with its extent spelled out or read from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSpec {
    Sized {
        name: String,
        width: f64,
        height: f64,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        name: Option<String>,
    },
}

/// An image ready for the engine, plus the href to use when rendering it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub asset: ImageAsset,
    pub href: Option<String>,
}

impl ImageSpec {
    /// Produce an [`ImageAsset`], probing file headers for the pixel extent.
    /// Relative paths are resolved against `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> AppResult<ResolvedImage> {
        match self {
            ImageSpec::Sized { name, width, height } => Ok(ResolvedImage {
                asset: ImageAsset::new(name.clone(), *width, *height),
                href: None,
            }),
            ImageSpec::File { path, name } => {
                let full = base_dir.join(path);
                let (width, height) = image::image_dimensions(&full).map_err(|source| AppError::Image {
                    path: full.clone(),
                    source,
                })?;
                let name = name.clone().unwrap_or_else(|| {
                    path.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                });
                log::debug!("Image '{}' is {}x{} ({})", name, width, height, full.display());
                Ok(ResolvedImage {
                    asset: ImageAsset::new(name, f64::from(width), f64::from(height)),
                    href: Some(path.display().to_string()),
                })
            }
        }
    }
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Pointer(PointerEvent),
    SetMode(Mode),
    SetPenColor(PenColor),
    SelectImage(usize),
    NextImage,
    PreviousImage,
    ZoomIn,
    ZoomOut,
    Undo,
    ClearAnnotations,
    Note { x: f64, y: f64, text: String },
    Resize { width: f64, height: f64 },
}

impl Step {
    /// Convenience for building pointer steps.
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Step::Pointer(PointerEvent::down(Point::new(x, y), 0))
    }
}

/// A replayable session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub config: EngineConfig,
    pub images: Vec<ImageSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Device pixel ratio used for the rendered output.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Session {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
