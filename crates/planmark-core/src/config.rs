//! Engine configuration.

use crate::color::PenColor;
use crate::error::ConfigError;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Default zoom-in multiplier.
pub const DEFAULT_ZOOM_IN_FACTOR: f64 = 1.2;
/// Default zoom-out multiplier.
pub const DEFAULT_ZOOM_OUT_FACTOR: f64 = 0.8;
/// Default fraction of the remaining distance covered per pan step.
pub const DEFAULT_PAN_SMOOTHING: f64 = 0.7;
/// Pan deltas below this (image-space pixels, both axes) are treated as tremor.
pub const DEFAULT_PAN_THRESHOLD: f64 = 2.0;

/// How a single zoom-in/zoom-out press changes the scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ZoomStep {
    /// Multiply the scale (`zoom_in > 1`, `0 < zoom_out < 1`).
    Factor { zoom_in: f64, zoom_out: f64 },
    /// Add or subtract a fixed amount.
    Additive { step: f64 },
}

impl Default for ZoomStep {
    fn default() -> Self {
        ZoomStep::Factor {
            zoom_in: DEFAULT_ZOOM_IN_FACTOR,
            zoom_out: DEFAULT_ZOOM_OUT_FACTOR,
        }
    }
}

impl ZoomStep {
    /// Scale after one zoom-in press (unclamped).
    pub fn zoom_in(&self, scale: f64) -> f64 {
        match *self {
            ZoomStep::Factor { zoom_in, .. } => scale * zoom_in,
            ZoomStep::Additive { step } => scale + step,
        }
    }

    /// Scale after one zoom-out press (unclamped).
    pub fn zoom_out(&self, scale: f64) -> f64 {
        match *self {
            ZoomStep::Factor { zoom_out, .. } => scale * zoom_out,
            ZoomStep::Additive { step } => scale - step,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ZoomStep::Factor { zoom_in, zoom_out } => {
                if !(zoom_in.is_finite() && zoom_in > 1.0) {
                    return Err(ConfigError::InvalidZoomStep(format!(
                        "zoom-in factor must be > 1, got {zoom_in}"
                    )));
                }
                if !(zoom_out.is_finite() && zoom_out > 0.0 && zoom_out < 1.0) {
                    return Err(ConfigError::InvalidZoomStep(format!(
                        "zoom-out factor must be in (0, 1), got {zoom_out}"
                    )));
                }
            }
            ZoomStep::Additive { step } => {
                if !(step.is_finite() && step > 0.0) {
                    return Err(ConfigError::InvalidZoomStep(format!(
                        "additive step must be > 0, got {step}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Pan and zoom behavior of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Zoom step applied by the zoom buttons.
    pub zoom_step: ZoomStep,
    /// Interpolation factor toward the pan target (1.0 = no smoothing).
    pub pan_smoothing: f64,
    /// Minimum image-space delta that moves the view.
    pub pan_threshold: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 3.0,
            zoom_step: ZoomStep::default(),
            pan_smoothing: DEFAULT_PAN_SMOOTHING,
            pan_threshold: DEFAULT_PAN_THRESHOLD,
        }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidZoomLimits { min, max });
        }
        self.zoom_step.validate()?;
        if !(self.pan_smoothing.is_finite() && self.pan_smoothing > 0.0 && self.pan_smoothing <= 1.0) {
            return Err(ConfigError::InvalidPanSmoothing(self.pan_smoothing));
        }
        if !(self.pan_threshold.is_finite() && self.pan_threshold >= 0.0) {
            return Err(ConfigError::InvalidPanThreshold(self.pan_threshold));
        }
        Ok(())
    }
}

/// Stroke capture settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Stroke width in image-space pixels.
    pub width: f64,
    /// Keep single-point strokes (taps) as dots instead of discarding them.
    pub keep_dots: bool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            width: 2.0,
            keep_dots: true,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the on-screen viewport in screen pixels.
    pub viewport_size: Size,
    pub viewport: ViewportConfig,
    pub strokes: StrokeConfig,
    /// Pen color used until the host picks another one.
    pub pen_color: PenColor,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_size: Size::new(800.0, 600.0),
            viewport: ViewportConfig::default(),
            strokes: StrokeConfig::default(),
            pen_color: PenColor::default(),
        }
    }
}

impl EngineConfig {
    /// Create a default configuration for the given viewport size.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport_size: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Check every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_viewport_size(self.viewport_size)?;
        self.viewport.validate()?;
        let width = self.strokes.width;
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidStrokeWidth(width));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub(crate) fn validate_viewport_size(size: Size) -> Result<(), ConfigError> {
    if size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidViewport {
            width: size.width,
            height: size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zoom_step_factor() {
        let step = ZoomStep::default();
        assert!((step.zoom_in(1.0) - 1.2).abs() < f64::EPSILON);
        assert!((step.zoom_out(1.0) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_step_additive() {
        let step = ZoomStep::Additive { step: 0.5 };
        assert!((step.zoom_in(1.0) - 1.5).abs() < f64::EPSILON);
        assert!((step.zoom_out(2.0) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = EngineConfig::with_viewport(0.0, 600.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidViewport { .. })));

        config = EngineConfig::default();
        config.viewport.min_scale = 4.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidZoomLimits { .. })));

        config = EngineConfig::default();
        config.viewport.zoom_step = ZoomStep::Factor { zoom_in: 0.9, zoom_out: 0.8 };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidZoomStep(_))));

        config = EngineConfig::default();
        config.viewport.pan_smoothing = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPanSmoothing(_))));

        config = EngineConfig::default();
        config.strokes.width = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStrokeWidth(_))));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EngineConfig::from_json(
            r#"{
                "viewport_size": { "width": 1000.0, "height": 800.0 },
                "viewport": { "zoom_step": { "kind": "additive", "step": 0.5 } },
                "pen_color": "red"
            }"#,
        )
        .unwrap();
        assert!((config.viewport_size.width - 1000.0).abs() < f64::EPSILON);
        assert_eq!(config.viewport.zoom_step, ZoomStep::Additive { step: 0.5 });
        assert!((config.viewport.max_scale - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.pen_color, PenColor::RED);
        assert!(config.strokes.keep_dots);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = EngineConfig::from_json(r#"{ "viewport": { "max_scale": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoomLimits { .. }));
        assert!(matches!(EngineConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}
