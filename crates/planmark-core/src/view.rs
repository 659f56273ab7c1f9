//! View transform and screen/image coordinate mapping.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Affine view from image space to screen space: `screen = image * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Uniform scale factor (always > 0).
    pub scale: f64,
    /// Screen-space position of the image origin.
    pub translate: Vec2,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl View {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Get the affine transform for rendering (image to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling (screen to image).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.translate)
    }

    /// Convert a screen point to image coordinates.
    pub fn to_image_space(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.translate.x) / self.scale,
            (screen_point.y - self.translate.y) / self.scale,
        )
    }

    /// Convert an image point to screen coordinates.
    pub fn to_screen_space(&self, image_point: Point) -> Point {
        Point::new(
            image_point.x * self.scale + self.translate.x,
            image_point.y * self.scale + self.translate.y,
        )
    }

    /// Convert a screen-space movement to its image-space magnitude.
    pub fn delta_to_image_space(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Whether the view can be used for mapping: finite values and a positive scale.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.translate.x.is_finite()
            && self.translate.y.is_finite()
    }
}

/// Convert a screen point to image space under `view`.
pub fn to_image_space(screen_point: Point, view: &View) -> Point {
    view.to_image_space(screen_point)
}

/// Convert an image point to screen space under `view`.
pub fn to_screen_space(image_point: Point, view: &View) -> Point {
    view.to_screen_space(image_point)
}
