//! Viewport controller: owns the view and keeps the image inside legal bounds.

use crate::config::{ViewportConfig, validate_viewport_size};
use crate::error::ConfigError;
use crate::view::View;
use kurbo::{Point, Rect, Size, Vec2};

/// Legal translate range along one axis for a scaled image.
///
/// When the scaled image overflows the viewport the image edge may never pull
/// away from the viewport edge; otherwise the image is pinned to the center.
fn axis_bounds(viewport_extent: f64, image_extent: f64, scale: f64) -> (f64, f64) {
    let scaled = image_extent * scale;
    if scaled > viewport_extent {
        (viewport_extent - scaled, 0.0)
    } else {
        let center = (viewport_extent - scaled) / 2.0;
        (center, center)
    }
}

fn is_valid_extent(extent: Size) -> bool {
    extent.width.is_finite() && extent.height.is_finite() && extent.width > 0.0 && extent.height > 0.0
}

/// Owns the current [`View`] and applies zoom and pan requests to it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    view: View,
    /// Where panning is heading; the view approaches it by interpolation.
    pan_target: Vec2,
    viewport_size: Size,
    image_extent: Size,
    config: ViewportConfig,
}

impl ViewportController {
    /// Create a controller showing `image_extent` centered at the base scale.
    pub fn new(config: ViewportConfig, viewport_size: Size, image_extent: Size) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_viewport_size(viewport_size)?;
        if !is_valid_extent(image_extent) {
            return Err(ConfigError::InvalidExtent {
                width: image_extent.width,
                height: image_extent.height,
            });
        }
        let mut controller = Self {
            view: View::default(),
            pan_target: Vec2::ZERO,
            viewport_size,
            image_extent,
            config,
        };
        controller.reset_for_image(image_extent);
        Ok(controller)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn scale(&self) -> f64 {
        self.view.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.view.translate
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn image_extent(&self) -> Size {
        self.image_extent
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Image bounds in image space.
    pub fn image_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.image_extent)
    }

    /// Whether an image-space point lies on the image.
    pub fn contains_image_point(&self, point: Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.image_extent.width
            && point.y <= self.image_extent.height
    }

    /// Legal translate range `(min, max)` at the given scale.
    pub fn translate_bounds(&self, scale: f64) -> (Vec2, Vec2) {
        let (min_x, max_x) = axis_bounds(self.viewport_size.width, self.image_extent.width, scale);
        let (min_y, max_y) = axis_bounds(self.viewport_size.height, self.image_extent.height, scale);
        (Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    /// Clamp a translate into the legal range for `scale`.
    ///
    /// NaN bounds fall through to the input rather than panicking; the result
    /// is checked by [`View::is_valid`] before it is installed.
    pub fn clamp_translate(&self, translate: Vec2, scale: f64) -> Vec2 {
        let (min, max) = self.translate_bounds(scale);
        Vec2::new(
            translate.x.max(min.x).min(max.x),
            translate.y.max(min.y).min(max.y),
        )
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.config.min_scale).min(self.config.max_scale)
    }

    /// Zoom in by one step. Returns true if the view changed.
    pub fn zoom_in(&mut self) -> bool {
        let target = self.config.zoom_step.zoom_in(self.view.scale);
        self.set_scale(target)
    }

    /// Zoom out by one step. Returns true if the view changed.
    pub fn zoom_out(&mut self) -> bool {
        let target = self.config.zoom_step.zoom_out(self.view.scale);
        self.set_scale(target)
    }

    /// Set the scale (clamped to the configured limits), keeping the viewport
    /// center over the same image point before re-clamping translate.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            log::warn!("Ignoring non-finite scale {}", scale);
            return false;
        }
        let new_scale = self.clamp_scale(scale);
        if (new_scale - self.view.scale).abs() < f64::EPSILON {
            return false;
        }

        let center = Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0);
        let anchor = self.view.to_image_space(center);
        let translate = Vec2::new(center.x - anchor.x * new_scale, center.y - anchor.y * new_scale);
        let next = View::new(new_scale, self.clamp_translate(translate, new_scale));
        log::debug!("Zoom {:.3} -> {:.3}", self.view.scale, new_scale);
        let changed = self.apply(next);
        self.pan_target = self.view.translate;
        changed
    }

    /// Re-anchor the pan target on the current view (start of a drag).
    pub fn begin_pan(&mut self) {
        self.pan_target = self.view.translate;
    }

    /// Pan by a screen-space delta.
    ///
    /// Returns false when the delta is below the tremor threshold (or not
    /// finite) and was ignored, so callers can keep accumulating movement.
    pub fn pan(&mut self, delta: Vec2) -> bool {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            log::warn!("Ignoring non-finite pan delta {:?}", delta);
            return false;
        }
        let image_delta = self.view.delta_to_image_space(delta);
        let threshold = self.config.pan_threshold;
        if image_delta.x.abs() < threshold && image_delta.y.abs() < threshold {
            return false;
        }

        let scale = self.view.scale;
        self.pan_target = self.clamp_translate(self.pan_target + delta, scale);
        let smoothed = self.view.translate.lerp(self.pan_target, self.config.pan_smoothing);
        self.apply(View::new(scale, self.clamp_translate(smoothed, scale)));
        true
    }

    /// Settle the view on the pan target at the end of a drag.
    pub fn finish_pan(&mut self) -> bool {
        let scale = self.view.scale;
        let target = self.clamp_translate(self.pan_target, scale);
        if target == self.view.translate {
            return false;
        }
        self.apply(View::new(scale, target))
    }

    /// Show a newly selected image: base scale, centered.
    ///
    /// Returns false and keeps the current image and view if the extent is not
    /// finite and positive.
    pub fn reset_for_image(&mut self, image_extent: Size) -> bool {
        if !is_valid_extent(image_extent) {
            log::warn!("Ignoring invalid image extent {:?}", image_extent);
            return false;
        }
        self.image_extent = image_extent;
        let scale = self.clamp_scale(1.0);
        let candidate = View::new(scale, self.clamp_translate(Vec2::ZERO, scale));
        if candidate.is_valid() {
            self.view = candidate;
        } else {
            log::warn!("Rejecting invalid view {:?} for image {:?}", candidate, image_extent);
            self.view = View::default();
        }
        self.pan_target = self.view.translate;
        true
    }

    /// Resize the viewport, re-clamping the current view.
    pub fn set_viewport_size(&mut self, size: Size) -> bool {
        if let Err(e) = validate_viewport_size(size) {
            log::warn!("Ignoring viewport resize: {}", e);
            return false;
        }
        self.viewport_size = size;
        let scale = self.view.scale;
        let changed = self.apply(View::new(scale, self.clamp_translate(self.view.translate, scale)));
        self.pan_target = self.view.translate;
        changed
    }

    /// Install a candidate view, keeping the last good one if it is unusable.
    fn apply(&mut self, candidate: View) -> bool {
        if !candidate.is_valid() {
            log::warn!("Rejecting invalid view {:?}, keeping {:?}", candidate, self.view);
            return false;
        }
        let changed = candidate != self.view;
        self.view = candidate;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoomStep;

    fn controller(viewport: (f64, f64), image: (f64, f64)) -> ViewportController {
        ViewportController::new(
            ViewportConfig::default(),
            Size::new(viewport.0, viewport.1),
            Size::new(image.0, image.1),
        )
        .unwrap()
    }

    fn assert_within_bounds(vc: &ViewportController) {
        let (min, max) = vc.translate_bounds(vc.scale());
        let t = vc.translate();
        assert!(t.x >= min.x - 1e-9 && t.x <= max.x + 1e-9, "x {} not in [{}, {}]", t.x, min.x, max.x);
        assert!(t.y >= min.y - 1e-9 && t.y <= max.y + 1e-9, "y {} not in [{}, {}]", t.y, min.y, max.y);

        let size = vc.viewport_size();
        let extent = vc.image_extent();
        let scaled_w = extent.width * vc.scale();
        if scaled_w > size.width {
            // Image covers the axis: no gap at either edge.
            assert!(t.x <= 1e-9);
            assert!(t.x + scaled_w >= size.width - 1e-9);
        } else {
            assert!((t.x - (size.width - scaled_w) / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_initial_view_is_centered() {
        let vc = controller((1000.0, 800.0), (600.0, 400.0));
        assert!((vc.scale() - 1.0).abs() < f64::EPSILON);
        assert!((vc.translate().x - 200.0).abs() < f64::EPSILON);
        assert!((vc.translate().y - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_large_image_starts_at_origin_edge() {
        let vc = controller((1000.0, 800.0), (3000.0, 2000.0));
        // Overflowing axes clamp 0 into [viewport - image, 0].
        assert_eq!(vc.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_zoom_in_caps_at_max() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        for _ in 0..10 {
            vc.zoom_in();
        }
        assert!((vc.scale() - 3.0).abs() < f64::EPSILON);
        assert!(!vc.zoom_in());
        assert_within_bounds(&vc);
    }

    #[test]
    fn test_zoom_out_floors_at_min() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        assert!(!vc.zoom_out());
        vc.zoom_in();
        vc.zoom_in();
        for _ in 0..10 {
            vc.zoom_out();
        }
        assert!((vc.scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(vc.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_zoom_sequences_stay_in_range() {
        let mut vc = controller((1000.0, 800.0), (1200.0, 700.0));
        let pattern = [true, true, false, true, true, true, true, false, false, true, false, false, false, false, false];
        for (i, &zoom_in) in pattern.iter().cycle().take(200).enumerate() {
            if zoom_in {
                vc.zoom_in();
            } else {
                vc.zoom_out();
            }
            if i % 3 == 0 {
                vc.pan(Vec2::new(37.0, -53.0));
            }
            assert!(vc.scale() >= 1.0 && vc.scale() <= 3.0);
            assert_within_bounds(&vc);
        }
    }

    #[test]
    fn test_zoom_keeps_center_when_unclamped() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.zoom_in();
        let center = vc.view().to_image_space(Point::new(500.0, 400.0));
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_additive_zoom_step() {
        let config = ViewportConfig {
            zoom_step: ZoomStep::Additive { step: 0.5 },
            ..ViewportConfig::default()
        };
        let mut vc = ViewportController::new(config, Size::new(800.0, 600.0), Size::new(800.0, 600.0)).unwrap();
        vc.zoom_in();
        assert!((vc.scale() - 1.5).abs() < f64::EPSILON);
        for _ in 0..5 {
            vc.zoom_in();
        }
        assert!((vc.scale() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_clamped_when_image_fits_axis() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.begin_pan();
        assert!(vc.pan(Vec2::new(-100.0, 0.0)));
        vc.finish_pan();
        assert!((vc.translate().x).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_smoothing_then_settle() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.zoom_in();
        vc.zoom_in(); // 1.44, translate (-220, -176)
        let start = vc.translate();

        vc.begin_pan();
        assert!(vc.pan(Vec2::new(-100.0, 0.0)));
        // Moves 70% of the way toward the target.
        assert!((vc.translate().x - (start.x - 70.0)).abs() < 1e-9);

        vc.finish_pan();
        assert!((vc.translate().x - (start.x - 100.0)).abs() < 1e-9);
        assert_within_bounds(&vc);
    }

    #[test]
    fn test_pan_ignores_tremor() {
        let mut vc = controller((1000.0, 800.0), (2000.0, 1600.0));
        let before = vc.translate();
        vc.begin_pan();
        assert!(!vc.pan(Vec2::new(-1.5, 1.0)));
        assert_eq!(vc.translate(), before);
        assert!(!vc.pan(Vec2::new(f64::NAN, 10.0)));
    }

    #[test]
    fn test_pan_never_reveals_gap() {
        let mut vc = controller((1000.0, 800.0), (2500.0, 1000.0));
        vc.begin_pan();
        let deltas = [
            Vec2::new(500.0, 300.0),
            Vec2::new(-4000.0, -100.0),
            Vec2::new(-300.0, -900.0),
            Vec2::new(9000.0, 9000.0),
        ];
        for d in deltas {
            vc.pan(d);
            assert_within_bounds(&vc);
        }
        vc.finish_pan();
        assert_within_bounds(&vc);
    }

    #[test]
    fn test_reset_for_image() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.zoom_in();
        vc.begin_pan();
        vc.pan(Vec2::new(-50.0, -50.0));
        vc.reset_for_image(Size::new(500.0, 400.0));
        assert!((vc.scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(vc.translate(), Vec2::new(250.0, 200.0));
        assert_eq!(vc.image_extent(), Size::new(500.0, 400.0));
    }

    #[test]
    fn test_new_rejects_invalid_setup() {
        let config = ViewportConfig {
            min_scale: 4.0,
            max_scale: 3.0,
            ..ViewportConfig::default()
        };
        let err = ViewportController::new(config, Size::new(1000.0, 800.0), Size::new(1000.0, 800.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidZoomLimits { .. }));

        let err = ViewportController::new(
            ViewportConfig::default(),
            Size::new(1000.0, 800.0),
            Size::new(f64::NAN, 800.0),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExtent { .. }));

        let err = ViewportController::new(
            ViewportConfig::default(),
            Size::new(0.0, 800.0),
            Size::new(1000.0, 800.0),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViewport { .. }));
    }

    #[test]
    fn test_reset_for_invalid_extent_keeps_view() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.zoom_in();
        let before = vc.view();
        for extent in [
            Size::new(f64::NAN, 800.0),
            Size::new(1000.0, f64::INFINITY),
            Size::new(0.0, 800.0),
            Size::new(-5.0, 800.0),
        ] {
            assert!(!vc.reset_for_image(extent));
            assert_eq!(vc.view(), before);
            assert_eq!(vc.image_extent(), Size::new(1000.0, 800.0));
        }
        assert!(vc.reset_for_image(Size::new(500.0, 400.0)));
        assert!(vc.view().is_valid());
    }

    #[test]
    fn test_clamp_translate_with_nan_scale_does_not_panic() {
        let vc = controller((1000.0, 800.0), (1000.0, 800.0));
        let t = vc.clamp_translate(Vec2::new(10.0, 10.0), f64::NAN);
        assert_eq!(t, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_invalid_scale_keeps_last_good_view() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        let before = vc.view();
        assert!(!vc.set_scale(f64::NAN));
        assert!(!vc.set_scale(f64::INFINITY));
        assert_eq!(vc.view(), before);
    }

    #[test]
    fn test_set_viewport_size_recenters() {
        let mut vc = controller((1000.0, 800.0), (1000.0, 800.0));
        vc.set_viewport_size(Size::new(1200.0, 800.0));
        assert!((vc.translate().x - 100.0).abs() < f64::EPSILON);
        assert!(!vc.set_viewport_size(Size::new(0.0, 800.0)));
    }

    #[test]
    fn test_contains_image_point() {
        let vc = controller((1000.0, 800.0), (1000.0, 800.0));
        assert!(vc.contains_image_point(Point::new(0.0, 0.0)));
        assert!(vc.contains_image_point(Point::new(1000.0, 800.0)));
        assert!(!vc.contains_image_point(Point::new(-0.1, 10.0)));
        assert!(!vc.contains_image_point(Point::new(10.0, 800.1)));
    }
}
