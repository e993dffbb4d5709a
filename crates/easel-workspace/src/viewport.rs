//! Pan/zoom transform and fit-to-container math.

use easel_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ViewportConfig;

/// Affine transform from document to screen coordinates.
///
/// Scale is uniform in practice; both axes are kept for the surface matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Horizontal offset in screen pixels.
    pub translate_x: f64,
    /// Vertical offset in screen pixels.
    pub translate_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    /// No scaling, no offset.
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Uniform transform.
    #[must_use]
    pub const fn new(zoom: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale_x: zoom,
            scale_y: zoom,
            translate_x,
            translate_y,
        }
    }

    /// Zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.scale_x
    }

    /// Surface matrix `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn to_matrix(&self) -> [f64; 6] {
        [
            self.scale_x,
            0.0,
            0.0,
            self.scale_y,
            self.translate_x,
            self.translate_y,
        ]
    }

    /// Document point to screen point.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale_x + self.translate_x,
            point.y * self.scale_y + self.translate_y,
        )
    }

    /// Screen point to document point.
    #[must_use]
    pub fn invert(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.translate_x) / self.scale_x,
            (point.y - self.translate_y) / self.scale_y,
        )
    }

    /// Document rectangle to screen rectangle.
    #[must_use]
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let origin = self.apply(Point::new(rect.left, rect.top));
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale_x,
            rect.height * self.scale_y,
        )
    }

    /// Screen rectangle to document rectangle.
    #[must_use]
    pub fn invert_rect(&self, rect: &Rect) -> Rect {
        let origin = self.invert(Point::new(rect.left, rect.top));
        Rect::new(
            origin.x,
            origin.y,
            rect.width / self.scale_x,
            rect.height / self.scale_y,
        )
    }
}

/// Zoom level that fits `workspace` inside `container`.
///
/// `min(cW·pad / wsW, cH·pad / wsH, 1)` times the comfortable-viewing ratio.
/// The result never exceeds `fit_ratio` and never drops below `min_zoom`
/// (or `fit_ratio`, whichever is smaller), so it is always positive. Out of
/// range settings are replaced as by [`ViewportConfig::sanitized`].
#[must_use]
pub fn fit_scale(container: Size, workspace: Size, config: &ViewportConfig) -> f64 {
    let config = config.sanitized();
    let ratio = config.fit_ratio;
    let floor = config.min_zoom.min(ratio);

    let raw = if workspace.is_positive() {
        (container.width * config.fit_padding / workspace.width)
            .min(container.height * config.fit_padding / workspace.height)
            .min(1.0)
    } else {
        1.0
    };
    let raw = if raw.is_finite() && raw > 0.0 { raw } else { 0.0 };

    (raw * ratio).max(floor).min(ratio)
}

/// Viewport state for one surface.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    container: Size,
    transform: ViewportTransform,
}

impl Viewport {
    /// Create a viewport for a container of the given size.
    ///
    /// The settings are [sanitized](ViewportConfig::sanitized) first.
    #[must_use]
    pub fn new(config: ViewportConfig, container: Size) -> Self {
        Self {
            config: config.sanitized(),
            container,
            transform: ViewportTransform::IDENTITY,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Container size.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Current transform.
    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.transform.zoom()
    }

    /// Change the container size without moving the view.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
    }

    /// Fit the workspace in the container and centre it.
    pub fn zoom_to_fit(&mut self, workspace: Size) -> ViewportTransform {
        let zoom = fit_scale(self.container, workspace, &self.config);
        self.center_on(workspace, zoom);
        debug!(zoom, "Zoomed to fit");
        self.transform
    }

    /// Show the workspace at natural size, centred.
    pub fn zoom_to_one(&mut self, workspace: Size) -> ViewportTransform {
        let zoom = self.clamp(1.0);
        self.center_on(workspace, zoom);
        self.transform
    }

    /// Zoom by one step around the container centre.
    pub fn zoom_in(&mut self) -> ViewportTransform {
        self.set_zoom(self.zoom() + self.config.zoom_step)
    }

    /// Zoom out by one step around the container centre.
    pub fn zoom_out(&mut self) -> ViewportTransform {
        self.set_zoom(self.zoom() - self.config.zoom_step)
    }

    /// Set the zoom level around the container centre, clamped to the
    /// configured range.
    pub fn set_zoom(&mut self, zoom: f64) -> ViewportTransform {
        self.zoom_to_point(self.container.center(), zoom)
    }

    /// Set the zoom level keeping the document point under `screen_point`
    /// in place.
    pub fn zoom_to_point(&mut self, screen_point: Point, zoom: f64) -> ViewportTransform {
        let zoom = self.clamp(zoom);
        let anchor = self.transform.invert(screen_point);
        self.transform = ViewportTransform::new(
            zoom,
            screen_point.x - anchor.x * zoom,
            screen_point.y - anchor.y * zoom,
        );
        self.transform
    }

    /// Move the view by a screen offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> ViewportTransform {
        self.transform.translate_x += dx;
        self.transform.translate_y += dy;
        self.transform
    }

    /// Document rectangle visible in the container.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        self.transform.invert_rect(&Rect::new(
            0.0,
            0.0,
            self.container.width,
            self.container.height,
        ))
    }

    fn center_on(&mut self, workspace: Size, zoom: f64) {
        let center = self.container.center();
        self.transform = ViewportTransform::new(
            zoom,
            center.x - workspace.width * zoom / 2.0,
            center.y - workspace.height * zoom / 2.0,
        );
    }

    fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.config.min_zoom;
        }
        // f64::clamp panics when min > max
        zoom.max(self.config.min_zoom).min(self.config.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_apply_and_invert() {
        let t = ViewportTransform::new(2.0, 10.0, -5.0);
        let p = Point::new(3.0, 4.0);
        let screen = t.apply(p);
        assert_eq!(screen, Point::new(16.0, 3.0));
        assert_eq!(t.invert(screen), p);
        assert_eq!(t.to_matrix(), [2.0, 0.0, 0.0, 2.0, 10.0, -5.0]);
    }

    #[test]
    fn test_fit_scale_never_exceeds_ratio() {
        let config = ViewportConfig::default();
        let small_doc = fit_scale(Size::new(1000.0, 1000.0), Size::new(10.0, 10.0), &config);
        assert!(approx(small_doc, config.fit_ratio));

        let big_doc = fit_scale(Size::new(500.0, 400.0), Size::new(1000.0, 2000.0), &config);
        assert!(approx(big_doc, 0.2 * config.fit_ratio));
    }

    #[test]
    fn test_fit_scale_degenerate_inputs_stay_positive() {
        let config = ViewportConfig::default();
        for (container, workspace) in [
            (Size::new(0.0, 0.0), Size::new(100.0, 100.0)),
            (Size::new(100.0, 100.0), Size::new(0.0, 0.0)),
            (Size::new(f64::NAN, 10.0), Size::new(10.0, 10.0)),
            (Size::new(1.0, 1.0), Size::new(1e12, 1e12)),
        ] {
            let s = fit_scale(container, workspace, &config);
            assert!(s > 0.0 && s <= config.fit_ratio, "{s}");
        }
    }

    #[test]
    fn test_zoom_to_fit_centres_workspace() {
        let mut viewport = Viewport::new(ViewportConfig::default(), Size::new(1000.0, 800.0));
        let t = viewport.zoom_to_fit(Size::new(500.0, 400.0));
        assert!(approx(t.zoom(), 0.85));

        let ws_center = t.apply(Point::new(250.0, 200.0));
        assert!(approx(ws_center.x, 500.0));
        assert!(approx(ws_center.y, 400.0));
    }

    #[test]
    fn test_zoom_steps_are_clamped() {
        let config = ViewportConfig {
            min_zoom: 0.5,
            max_zoom: 1.0,
            zoom_step: 0.3,
            ..ViewportConfig::default()
        };
        let mut viewport = Viewport::new(config, Size::new(100.0, 100.0));
        viewport.set_zoom(0.9);
        assert!(approx(viewport.zoom_in().zoom(), 1.0));
        viewport.zoom_out();
        viewport.zoom_out();
        assert!(approx(viewport.zoom_out().zoom(), 0.5));
    }

    #[test]
    fn test_zoom_keeps_centre_fixed() {
        let mut viewport = Viewport::new(ViewportConfig::default(), Size::new(200.0, 100.0));
        viewport.zoom_to_fit(Size::new(400.0, 200.0));
        let center = viewport.container().center();
        let before = viewport.transform().invert(center);
        viewport.zoom_in();
        let after = viewport.transform().invert(center);
        assert!(approx(before.x, after.x));
        assert!(approx(before.y, after.y));
    }

    #[test]
    fn test_pan_and_visible_rect() {
        let mut viewport = Viewport::new(ViewportConfig::default(), Size::new(100.0, 50.0));
        viewport.set_zoom(2.0);
        viewport.pan_by(10.0, 0.0);
        let visible = viewport.visible_rect();
        assert!(approx(visible.width, 50.0));
        assert!(approx(visible.height, 25.0));
    }

    #[test]
    fn test_zoom_to_one() {
        let mut viewport = Viewport::new(ViewportConfig::default(), Size::new(100.0, 100.0));
        let t = viewport.zoom_to_one(Size::new(50.0, 50.0));
        assert_eq!(t, ViewportTransform::new(1.0, 25.0, 25.0));
    }

    #[test]
    fn test_unusable_settings_never_panic_or_zero() {
        let config = ViewportConfig {
            fit_ratio: 0.0,
            min_zoom: 5.0,
            max_zoom: 1.0,
            ..ViewportConfig::default()
        };
        let scale = fit_scale(Size::new(1000.0, 800.0), Size::new(900.0, 1200.0), &config);
        assert!(scale > 0.0);

        let mut viewport = Viewport::new(config, Size::new(1000.0, 800.0));
        let zoom = viewport.zoom_in().zoom();
        assert!((1.0..=5.0).contains(&zoom));
        assert!(viewport.set_zoom(f64::INFINITY).zoom() <= 5.0);
    }
}
