//! Ruler tick layout.
//!
//! Ticks are placed at round document coordinates and projected to the
//! screen through the viewport transform, so labels always read in document
//! units whatever the zoom.

use easel_core::{Orientation, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::config::GuideConfig;
use crate::viewport::{Viewport, ViewportTransform};

/// Every n-th tick gets a label.
const LABEL_EVERY: i64 = 5;

/// Upper bound on ticks per ruler.
const MAX_TICKS: i64 = 10_000;

/// One ruler tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Position in document units.
    pub value: f64,
    /// Position on screen along the ruler.
    pub screen: f64,
    /// Label for major ticks.
    pub label: Option<String>,
}

/// Ticks and selection highlights for both rulers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerLayout {
    /// Distance between ticks in document units.
    pub gap: f64,
    /// Ticks of the top ruler (x axis).
    pub horizontal: Vec<Tick>,
    /// Ticks of the left ruler (y axis).
    pub vertical: Vec<Tick>,
    /// Screen span of the selection along x.
    pub highlight_x: Option<(f64, f64)>,
    /// Screen span of the selection along y.
    pub highlight_y: Option<(f64, f64)>,
}

/// Smallest 1-2-5 step whose on-screen size is at least `min_spacing_px`.
#[must_use]
pub fn tick_gap(zoom: f64, min_spacing_px: f64) -> f64 {
    if !(zoom.is_finite() && zoom > 0.0 && min_spacing_px.is_finite() && min_spacing_px > 0.0) {
        return 1.0;
    }
    let raw = min_spacing_px / zoom;
    #[allow(clippy::cast_possible_truncation)]
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Ticks along one ruler spanning `length_px` screen pixels.
///
/// A horizontal ruler measures x, a vertical one measures y.
#[must_use]
pub fn ruler_ticks(
    orientation: Orientation,
    transform: &ViewportTransform,
    length_px: f64,
    gap: f64,
) -> Vec<Tick> {
    if !(gap.is_finite() && gap > 0.0 && length_px.is_finite() && length_px > 0.0) {
        return Vec::new();
    }

    let (start, end, scale, offset) = match orientation {
        Orientation::Horizontal => (
            transform.invert(Point::new(0.0, 0.0)).x,
            transform.invert(Point::new(length_px, 0.0)).x,
            transform.scale_x,
            transform.translate_x,
        ),
        Orientation::Vertical => (
            transform.invert(Point::new(0.0, 0.0)).y,
            transform.invert(Point::new(0.0, length_px)).y,
            transform.scale_y,
            transform.translate_y,
        ),
    };

    #[allow(clippy::cast_possible_truncation)]
    let first = (start / gap).ceil() as i64;
    let mut ticks = Vec::new();
    let mut index = first;
    let last = first.saturating_add(MAX_TICKS);
    while index < last {
        #[allow(clippy::cast_precision_loss)]
        let value = index as f64 * gap;
        if value > end {
            break;
        }
        let label = (index.rem_euclid(LABEL_EVERY) == 0).then(|| format_value(value));
        ticks.push(Tick {
            value,
            screen: value * scale + offset,
            label,
        });
        index = index.saturating_add(1);
    }
    ticks
}

/// Screen span of a document rectangle along one ruler.
#[must_use]
pub fn highlight_range(
    selection: &Rect,
    orientation: Orientation,
    transform: &ViewportTransform,
) -> (f64, f64) {
    let screen = transform.apply_rect(selection);
    match orientation {
        Orientation::Horizontal => (screen.left, screen.right()),
        Orientation::Vertical => (screen.top, screen.bottom()),
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Ruler overlay state.
#[derive(Debug, Clone)]
pub struct Ruler {
    config: GuideConfig,
    enabled: bool,
}

impl Ruler {
    /// Create an enabled ruler.
    #[must_use]
    pub fn new(config: GuideConfig) -> Self {
        Self {
            config,
            enabled: true,
        }
    }

    /// Whether the ruler is drawn.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Show or hide the ruler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Lay out both rulers for the current viewport. `None` when disabled.
    #[must_use]
    pub fn layout(&self, viewport: &Viewport, selection: Option<&Rect>) -> Option<RulerLayout> {
        self.layout_for(&viewport.transform(), viewport.container(), selection)
    }

    /// Lay out both rulers for a transform and container size.
    #[must_use]
    pub fn layout_for(
        &self,
        transform: &ViewportTransform,
        container: Size,
        selection: Option<&Rect>,
    ) -> Option<RulerLayout> {
        if !self.enabled {
            return None;
        }
        let transform = *transform;
        let gap = tick_gap(transform.zoom(), self.config.min_tick_spacing_px);
        Some(RulerLayout {
            gap,
            horizontal: ruler_ticks(Orientation::Horizontal, &transform, container.width, gap),
            vertical: ruler_ticks(Orientation::Vertical, &transform, container.height, gap),
            highlight_x: selection.map(|r| highlight_range(r, Orientation::Horizontal, &transform)),
            highlight_y: selection.map(|r| highlight_range(r, Orientation::Vertical, &transform)),
        })
    }
}
