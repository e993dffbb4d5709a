//! Guide line bounds checks and drag tracking.

use easel_core::{Cursor, Orientation, Rect, SceneObject};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GuideConfig;

/// Result of checking a guide against the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideCheck {
    /// Some part of the guide overlaps the workspace, within tolerance.
    Inside,
    /// The guide lies entirely beyond one edge of the workspace.
    Out,
}

impl GuideCheck {
    /// Whether the guide is out.
    #[must_use]
    pub fn is_out(&self) -> bool {
        matches!(self, Self::Out)
    }
}

/// Orientation-aware out-of-bounds test.
///
/// A horizontal guide is out when its vertical extent lies entirely above or
/// below the workspace; a vertical guide uses the horizontal extent. A guide
/// within `tolerance` of an edge still counts as inside.
#[must_use]
pub fn is_rect_out(guide: &Rect, orientation: Orientation, workspace: &Rect, tolerance: f64) -> bool {
    let tolerance = tolerance.max(0.0);
    match orientation {
        Orientation::Horizontal => {
            guide.bottom() < workspace.top - tolerance || guide.top > workspace.bottom() + tolerance
        },
        Orientation::Vertical => {
            guide.right() < workspace.left - tolerance || guide.left > workspace.right() + tolerance
        },
    }
}

/// Check a guide object against the workspace rectangle.
///
/// Objects that are not guides are always inside.
#[must_use]
pub fn check_guide(guide: &SceneObject, workspace: &Rect, config: &GuideConfig) -> GuideCheck {
    let Some(orientation) = guide.axis.filter(|_| guide.is_guide()) else {
        return GuideCheck::Inside;
    };
    if is_rect_out(&guide.bounding_rect(), orientation, workspace, config.out_tolerance_px) {
        GuideCheck::Out
    } else {
        GuideCheck::Inside
    }
}

/// Cursor shown while hovering a guide.
#[must_use]
pub fn hover_cursor(orientation: Orientation) -> Cursor {
    match orientation {
        Orientation::Horizontal => Cursor::NsResize,
        Orientation::Vertical => Cursor::EwResize,
    }
}

/// Feedback for one drag-move tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragFeedback {
    /// Bounds check result at this position.
    pub check: GuideCheck,
    /// Cursor to show.
    pub cursor: Cursor,
}

/// What happens to a guide on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseOutcome {
    /// The guide stays in the scene.
    Kept,
    /// The guide was out and must be removed.
    Removed,
}

/// Decides cursors and removal while guides are dragged.
///
/// Constraint violations here are interactive states, never errors.
#[derive(Debug, Clone, Default)]
pub struct GuideDragTracker {
    config: GuideConfig,
}

impl GuideDragTracker {
    /// Create a tracker.
    #[must_use]
    pub fn new(config: GuideConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// One drag-move tick: an out guide shows the rejecting cursor.
    #[must_use]
    pub fn on_move(&self, guide: &SceneObject, workspace: &Rect) -> DragFeedback {
        let check = check_guide(guide, workspace, &self.config);
        let cursor = match (check, guide.axis) {
            (GuideCheck::Out, _) => Cursor::NotAllowed,
            (GuideCheck::Inside, Some(orientation)) => hover_cursor(orientation),
            (GuideCheck::Inside, None) => Cursor::Move,
        };
        DragFeedback { check, cursor }
    }

    /// Release: an out guide is removed.
    #[must_use]
    pub fn on_release(&self, guide: &SceneObject, workspace: &Rect) -> ReleaseOutcome {
        if check_guide(guide, workspace, &self.config).is_out() {
            debug!(guide = %guide.id, "Guide released outside workspace");
            ReleaseOutcome::Removed
        } else {
            ReleaseOutcome::Kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WS: Rect = Rect::new(0.0, 0.0, 100.0, 200.0);

    fn h_guide(y: f64) -> SceneObject {
        SceneObject::guide(Orientation::Horizontal, y, 10_000.0, 2.0)
    }

    fn v_guide(x: f64) -> SceneObject {
        SceneObject::guide(Orientation::Vertical, x, 10_000.0, 2.0)
    }

    #[test]
    fn test_horizontal_guide_uses_vertical_extent() {
        let config = GuideConfig::default();
        assert_eq!(check_guide(&h_guide(50.0), &WS, &config), GuideCheck::Inside);
        assert_eq!(check_guide(&h_guide(-10.0), &WS, &config), GuideCheck::Out);
        assert_eq!(check_guide(&h_guide(215.0), &WS, &config), GuideCheck::Out);
        // Far left/right does not matter for a horizontal guide
        let mut moved = h_guide(50.0);
        moved.left = 5_000.0;
        assert_eq!(check_guide(&moved, &WS, &config), GuideCheck::Inside);
    }

    #[test]
    fn test_vertical_guide_uses_horizontal_extent() {
        let config = GuideConfig::default();
        assert_eq!(check_guide(&v_guide(99.0), &WS, &config), GuideCheck::Inside);
        assert_eq!(check_guide(&v_guide(150.0), &WS, &config), GuideCheck::Out);
        assert_eq!(check_guide(&v_guide(-3.0), &WS, &config), GuideCheck::Out);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        // Guide spans y in [-2.5, -0.5], one pixel of slack reaches -1.0
        let guide = Rect::new(0.0, -2.5, 10.0, 2.0);
        assert!(!is_rect_out(&guide, Orientation::Horizontal, &WS, 1.0));
        assert!(is_rect_out(&guide, Orientation::Horizontal, &WS, 0.0));

        let touching = Rect::new(0.0, -3.0, 10.0, 2.0);
        assert!(!is_rect_out(&touching, Orientation::Horizontal, &WS, 1.0));
    }

    #[test]
    fn test_drag_cursor_feedback() {
        let tracker = GuideDragTracker::default();
        let inside = tracker.on_move(&h_guide(10.0), &WS);
        assert_eq!(inside.cursor, Cursor::NsResize);
        let out = tracker.on_move(&v_guide(-50.0), &WS);
        assert_eq!(out.cursor, Cursor::NotAllowed);
        assert!(out.check.is_out());
    }

    #[test]
    fn test_release_outcome() {
        let tracker = GuideDragTracker::default();
        assert_eq!(tracker.on_release(&h_guide(100.0), &WS), ReleaseOutcome::Kept);
        assert_eq!(tracker.on_release(&h_guide(-40.0), &WS), ReleaseOutcome::Removed);
    }

    #[test]
    fn test_non_guides_are_never_out() {
        let rect = SceneObject::new(easel_core::ObjectKind::Rect).with_frame(-500.0, -500.0, 1.0, 1.0);
        assert_eq!(
            check_guide(&rect, &WS, &GuideConfig::default()),
            GuideCheck::Inside
        );
    }
}
