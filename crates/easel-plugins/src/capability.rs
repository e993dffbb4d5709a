//! Typed capabilities published by plugins.
//!
//! Plugins expose their API twice: as string-keyed methods on the
//! [`Facade`](crate::Facade), which tolerates absent plugins, and as the
//! traits below for callers that want compile-time signatures.

use std::sync::Arc;

use easel_core::{ObjectId, Orientation, Point, Rect, Size};
use easel_workspace::{DragFeedback, ReleaseOutcome, RulerLayout, ViewportTransform};

use crate::error::PluginResult;

/// Undo/redo over scene snapshots.
pub trait HistoryCapability: Send + Sync {
    /// Step back one entry. Returns `false` if there was nothing to undo.
    fn undo(&self) -> bool;
    /// Step forward one entry. Returns `false` if there was nothing to redo.
    fn redo(&self) -> bool;
    /// Whether an undo step exists.
    fn can_undo(&self) -> bool;
    /// Whether a redo step exists.
    fn can_redo(&self) -> bool;
    /// Drop both stacks, keeping the current scene as the baseline.
    fn clear(&self);
}

/// Document size and viewport control.
pub trait WorkspaceCapability: Send + Sync {
    /// Resize the document and refit the view.
    ///
    /// # Errors
    ///
    /// Fails for non-positive dimensions.
    fn set_size(&self, width: f64, height: f64) -> PluginResult<()>;
    /// Current document size.
    fn size(&self) -> Size;
    /// Zoom in one step. Returns the new zoom.
    fn zoom_in(&self) -> f64;
    /// Zoom out one step. Returns the new zoom.
    fn zoom_out(&self) -> f64;
    /// Fit the document into the container. Returns the new zoom.
    fn zoom_to_fit(&self) -> f64;
    /// Show the document at 1:1, centered. Returns the new zoom.
    fn zoom_to_one(&self) -> f64;
    /// Zoom about the container center. Returns the clamped zoom.
    fn set_zoom(&self, zoom: f64) -> f64;
    /// Zoom keeping the document point under `screen_point` fixed. Returns
    /// the clamped zoom.
    fn zoom_to_point(&self, screen_point: Point, zoom: f64) -> f64;
    /// Scroll the view by a screen offset.
    fn pan_by(&self, dx: f64, dy: f64) -> ViewportTransform;
    /// Current zoom.
    fn zoom(&self) -> f64;
    /// Current document-to-screen transform.
    fn transform(&self) -> ViewportTransform;
    /// Adopt a new container size and refit. Returns the new zoom.
    fn resize_container(&self, container: Size) -> f64;
    /// Document rectangle painting is clipped to.
    fn clip_region(&self) -> Rect;
}

/// Guide lines and rulers.
pub trait GuideCapability: Send + Sync {
    /// Add a guide at a document coordinate.
    ///
    /// # Errors
    ///
    /// Fails if the scene rejects the object.
    fn add_guide(&self, orientation: Orientation, position: f64) -> PluginResult<ObjectId>;
    /// Move a guide while dragging. Does not record history.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not a guide.
    fn drag_guide(&self, id: &ObjectId, position: f64) -> PluginResult<DragFeedback>;
    /// Finish a drag, removing the guide if it is out.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not a guide.
    fn release_guide(&self, id: &ObjectId) -> PluginResult<ReleaseOutcome>;
    /// Ruler ticks for the current viewport, `None` when disabled.
    fn ruler_layout(&self) -> Option<RulerLayout>;
    /// Show or hide the rulers.
    fn set_ruler_enabled(&self, enabled: bool);
    /// Guides lying entirely outside the workspace, in scene order.
    fn outside_guides(&self) -> Vec<ObjectId>;
    /// Remove every guide. Returns how many were removed.
    fn clear_guides(&self) -> usize;
}

/// One published capability.
#[derive(Clone)]
pub enum Capability {
    /// Undo/redo.
    History(Arc<dyn HistoryCapability>),
    /// Workspace and viewport.
    Workspace(Arc<dyn WorkspaceCapability>),
    /// Guides and rulers.
    Guides(Arc<dyn GuideCapability>),
}

impl Capability {
    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::History(_) => "history",
            Self::Workspace(_) => "workspace",
            Self::Guides(_) => "guides",
        }
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Capability").field(&self.kind()).finish()
    }
}
