//! Contract with the rendering surface.
//!
//! The drawing library owns pixels, hit-testing and the canvas element. The
//! editor core only needs the handful of operations below.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Pointer cursor shown over the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    /// Platform default arrow.
    #[default]
    Default,
    /// Move/drag cursor.
    Move,
    /// Horizontal resize, used over vertical guides.
    EwResize,
    /// Vertical resize, used over horizontal guides.
    NsResize,
    /// Rejecting cursor.
    NotAllowed,
}

/// A rendering surface the editor draws through.
pub trait RenderSurface: Send + Sync {
    /// Whether the drawing context is attached and usable.
    fn is_ready(&self) -> bool;

    /// Size of the element hosting the surface, in CSS pixels.
    fn container_size(&self) -> Size;

    /// Resize the backing store, in CSS pixels.
    fn set_dimensions(&self, size: Size);

    /// Ratio of device pixels to CSS pixels.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Apply an affine viewport transform `[a, b, c, d, e, f]`.
    fn set_viewport_transform(&self, matrix: [f64; 6]);

    /// Restrict painting to a rectangle in document coordinates.
    fn set_clip_region(&self, rect: Option<Rect>);

    /// Change the pointer cursor.
    fn set_cursor(&self, cursor: Cursor);

    /// Schedule a repaint.
    fn request_render(&self);
}
