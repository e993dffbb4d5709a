//! Easel Workspace - Document bounds, viewport and guide engine.
//!
//! This crate provides:
//! - Workspace protection: re-asserting the protection flags and dropping
//!   the workspace from removal target sets
//! - Viewport math: the document-to-screen transform, fit-to-container
//!   scaling, stepped and anchored zoom, panning
//! - Guide bounds checks and drag tracking
//! - Ruler tick layout in document coordinates
//!
//! Everything here is pure computation over `easel-core` types. The editor
//! host wires it to events and to the rendering surface.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod config;
pub mod error;
pub mod guides;
pub mod protection;
pub mod ruler;
pub mod viewport;

pub use config::{GuideConfig, ViewportConfig};
pub use error::{WorkspaceError, WorkspaceResult};
pub use guides::{
    DragFeedback, GuideCheck, GuideDragTracker, ReleaseOutcome, check_guide, hover_cursor,
    is_rect_out,
};
pub use protection::{enforce_protection, filter_removal};
pub use ruler::{Ruler, RulerLayout, Tick, highlight_range, ruler_ticks, tick_gap};
pub use viewport::{Viewport, ViewportTransform, fit_scale};
