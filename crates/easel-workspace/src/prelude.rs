//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_workspace::prelude::*;` to import all essential types.

// Configuration
pub use crate::{GuideConfig, ViewportConfig, WorkspaceError, WorkspaceResult};

// Viewport
pub use crate::{Viewport, ViewportTransform, fit_scale};

// Protection
pub use crate::{enforce_protection, filter_removal};

// Guides
pub use crate::{GuideCheck, GuideDragTracker, ReleaseOutcome, is_rect_out};

// Ruler
pub use crate::{Ruler, RulerLayout, Tick};
