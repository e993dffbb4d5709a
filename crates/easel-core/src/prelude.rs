//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_core::prelude::*;` to import all essential types.

// Geometry
pub use crate::{Point, Rect, Size};

// Object model
pub use crate::{ObjectFlags, ObjectId, ObjectKind, Orientation, SceneObject, WORKSPACE_ID};

// Workspace
pub use crate::{DocumentBounds, ProtectionFlags};

// Scene graph and document format
pub use crate::{PaintItem, SceneGraph, SceneSnapshot, SerializedDocument};

// Surface contract
pub use crate::{Cursor, RenderSurface};

// Errors
pub use crate::{CoreError, CoreResult};
