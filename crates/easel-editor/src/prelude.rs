//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_editor::prelude::*;` to import all essential types.

// Errors
pub use crate::{EditorError, EditorResult};

// Host
pub use crate::{Editor, EditorBuilder, EditorSettings};

// Built-in plugin names
pub use crate::builtin::{GUIDES_PLUGIN, HISTORY_PLUGIN, WORKSPACE_PLUGIN};

// Capabilities
pub use easel_plugins::{GuideCapability, HistoryCapability, WorkspaceCapability};
