//! Event types published on the editor bus.

use easel_core::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event names owned by the scene graph itself.
pub const SCENE_EVENTS: &[&str] = &[
    EditorEvent::OBJECT_ADDED,
    EditorEvent::OBJECT_REMOVED,
    EditorEvent::OBJECT_MODIFIED,
    EditorEvent::PATH_CREATED,
    EditorEvent::SELECTION_CHANGED,
    EditorEvent::SELECTION_CLEARED,
    EditorEvent::DOCUMENT_LOADED,
];

/// Everything that can be announced on the editor bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    // ========== Scene mutations ==========
    /// An object was added to the scene.
    ObjectAdded {
        /// Added object.
        id: ObjectId,
    },

    /// An object was removed from the scene.
    ObjectRemoved {
        /// Removed object.
        id: ObjectId,
    },

    /// An object's attributes changed.
    ObjectModified {
        /// Modified object.
        id: ObjectId,
    },

    /// A free-hand path was completed.
    PathCreated {
        /// The new path object.
        id: ObjectId,
    },

    // ========== Selection ==========
    /// The selection was replaced.
    SelectionChanged {
        /// Newly selected objects.
        ids: Vec<ObjectId>,
    },

    /// The selection was emptied.
    SelectionCleared,

    // ========== Document ==========
    /// A document finished loading into the scene.
    DocumentLoaded {
        /// Number of user objects loaded.
        object_count: usize,
    },

    /// The workspace changed size.
    WorkspaceResized {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },

    /// The viewport zoom changed.
    ViewportZoomed {
        /// New zoom level.
        zoom: f64,
    },

    /// Undo/redo availability changed.
    HistoryChanged {
        /// Whether undo is possible.
        can_undo: bool,
        /// Whether redo is possible.
        can_redo: bool,
    },

    /// A guide line was dropped outside the workspace and deleted.
    GuideRemoved {
        /// Removed guide.
        id: ObjectId,
    },

    /// A plugin-defined event.
    Custom {
        /// Declared event name.
        name: String,
        /// Free-form payload.
        payload: Value,
    },
}

impl EditorEvent {
    /// Name of [`EditorEvent::ObjectAdded`].
    pub const OBJECT_ADDED: &'static str = "object:added";
    /// Name of [`EditorEvent::ObjectRemoved`].
    pub const OBJECT_REMOVED: &'static str = "object:removed";
    /// Name of [`EditorEvent::ObjectModified`].
    pub const OBJECT_MODIFIED: &'static str = "object:modified";
    /// Name of [`EditorEvent::PathCreated`].
    pub const PATH_CREATED: &'static str = "path:created";
    /// Name of [`EditorEvent::SelectionChanged`].
    pub const SELECTION_CHANGED: &'static str = "selection:changed";
    /// Name of [`EditorEvent::SelectionCleared`].
    pub const SELECTION_CLEARED: &'static str = "selection:cleared";
    /// Name of [`EditorEvent::DocumentLoaded`].
    pub const DOCUMENT_LOADED: &'static str = "document:loaded";
    /// Name of [`EditorEvent::WorkspaceResized`].
    pub const WORKSPACE_RESIZED: &'static str = "workspace:resized";
    /// Name of [`EditorEvent::ViewportZoomed`].
    pub const VIEWPORT_ZOOMED: &'static str = "viewport:zoomed";
    /// Name of [`EditorEvent::HistoryChanged`].
    pub const HISTORY_CHANGED: &'static str = "history:changed";
    /// Name of [`EditorEvent::GuideRemoved`].
    pub const GUIDE_REMOVED: &'static str = "guide:removed";

    /// Create a plugin-defined event.
    #[must_use]
    pub fn custom(name: impl Into<String>, payload: Value) -> Self {
        Self::Custom {
            name: name.into(),
            payload,
        }
    }

    /// Name used for `on`/`off` subscriptions.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ObjectAdded { .. } => Self::OBJECT_ADDED,
            Self::ObjectRemoved { .. } => Self::OBJECT_REMOVED,
            Self::ObjectModified { .. } => Self::OBJECT_MODIFIED,
            Self::PathCreated { .. } => Self::PATH_CREATED,
            Self::SelectionChanged { .. } => Self::SELECTION_CHANGED,
            Self::SelectionCleared => Self::SELECTION_CLEARED,
            Self::DocumentLoaded { .. } => Self::DOCUMENT_LOADED,
            Self::WorkspaceResized { .. } => Self::WORKSPACE_RESIZED,
            Self::ViewportZoomed { .. } => Self::VIEWPORT_ZOOMED,
            Self::HistoryChanged { .. } => Self::HISTORY_CHANGED,
            Self::GuideRemoved { .. } => Self::GUIDE_REMOVED,
            Self::Custom { name, .. } => name,
        }
    }

    /// Whether this event reports a change to the scene's objects.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::ObjectAdded { .. }
                | Self::ObjectRemoved { .. }
                | Self::ObjectModified { .. }
                | Self::PathCreated { .. }
        )
    }

    /// Whether this event reports a selection change.
    #[must_use]
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::SelectionChanged { .. } | Self::SelectionCleared)
    }

    /// The single object this event is about, if any.
    #[must_use]
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Self::ObjectAdded { id }
            | Self::ObjectRemoved { id }
            | Self::ObjectModified { id }
            | Self::PathCreated { id }
            | Self::GuideRemoved { id } => Some(id),
            _ => None,
        }
    }
}
