//! The ordered scene graph.

use serde::{Deserialize, Serialize};

use crate::bounds::DocumentBounds;
use crate::document::SerializedDocument;
use crate::error::{CoreError, CoreResult};
use crate::geometry::Rect;
use crate::object::{ObjectId, SceneObject};

/// A copy of the user objects of a scene, in paint order.
///
/// The workspace is deliberately absent: restoring a snapshot never touches
/// the document bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    objects: Vec<SceneObject>,
}

impl SceneSnapshot {
    /// Objects captured in this snapshot.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Number of captured objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the snapshot holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Canonical JSON encoding, suitable for equality checks.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if encoding fails.
    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An entry in paint order.
#[derive(Debug, Clone, Copy)]
pub enum PaintItem<'a> {
    /// The workspace, always first.
    Workspace(&'a DocumentBounds),
    /// A user object.
    Object(&'a SceneObject),
}

/// The ordered collection of drawable objects making up a document.
///
/// The workspace is held as a typed [`DocumentBounds`] rather than as an
/// entry of the object list. It is painted first, cannot be removed, and its
/// identifier is never accepted for a user object.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    bounds: DocumentBounds,
    objects: Vec<SceneObject>,
    selection: Vec<ObjectId>,
}

impl SceneGraph {
    /// Create an empty scene with default bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with the given bounds.
    #[must_use]
    pub fn with_bounds(bounds: DocumentBounds) -> Self {
        Self {
            bounds,
            objects: Vec::new(),
            selection: Vec::new(),
        }
    }

    // ---- workspace ----

    /// The document bounds.
    #[must_use]
    pub fn bounds(&self) -> &DocumentBounds {
        &self.bounds
    }

    /// Mutable access to the document bounds.
    pub fn bounds_mut(&mut self) -> &mut DocumentBounds {
        &mut self.bounds
    }

    /// Replace the document bounds.
    pub fn set_bounds(&mut self, bounds: DocumentBounds) {
        self.bounds = bounds;
    }

    // ---- objects ----

    /// User objects in paint order, workspace excluded.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Every paintable entry, workspace first.
    pub fn paint_order(&self) -> impl Iterator<Item = PaintItem<'_>> {
        std::iter::once(PaintItem::Workspace(&self.bounds))
            .chain(self.objects.iter().map(PaintItem::Object))
    }

    /// Number of user objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether there are no user objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether a user object with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of a user object in paint order.
    #[must_use]
    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| &o.id == id)
    }

    /// Look up a user object.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    /// Look up a user object mutably.
    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// Append an object on top of the paint order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReservedId`] if the object claims the workspace
    /// id, or [`CoreError::DuplicateObject`] if the id is already taken.
    pub fn add(&mut self, object: SceneObject) -> CoreResult<()> {
        self.check_insertable(&object)?;
        self.objects.push(object);
        Ok(())
    }

    /// Insert an object at a paint position, clamped to the list length.
    ///
    /// # Errors
    ///
    /// Same as [`SceneGraph::add`].
    pub fn insert(&mut self, index: usize, object: SceneObject) -> CoreResult<()> {
        self.check_insertable(&object)?;
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        Ok(())
    }

    fn check_insertable(&self, object: &SceneObject) -> CoreResult<()> {
        if object.id.is_workspace() {
            return Err(CoreError::ReservedId(object.id.to_string()));
        }
        if self.contains(&object.id) {
            return Err(CoreError::DuplicateObject(object.id.to_string()));
        }
        Ok(())
    }

    /// Remove a user object.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReservedId`] for the workspace id and
    /// [`CoreError::ObjectNotFound`] for an unknown id.
    pub fn remove(&mut self, id: &ObjectId) -> CoreResult<SceneObject> {
        if id.is_workspace() {
            return Err(CoreError::ReservedId(id.to_string()));
        }
        let index = self
            .index_of(id)
            .ok_or_else(|| CoreError::ObjectNotFound(id.to_string()))?;
        self.selection.retain(|s| s != id);
        Ok(self.objects.remove(index))
    }

    /// Remove several objects, skipping the workspace and unknown ids.
    pub fn remove_many(&mut self, ids: &[ObjectId]) -> Vec<SceneObject> {
        ids.iter().filter_map(|id| self.remove(id).ok()).collect()
    }

    /// Remove every user object.
    pub fn clear(&mut self) -> Vec<SceneObject> {
        self.selection.clear();
        std::mem::take(&mut self.objects)
    }

    /// User objects whose bounding rectangle touches `rect`.
    #[must_use]
    pub fn objects_within(&self, rect: &Rect) -> Vec<&SceneObject> {
        self.objects
            .iter()
            .filter(|o| o.bounding_rect().intersects(rect))
            .collect()
    }

    // ---- selection ----

    /// Currently selected ids.
    #[must_use]
    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// Replace the selection.
    ///
    /// The workspace, unknown ids and non-selectable objects are dropped.
    /// Returns the ids actually selected.
    pub fn select(&mut self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut selected: Vec<ObjectId> = Vec::with_capacity(ids.len());
        for id in ids {
            if selected.contains(id) {
                continue;
            }
            if self.get(id).is_some_and(|o| o.flags.selectable) {
                selected.push(id.clone());
            }
        }
        self.selection.clone_from(&selected);
        selected
    }

    /// Clear the selection. Returns `true` if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let had = !self.selection.is_empty();
        self.selection.clear();
        had
    }

    /// Bounding rectangle of the selected objects.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection
            .iter()
            .filter_map(|id| self.get(id))
            .map(SceneObject::bounding_rect)
            .reduce(|a, b| a.union(&b))
    }

    // ---- snapshots and documents ----

    /// Capture the user objects.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.objects.clone(),
        }
    }

    /// Replace the user objects with a snapshot.
    ///
    /// The bounds are left untouched and the selection is pruned to ids that
    /// still exist.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.objects.clone_from(&snapshot.objects);
        let objects = &self.objects;
        self.selection.retain(|id| objects.iter().any(|o| &o.id == id));
    }

    /// Serialize the whole scene, workspace first.
    #[must_use]
    pub fn to_document(&self) -> SerializedDocument {
        let mut objects = Vec::with_capacity(self.objects.len().saturating_add(1));
        objects.push(self.bounds.to_object());
        objects.extend(self.objects.iter().cloned());
        SerializedDocument {
            width: self.bounds.width(),
            height: self.bounds.height(),
            objects,
            extra: serde_json::Map::new(),
        }
    }

    /// Build a scene from a serialized document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedDocument`] for invalid bounds or a
    /// duplicated workspace, and [`CoreError::DuplicateObject`] if two user
    /// objects share an id.
    pub fn from_document(document: SerializedDocument) -> CoreResult<Self> {
        let (bounds, objects) = document.into_parts()?;
        let mut scene = Self::with_bounds(bounds);
        for object in objects {
            scene.add(object)?;
        }
        Ok(scene)
    }
}
