//! Shared, event-emitting access to the scene graph.
//!
//! Every mutation goes through [`SceneHandle`] so the matching
//! [`EditorEvent`] fires after the lock is released. Handlers are therefore
//! free to read or mutate the scene again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use easel_core::{DocumentBounds, ObjectId, SceneGraph, SceneObject, SceneSnapshot, SerializedDocument};
use easel_events::{EditorEvent, EventBus};
use tracing::debug;

use crate::error::PluginResult;

/// Narrows a removal target set before anything is removed.
pub type RemoveFilter = Arc<dyn Fn(Vec<ObjectId>) -> Vec<ObjectId> + Send + Sync>;

struct FilterEntry {
    owner: String,
    filter: RemoveFilter,
}

/// Cloneable handle to the scene graph and the bus that reports on it.
#[derive(Clone)]
pub struct SceneHandle {
    graph: Arc<Mutex<SceneGraph>>,
    bus: EventBus,
    filters: Arc<RwLock<Vec<FilterEntry>>>,
}

impl std::fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneHandle")
            .field("objects", &self.read(SceneGraph::len))
            .field("remove_filters", &self.filter_count())
            .finish_non_exhaustive()
    }
}

impl SceneHandle {
    /// Wrap a scene graph.
    #[must_use]
    pub fn new(graph: SceneGraph, bus: EventBus) -> Self {
        Self {
            graph: Arc::new(Mutex::new(graph)),
            bus,
            filters: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The bus scene events are emitted on.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, SceneGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read-only closure against the graph.
    pub fn read<R>(&self, f: impl FnOnce(&SceneGraph) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the graph without emitting any event.
    ///
    /// Used for undo/redo restores and interactive drag steps that must not
    /// be recorded.
    pub fn update_silently<R>(&self, f: impl FnOnce(&mut SceneGraph) -> R) -> R {
        f(&mut self.lock())
    }

    // ---- queries ----

    /// Capture the user objects.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.read(SceneGraph::snapshot)
    }

    /// Current document bounds.
    #[must_use]
    pub fn bounds(&self) -> DocumentBounds {
        self.read(|g| g.bounds().clone())
    }

    /// Serialize the scene, workspace first.
    #[must_use]
    pub fn to_document(&self) -> SerializedDocument {
        self.read(SceneGraph::to_document)
    }

    /// Clone one object.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<SceneObject> {
        self.read(|g| g.get(id).cloned())
    }

    /// Number of user objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(SceneGraph::len)
    }

    /// Whether there are no user objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(SceneGraph::is_empty)
    }

    /// Currently selected ids.
    #[must_use]
    pub fn selection(&self) -> Vec<ObjectId> {
        self.read(|g| g.selection().to_vec())
    }

    // ---- mutations ----

    /// Add an object and emit `object:added`.
    ///
    /// # Errors
    ///
    /// Fails for the reserved workspace id or a duplicate id.
    pub fn add(&self, object: SceneObject) -> PluginResult<ObjectId> {
        let id = object.id.clone();
        self.lock().add(object)?;
        self.bus.emit(EditorEvent::ObjectAdded { id: id.clone() });
        Ok(id)
    }

    /// Add a freehand path and emit `path:created`.
    ///
    /// # Errors
    ///
    /// Same as [`SceneHandle::add`].
    pub fn add_path(&self, object: SceneObject) -> PluginResult<ObjectId> {
        let id = object.id.clone();
        self.lock().add(object)?;
        self.bus.emit(EditorEvent::PathCreated { id: id.clone() });
        Ok(id)
    }

    /// Modify an object in place and emit `object:modified`.
    ///
    /// The object's id cannot be changed this way.
    ///
    /// # Errors
    ///
    /// Returns a scene error if the object does not exist.
    pub fn modify(&self, id: &ObjectId, f: impl FnOnce(&mut SceneObject)) -> PluginResult<()> {
        self.modify_silently(id, f)?;
        self.bus.emit(EditorEvent::ObjectModified { id: id.clone() });
        Ok(())
    }

    /// Modify an object without emitting an event.
    ///
    /// # Errors
    ///
    /// Returns a scene error if the object does not exist.
    pub fn modify_silently(
        &self,
        id: &ObjectId,
        f: impl FnOnce(&mut SceneObject),
    ) -> PluginResult<()> {
        let mut graph = self.lock();
        let object = graph
            .get_mut(id)
            .ok_or_else(|| easel_core::CoreError::ObjectNotFound(id.to_string()))?;
        f(object);
        object.id = id.clone();
        Ok(())
    }

    /// Remove objects after running the removal filters.
    ///
    /// Emits `object:removed` for each object actually removed and returns
    /// their ids. The workspace is never removed.
    pub fn remove(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let targets = self.apply_filters(ids.to_vec());
        let removed: Vec<ObjectId> = self
            .lock()
            .remove_many(&targets)
            .into_iter()
            .map(|o| o.id)
            .collect();
        for id in &removed {
            self.bus.emit(EditorEvent::ObjectRemoved { id: id.clone() });
        }
        removed
    }

    /// Remove the current selection.
    pub fn remove_selected(&self) -> Vec<ObjectId> {
        let selected = self.selection();
        self.remove(&selected)
    }

    /// Remove every user object the filters let through.
    pub fn clear(&self) -> Vec<ObjectId> {
        let all: Vec<ObjectId> = self.read(|g| g.objects().iter().map(|o| o.id.clone()).collect());
        self.remove(&all)
    }

    /// Replace the selection.
    ///
    /// Emits `selection:changed` with the ids actually selected, or
    /// `selection:cleared` if none remain.
    pub fn select(&self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let selected = self.lock().select(ids);
        if selected.is_empty() {
            self.bus.emit(EditorEvent::SelectionCleared);
        } else {
            self.bus.emit(EditorEvent::SelectionChanged {
                ids: selected.clone(),
            });
        }
        selected
    }

    /// Clear the selection. Emits `selection:cleared` if anything was
    /// selected.
    pub fn clear_selection(&self) -> bool {
        let had = self.lock().clear_selection();
        if had {
            self.bus.emit(EditorEvent::SelectionCleared);
        }
        had
    }

    /// Resize the document and emit `workspace:resized`.
    ///
    /// # Errors
    ///
    /// Returns a scene error for non-positive dimensions.
    pub fn resize(&self, width: f64, height: f64) -> PluginResult<()> {
        self.lock().bounds_mut().resize(width, height)?;
        self.bus
            .emit(EditorEvent::WorkspaceResized { width, height });
        Ok(())
    }

    /// Replace the whole scene with a loaded document.
    ///
    /// Emits `object:added` for every loaded object, then
    /// `document:loaded`.
    ///
    /// # Errors
    ///
    /// Fails without touching the current scene if two objects share an id
    /// or one claims the workspace id.
    pub fn replace(&self, bounds: DocumentBounds, objects: Vec<SceneObject>) -> PluginResult<()> {
        let mut graph = SceneGraph::with_bounds(bounds);
        for object in objects {
            graph.add(object)?;
        }
        let ids: Vec<ObjectId> = graph.objects().iter().map(|o| o.id.clone()).collect();
        *self.lock() = graph;

        for id in &ids {
            self.bus.emit(EditorEvent::ObjectAdded { id: id.clone() });
        }
        self.bus.emit(EditorEvent::DocumentLoaded {
            object_count: ids.len(),
        });
        Ok(())
    }

    /// Restore a snapshot without emitting scene events.
    pub fn restore(&self, snapshot: &SceneSnapshot) {
        self.update_silently(|g| g.restore(snapshot));
    }

    // ---- removal filters ----

    /// Install a removal filter owned by `owner`.
    pub fn add_remove_filter(&self, owner: impl Into<String>, filter: RemoveFilter) {
        let owner = owner.into();
        debug!(owner = %owner, "Remove filter installed");
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FilterEntry { owner, filter });
    }

    /// Drop every filter installed by `owner`. Returns how many were removed.
    pub fn remove_filters_of(&self, owner: &str) -> usize {
        let mut filters = self.filters.write().unwrap_or_else(PoisonError::into_inner);
        let before = filters.len();
        filters.retain(|f| f.owner != owner);
        before.saturating_sub(filters.len())
    }

    /// Number of installed removal filters.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn apply_filters(&self, ids: Vec<ObjectId>) -> Vec<ObjectId> {
        let filters: Vec<RemoveFilter> = self
            .filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|f| Arc::clone(&f.filter))
            .collect();
        filters.iter().fold(ids, |ids, filter| filter(ids))
    }
}
