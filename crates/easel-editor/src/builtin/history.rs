//! History plugin: records scene mutations and replays them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use easel_events::EditorEvent;
use easel_history::{History, RecordOutcome, Suppression};
use easel_plugins::{
    Capability, HistoryCapability, Plugin, PluginContext, PluginDescriptor, PluginError,
    PluginFactory, PluginId, PluginResult, SceneHandle,
};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::unknown_api;

/// Registered name of the history plugin.
pub const HISTORY_PLUGIN: &str = "history";

/// APIs the history plugin binds on the facade.
pub const HISTORY_APIS: &[&str] = &[
    "undo",
    "redo",
    "canUndo",
    "canRedo",
    "clearHistory",
    "historyLength",
];

const RECORDED_EVENTS: &[&str] = &[
    EditorEvent::OBJECT_ADDED,
    EditorEvent::OBJECT_REMOVED,
    EditorEvent::OBJECT_MODIFIED,
    EditorEvent::PATH_CREATED,
];

/// Builds the [`HistoryPlugin`].
///
/// Accepts `{"maxEntries": n}` as options.
pub struct HistoryFactory {
    max_entries: usize,
    suppression: Suppression,
}

impl HistoryFactory {
    /// Create a factory whose history shares `suppression` with the editor.
    #[must_use]
    pub fn new(max_entries: usize, suppression: Suppression) -> Self {
        Self {
            max_entries,
            suppression,
        }
    }
}

impl PluginFactory for HistoryFactory {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PluginId::from_static(HISTORY_PLUGIN))
            .with_apis(HISTORY_APIS)
            .with_events(&[EditorEvent::HISTORY_CHANGED])
    }

    fn create(&self, ctx: &PluginContext, options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        let max_entries = match options.get("maxEntries") {
            None => self.max_entries,
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| PluginError::ConstructionFailed {
                    plugin_id: HISTORY_PLUGIN.to_string(),
                    message: format!("maxEntries must be a positive integer, got {value}"),
                })?,
        };

        let scene = ctx.scene().clone();
        let history = History::new(max_entries)
            .with_baseline(scene.snapshot())
            .with_suppression(self.suppression.clone());
        Ok(Arc::new(HistoryPlugin {
            scene,
            history: Mutex::new(history),
        }))
    }
}

/// Snapshot-based undo/redo over the shared scene.
///
/// One entry per mutation event. Undo and redo restore snapshots silently
/// so replaying never records.
pub struct HistoryPlugin {
    scene: SceneHandle,
    history: Mutex<History>,
}

impl HistoryPlugin {
    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_mutation(&self, event: &EditorEvent) {
        if event.target().is_some_and(easel_core::ObjectId::is_workspace) {
            return;
        }
        if self.history().is_suppressed() {
            return;
        }

        let snapshot = self.scene.snapshot();
        let outcome = self.history().record(snapshot, event.name());
        if matches!(outcome, RecordOutcome::Recorded(_)) {
            self.announce();
        }
    }

    fn announce(&self) {
        let (can_undo, can_redo) = {
            let history = self.history();
            (history.can_undo(), history.can_redo())
        };
        self.scene
            .bus()
            .emit(EditorEvent::HistoryChanged { can_undo, can_redo });
    }

    fn lengths(&self) -> (usize, usize) {
        let history = self.history();
        (history.undo_len(), history.redo_len())
    }
}

impl Plugin for HistoryPlugin {
    fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
        let weak = Arc::downgrade(&self);
        ctx.on_each(RECORDED_EVENTS, move |event| {
            if let Some(plugin) = weak.upgrade() {
                plugin.on_mutation(event);
            }
        });
        info!(max_entries = self.history().max_entries(), "History plugin ready");
        Ok(())
    }

    fn call(&self, api: &str, _args: Value) -> PluginResult<Value> {
        match api {
            "undo" => Ok(json!(self.undo())),
            "redo" => Ok(json!(self.redo())),
            "canUndo" => Ok(json!(self.can_undo())),
            "canRedo" => Ok(json!(self.can_redo())),
            "clearHistory" => {
                self.clear();
                Ok(Value::Null)
            },
            "historyLength" => {
                let (undo, redo) = self.lengths();
                Ok(json!({ "undo": undo, "redo": redo }))
            },
            other => Err(unknown_api(HISTORY_PLUGIN, other)),
        }
    }

    fn capabilities(self: Arc<Self>) -> Vec<Capability> {
        vec![Capability::History(self)]
    }
}

impl HistoryCapability for HistoryPlugin {
    fn undo(&self) -> bool {
        let Some(snapshot) = self.history().undo() else {
            return false;
        };
        self.scene.restore(&snapshot);
        debug!(objects = snapshot.len(), "Undo applied");
        self.announce();
        true
    }

    fn redo(&self) -> bool {
        let Some(snapshot) = self.history().redo() else {
            return false;
        };
        self.scene.restore(&snapshot);
        debug!(objects = snapshot.len(), "Redo applied");
        self.announce();
        true
    }

    fn can_undo(&self) -> bool {
        self.history().can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history().can_redo()
    }

    fn clear(&self) {
        // The stored current state may predate a suppressed load.
        let baseline = self.scene.snapshot();
        self.history().reset(baseline);
        self.announce();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::{DocumentBounds, ObjectId, SceneGraph};
    use easel_events::EventBus;
    use easel_hooks::HookPipeline;
    use easel_plugins::PluginRegistry;
    use easel_test::rect_object;

    fn setup(suppression: &Suppression) -> PluginRegistry {
        let scene = SceneHandle::new(
            SceneGraph::with_bounds(DocumentBounds::new(900.0, 1200.0)),
            EventBus::new(),
        );
        let mut registry = PluginRegistry::new(scene, Arc::new(HookPipeline::new()));
        let factory = HistoryFactory::new(10, suppression.clone());
        registry.register(&factory, &Value::Null).unwrap();
        registry
    }

    fn ids(scene: &SceneHandle) -> Vec<String> {
        scene.read(|g| g.objects().iter().map(|o| o.id.to_string()).collect())
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let registry = setup(&Suppression::new());
        let scene = registry.scene();
        let history = registry.facade().history().unwrap();

        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.add(rect_object("b", 5.0, 5.0, 10.0, 10.0)).unwrap();
        let after = scene.snapshot().to_json_string().unwrap();

        assert!(history.undo());
        assert_eq!(ids(scene), vec!["a"]);
        assert!(history.undo());
        assert!(scene.is_empty());
        assert!(!history.undo());

        assert!(history.redo());
        assert!(history.redo());
        assert_eq!(scene.snapshot().to_json_string().unwrap(), after);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_suppressed_mutations_are_not_recorded() {
        let suppression = Suppression::new();
        let registry = setup(&suppression);
        let scene = registry.scene();

        let guard = suppression.enter();
        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        drop(guard);

        assert!(!registry.facade().history().unwrap().can_undo());
        scene.add(rect_object("b", 0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(registry.facade().history().unwrap().can_undo());
    }

    #[test]
    fn test_new_mutation_drops_redo() {
        let registry = setup(&Suppression::new());
        let scene = registry.scene();
        let history = registry.facade().history().unwrap();

        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(history.undo());
        assert!(history.can_redo());

        scene.add(rect_object("b", 0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(!history.can_redo());
    }

    #[test]
    fn test_each_removed_object_is_an_entry() {
        let registry = setup(&Suppression::new());
        let scene = registry.scene();
        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        scene.add(rect_object("b", 0.0, 0.0, 10.0, 10.0)).unwrap();

        scene.remove(&[ObjectId::new("a").unwrap(), ObjectId::new("b").unwrap()]);
        let length = registry.facade().invoke("historyLength", Value::Null).unwrap();
        assert_eq!(length, json!({ "undo": 4, "redo": 0 }));
    }

    #[test]
    fn test_clear_adopts_current_scene() {
        let suppression = Suppression::new();
        let registry = setup(&suppression);
        let scene = registry.scene();
        let history = registry.facade().history().unwrap();

        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        {
            let _guard = suppression.enter();
            scene.add(rect_object("b", 0.0, 0.0, 10.0, 10.0)).unwrap();
        }
        history.clear();
        assert!(!history.can_undo());

        scene.add(rect_object("c", 0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(history.undo());
        assert_eq!(ids(scene), vec!["a", "b"]);
    }

    #[test]
    fn test_history_changed_announced() {
        let registry = setup(&Suppression::new());
        let scene = registry.scene();
        let mut events = scene.bus().subscribe_named(EditorEvent::HISTORY_CHANGED);

        scene.add(rect_object("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
        let event = events.try_recv().unwrap();
        assert_eq!(
            *event,
            EditorEvent::HistoryChanged {
                can_undo: true,
                can_redo: false
            }
        );
    }

    #[test]
    fn test_invalid_max_entries_fails_construction() {
        let scene = SceneHandle::new(SceneGraph::new(), EventBus::new());
        let mut registry = PluginRegistry::new(scene, Arc::new(HookPipeline::new()));
        let factory = HistoryFactory::new(10, Suppression::new());
        let err = registry
            .register(&factory, &json!({ "maxEntries": 0 }))
            .unwrap_err();
        assert!(matches!(err, PluginError::ConstructionFailed { .. }));
        assert!(registry.facade().invoke("undo", Value::Null).unwrap_err().is_unavailable());
    }
}
