//! Guides plugin: draggable guide lines and the ruler overlay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use easel_core::{Cursor, ObjectId, Orientation, RenderSurface, SceneObject};
use easel_events::EditorEvent;
use easel_plugins::{
    Capability, Facade, GuideCapability, Plugin, PluginContext, PluginDescriptor, PluginError,
    PluginFactory, PluginId, PluginResult, SceneHandle,
};
use easel_workspace::{
    DragFeedback, GuideConfig, GuideDragTracker, ReleaseOutcome, Ruler, RulerLayout,
    ViewportTransform, check_guide,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{configure, parse_args, to_json, unknown_api};

/// Registered name of the guides plugin.
pub const GUIDES_PLUGIN: &str = "guides";

/// APIs the guides plugin binds on the facade.
pub const GUIDE_APIS: &[&str] = &[
    "addGuide",
    "dragGuide",
    "releaseGuide",
    "rulerLayout",
    "setRulerEnabled",
    "clearGuides",
    "outsideGuides",
];

/// Builds the [`GuidesPlugin`]. Options override guide settings.
pub struct GuidesFactory {
    surface: Arc<dyn RenderSurface>,
    config: GuideConfig,
}

impl GuidesFactory {
    /// Create a factory drawing through `surface`.
    #[must_use]
    pub fn new(surface: Arc<dyn RenderSurface>, config: GuideConfig) -> Self {
        Self { surface, config }
    }
}

impl PluginFactory for GuidesFactory {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PluginId::from_static(GUIDES_PLUGIN))
            .with_apis(GUIDE_APIS)
            .with_events(&[EditorEvent::GUIDE_REMOVED])
    }

    fn create(&self, ctx: &PluginContext, options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        let config = configure(GUIDES_PLUGIN, &self.config, options, GuideConfig::validate)?;
        let facade = ctx.facade().map(|f| Arc::downgrade(&f)).unwrap_or_default();
        Ok(Arc::new(GuidesPlugin {
            scene: ctx.scene().clone(),
            surface: Arc::clone(&self.surface),
            facade,
            config,
            tracker: GuideDragTracker::new(config),
            ruler: Mutex::new(Ruler::new(config)),
        }))
    }
}

/// Guide lines that remove themselves when dropped outside the workspace.
pub struct GuidesPlugin {
    scene: SceneHandle,
    surface: Arc<dyn RenderSurface>,
    facade: Weak<Facade>,
    config: GuideConfig,
    tracker: GuideDragTracker,
    ruler: Mutex<Ruler>,
}

#[derive(Deserialize)]
struct AddArgs {
    orientation: Orientation,
    position: f64,
}

#[derive(Deserialize)]
struct DragArgs {
    id: ObjectId,
    position: f64,
}

#[derive(Deserialize)]
struct IdArgs {
    id: ObjectId,
}

#[derive(Deserialize)]
struct EnabledArgs {
    enabled: bool,
}

impl GuidesPlugin {
    fn ruler(&self) -> MutexGuard<'_, Ruler> {
        self.ruler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn guide(&self, id: &ObjectId) -> PluginResult<SceneObject> {
        self.scene
            .get(id)
            .filter(SceneObject::is_guide)
            .ok_or_else(|| PluginError::ExecutionFailed(format!("'{id}' is not a guide line")))
    }

    fn guide_ids(&self) -> Vec<ObjectId> {
        self.scene.read(|g| {
            g.objects()
                .iter()
                .filter(|o| o.is_guide())
                .map(|o| o.id.clone())
                .collect()
        })
    }

    /// Guides are only removed on release, so a resize keeps them all and
    /// just redraws the overlay.
    fn on_workspace_resized(&self) {
        let outside = self.outside_guides();
        if !outside.is_empty() {
            debug!(outside = outside.len(), "Guides left outside the resized workspace");
        }
        self.surface.request_render();
    }

    fn viewport_transform(&self) -> ViewportTransform {
        self.facade
            .upgrade()
            .and_then(|f| f.workspace())
            .map_or(ViewportTransform::IDENTITY, |w| w.transform())
    }
}

/// Centre a guide on `position` across its axis.
fn place(guide: &mut SceneObject, position: f64) {
    match guide.axis {
        Some(Orientation::Horizontal) => {
            guide.top = position - guide.height * guide.scale_y / 2.0;
        },
        Some(Orientation::Vertical) => {
            guide.left = position - guide.width * guide.scale_x / 2.0;
        },
        None => {},
    }
}

impl Plugin for GuidesPlugin {
    fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
        let weak = Arc::downgrade(&self);
        ctx.on_each(
            &[EditorEvent::SELECTION_CHANGED, EditorEvent::SELECTION_CLEARED],
            move |_| {
                let Some(plugin) = weak.upgrade() else {
                    return;
                };
                if plugin.ruler().is_enabled() {
                    plugin.surface.request_render();
                }
            },
        );
        let weak = Arc::downgrade(&self);
        ctx.on(EditorEvent::WORKSPACE_RESIZED, move |_| {
            if let Some(plugin) = weak.upgrade() {
                plugin.on_workspace_resized();
            }
        });
        info!(
            tolerance = self.config.out_tolerance_px,
            "Guides plugin ready"
        );
        Ok(())
    }

    fn destroy(&self, _ctx: &PluginContext) {
        self.surface.set_cursor(Cursor::Default);
    }

    fn call(&self, api: &str, args: Value) -> PluginResult<Value> {
        match api {
            "addGuide" => {
                let args: AddArgs = parse_args(api, args)?;
                let id = self.add_guide(args.orientation, args.position)?;
                Ok(json!({ "id": id }))
            },
            "dragGuide" => {
                let args: DragArgs = parse_args(api, args)?;
                let feedback = self.drag_guide(&args.id, args.position)?;
                Ok(json!({
                    "out": feedback.check.is_out(),
                    "cursor": feedback.cursor,
                }))
            },
            "releaseGuide" => {
                let args: IdArgs = parse_args(api, args)?;
                to_json(api, &self.release_guide(&args.id)?)
            },
            "rulerLayout" => to_json(api, &self.ruler_layout()),
            "setRulerEnabled" => {
                let enabled = match args {
                    Value::Bool(enabled) => enabled,
                    other => parse_args::<EnabledArgs>(api, other)?.enabled,
                };
                self.set_ruler_enabled(enabled);
                Ok(json!(enabled))
            },
            "clearGuides" => Ok(json!(self.clear_guides())),
            "outsideGuides" => to_json(api, &self.outside_guides()),
            other => Err(unknown_api(GUIDES_PLUGIN, other)),
        }
    }

    fn capabilities(self: Arc<Self>) -> Vec<Capability> {
        vec![Capability::Guides(self)]
    }
}

impl GuideCapability for GuidesPlugin {
    fn add_guide(&self, orientation: Orientation, position: f64) -> PluginResult<ObjectId> {
        let guide = SceneObject::guide(
            orientation,
            position,
            self.config.length,
            self.config.thickness,
        );
        let id = self.scene.add(guide)?;
        debug!(guide = %id, %orientation, position, "Guide added");
        Ok(id)
    }

    fn drag_guide(&self, id: &ObjectId, position: f64) -> PluginResult<DragFeedback> {
        self.guide(id)?;
        self.scene.modify_silently(id, |g| place(g, position))?;
        let guide = self.guide(id)?;
        let feedback = self.tracker.on_move(&guide, &self.scene.bounds().rect());
        self.surface.set_cursor(feedback.cursor);
        self.surface.request_render();
        Ok(feedback)
    }

    fn release_guide(&self, id: &ObjectId) -> PluginResult<ReleaseOutcome> {
        let guide = self.guide(id)?;
        let outcome = self.tracker.on_release(&guide, &self.scene.bounds().rect());
        match outcome {
            ReleaseOutcome::Removed => {
                self.scene.remove(std::slice::from_ref(id));
                self.scene.bus().emit(EditorEvent::GuideRemoved { id: id.clone() });
                info!(guide = %id, "Guide dropped outside workspace, removed");
            },
            ReleaseOutcome::Kept => {
                // Commit the drag as one modification
                self.scene.modify(id, |_| {})?;
            },
        }
        self.surface.set_cursor(Cursor::Default);
        Ok(outcome)
    }

    fn ruler_layout(&self) -> Option<RulerLayout> {
        let selection = self.scene.read(easel_core::SceneGraph::selection_rect);
        self.ruler().layout_for(
            &self.viewport_transform(),
            self.surface.container_size(),
            selection.as_ref(),
        )
    }

    fn set_ruler_enabled(&self, enabled: bool) {
        self.ruler().set_enabled(enabled);
        self.surface.request_render();
    }

    fn outside_guides(&self) -> Vec<ObjectId> {
        let workspace = self.scene.bounds().rect();
        self.scene.read(|g| {
            g.objects()
                .iter()
                .filter(|o| check_guide(o, &workspace, &self.config).is_out())
                .map(|o| o.id.clone())
                .collect()
        })
    }

    fn clear_guides(&self) -> usize {
        let removed = self.scene.remove(&self.guide_ids());
        for id in &removed {
            self.scene.bus().emit(EditorEvent::GuideRemoved { id: id.clone() });
        }
        removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::{DocumentBounds, SceneGraph};
    use easel_events::EventBus;
    use easel_hooks::HookPipeline;
    use easel_plugins::PluginRegistry;
    use easel_test::{MockSurface, rect_object};

    fn setup(surface: &MockSurface) -> PluginRegistry {
        let scene = SceneHandle::new(
            SceneGraph::with_bounds(DocumentBounds::new(100.0, 200.0)),
            EventBus::new(),
        );
        let mut registry = PluginRegistry::new(scene, Arc::new(HookPipeline::new()));
        let factory = GuidesFactory::new(surface.shared(), GuideConfig::default());
        registry.register(&factory, &Value::Null).unwrap();
        registry
    }

    #[test]
    fn test_drag_out_shows_not_allowed() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        let guides = registry.facade().guides().unwrap();

        let id = guides.add_guide(Orientation::Horizontal, 50.0).unwrap();
        let inside = guides.drag_guide(&id, 150.0).unwrap();
        assert!(!inside.check.is_out());
        assert_eq!(inside.cursor, Cursor::NsResize);

        let out = guides.drag_guide(&id, 250.0).unwrap();
        assert!(out.check.is_out());
        assert_eq!(surface.last_cursor(), Some(Cursor::NotAllowed));
    }

    #[test]
    fn test_release_outside_removes_guide() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        let scene = registry.scene();
        let mut removed = scene.bus().subscribe_named(EditorEvent::GUIDE_REMOVED);
        let guides = registry.facade().guides().unwrap();

        let id = guides.add_guide(Orientation::Vertical, 50.0).unwrap();
        guides.drag_guide(&id, -20.0).unwrap();
        assert_eq!(guides.release_guide(&id).unwrap(), ReleaseOutcome::Removed);

        assert!(scene.get(&id).is_none());
        assert_eq!(*removed.try_recv().unwrap(), EditorEvent::GuideRemoved { id });
        assert_eq!(surface.last_cursor(), Some(Cursor::Default));
    }

    #[test]
    fn test_release_within_tolerance_keeps_guide() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        let guides = registry.facade().guides().unwrap();

        // Spans 200.0..201.0, just past the bottom edge
        let id = guides.add_guide(Orientation::Horizontal, 10.0).unwrap();
        guides.drag_guide(&id, 200.5).unwrap();
        assert_eq!(guides.release_guide(&id).unwrap(), ReleaseOutcome::Kept);
        assert!(registry.scene().get(&id).is_some());
    }

    #[test]
    fn test_drag_rejects_non_guides() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        registry
            .scene()
            .add(rect_object("box", 0.0, 0.0, 10.0, 10.0))
            .unwrap();

        let err = registry
            .facade()
            .invoke("dragGuide", json!({ "id": "box", "position": 5.0 }))
            .unwrap_err();
        assert!(matches!(err, PluginError::ExecutionFailed(_)));
    }

    #[test]
    fn test_clear_guides_leaves_other_objects() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        let scene = registry.scene();
        let guides = registry.facade().guides().unwrap();

        scene.add(rect_object("box", 0.0, 0.0, 10.0, 10.0)).unwrap();
        guides.add_guide(Orientation::Horizontal, 10.0).unwrap();
        guides.add_guide(Orientation::Vertical, 10.0).unwrap();

        assert_eq!(guides.clear_guides(), 2);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ruler_toggle_and_identity_fallback() {
        let surface = MockSurface::new(300.0, 100.0);
        let registry = setup(&surface);
        let facade = registry.facade();

        let layout = facade.guides().unwrap().ruler_layout().unwrap();
        assert_eq!(layout.gap, 50.0);
        assert_eq!(layout.horizontal.first().unwrap().value, 0.0);
        assert!(layout.highlight_x.is_none());

        facade.invoke("setRulerEnabled", json!(false)).unwrap();
        assert_eq!(facade.invoke("rulerLayout", Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_workspace_resize_redraws_and_keeps_guides() {
        let surface = MockSurface::new(800.0, 600.0);
        let registry = setup(&surface);
        let guides = registry.facade().guides().unwrap();
        let near = guides.add_guide(Orientation::Vertical, 20.0).unwrap();
        let far = guides.add_guide(Orientation::Vertical, 90.0).unwrap();
        assert!(guides.outside_guides().is_empty());
        let renders = surface.render_count();

        registry.scene().resize(50.0, 200.0).unwrap();

        assert_eq!(surface.render_count(), renders.saturating_add(1));
        assert_eq!(guides.outside_guides(), vec![far.clone()]);
        assert!(registry.scene().get(&near).is_some());
        assert!(registry.scene().get(&far).is_some());
        assert_eq!(
            registry.facade().invoke("outsideGuides", Value::Null).unwrap(),
            json!([far])
        );
    }
}
