//! Workspace plugin: document bounds, viewport and clip region.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use easel_core::{ObjectId, Point, Rect, RenderSurface, Size};
use easel_events::EditorEvent;
use easel_hooks::{FnHook, HookPoint};
use easel_plugins::{
    Capability, Plugin, PluginContext, PluginDescriptor, PluginFactory, PluginId,
    PluginResult, SceneHandle, WorkspaceCapability,
};
use easel_workspace::{Viewport, ViewportConfig, ViewportTransform, enforce_protection, filter_removal};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{configure, parse_args, to_json, unknown_api};

/// Registered name of the workspace plugin.
pub const WORKSPACE_PLUGIN: &str = "workspace";

/// APIs the workspace plugin binds on the facade.
pub const WORKSPACE_APIS: &[&str] = &[
    "setSize",
    "getSize",
    "zoomIn",
    "zoomOut",
    "zoomToFit",
    "zoomToOne",
    "setZoom",
    "zoomToPoint",
    "panBy",
    "getZoom",
    "getTransform",
    "resizeContainer",
    "clipRegion",
];

/// Builds the [`WorkspacePlugin`].
///
/// Options are viewport settings (`fit_ratio`, `min_zoom`, ...) overriding
/// the editor's.
pub struct WorkspaceFactory {
    surface: Arc<dyn RenderSurface>,
    config: ViewportConfig,
}

impl WorkspaceFactory {
    /// Create a factory drawing through `surface`.
    #[must_use]
    pub fn new(surface: Arc<dyn RenderSurface>, config: ViewportConfig) -> Self {
        Self { surface, config }
    }
}

impl PluginFactory for WorkspaceFactory {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PluginId::from_static(WORKSPACE_PLUGIN))
            .with_apis(WORKSPACE_APIS)
            .with_events(&[EditorEvent::WORKSPACE_RESIZED, EditorEvent::VIEWPORT_ZOOMED])
    }

    fn create(&self, ctx: &PluginContext, options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        let config = configure(WORKSPACE_PLUGIN, &self.config, options, ViewportConfig::validate)?;
        let container = self.surface.container_size();
        Ok(Arc::new(WorkspacePlugin {
            scene: ctx.scene().clone(),
            surface: Arc::clone(&self.surface),
            viewport: Mutex::new(Viewport::new(config, container)),
        }))
    }
}

/// Keeps the workspace protected and the viewport fitted.
///
/// Re-asserts protection on every selection, add and removal event, drops
/// the workspace from every removal, and re-fits after imports and before
/// saves so saved coordinates are canonical.
pub struct WorkspacePlugin {
    scene: SceneHandle,
    surface: Arc<dyn RenderSurface>,
    viewport: Mutex<Viewport>,
}

#[derive(Deserialize)]
struct ZoomArgs {
    zoom: f64,
}

#[derive(Deserialize)]
struct ZoomToPointArgs {
    x: f64,
    y: f64,
    zoom: f64,
}

#[derive(Deserialize)]
struct PanArgs {
    dx: f64,
    dy: f64,
}

impl WorkspacePlugin {
    fn viewport(&self) -> MutexGuard<'_, Viewport> {
        self.viewport.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reassert(&self) {
        self.scene.update_silently(enforce_protection);
    }

    fn fit(&self) -> f64 {
        let size = self.scene.bounds().size();
        let transform = self.viewport().zoom_to_fit(size);
        self.present(transform)
    }

    /// Push a transform and the workspace clip to the surface.
    fn present(&self, transform: ViewportTransform) -> f64 {
        let zoom = transform.zoom();
        self.surface.set_viewport_transform(transform.to_matrix());
        self.surface.set_clip_region(Some(self.clip_region()));
        self.surface.request_render();
        self.scene.bus().emit(EditorEvent::ViewportZoomed { zoom });
        zoom
    }
}

impl Plugin for WorkspacePlugin {
    fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
        self.reassert();

        let weak = Arc::downgrade(&self);
        ctx.on_each(
            &[
                EditorEvent::SELECTION_CHANGED,
                EditorEvent::SELECTION_CLEARED,
                EditorEvent::OBJECT_ADDED,
                EditorEvent::OBJECT_REMOVED,
            ],
            move |_| {
                if let Some(plugin) = weak.upgrade() {
                    plugin.reassert();
                }
            },
        );

        let weak = Arc::downgrade(&self);
        ctx.on(EditorEvent::HISTORY_CHANGED, move |_| {
            if let Some(plugin) = weak.upgrade() {
                plugin.surface.request_render();
            }
        });

        ctx.add_remove_filter(Arc::new(|ids: Vec<ObjectId>| filter_removal(&ids)));

        let weak = Arc::downgrade(&self);
        ctx.hook(
            HookPoint::AfterImport,
            Arc::new(FnHook::new("workspace:refit-after-import", move |_| {
                if let Some(plugin) = weak.upgrade() {
                    plugin.reassert();
                    plugin.fit();
                }
                Ok(())
            })),
        );

        let weak = Arc::downgrade(&self);
        ctx.hook(
            HookPoint::AfterSave,
            Arc::new(FnHook::new("workspace:fit-before-capture", move |_| {
                if let Some(plugin) = weak.upgrade() {
                    plugin.fit();
                }
                Ok(())
            })),
        );

        self.surface.set_dimensions(self.viewport().container());
        let zoom = self.fit();
        info!(zoom, "Workspace plugin ready");
        Ok(())
    }

    fn destroy(&self, _ctx: &PluginContext) {
        self.surface.set_clip_region(None);
    }

    fn call(&self, api: &str, args: Value) -> PluginResult<Value> {
        match api {
            "setSize" => {
                let size: Size = parse_args(api, args)?;
                self.set_size(size.width, size.height)?;
                to_json(api, &self.size())
            },
            "getSize" => to_json(api, &self.size()),
            "zoomIn" => Ok(json!(self.zoom_in())),
            "zoomOut" => Ok(json!(self.zoom_out())),
            "zoomToFit" => Ok(json!(self.zoom_to_fit())),
            "zoomToOne" => Ok(json!(self.zoom_to_one())),
            "setZoom" => {
                let zoom = match args {
                    Value::Number(_) => parse_args::<f64>(api, args)?,
                    other => parse_args::<ZoomArgs>(api, other)?.zoom,
                };
                Ok(json!(self.set_zoom(zoom)))
            },
            "zoomToPoint" => {
                let ZoomToPointArgs { x, y, zoom } = parse_args(api, args)?;
                Ok(json!(self.zoom_to_point(Point::new(x, y), zoom)))
            },
            "panBy" => {
                let PanArgs { dx, dy } = parse_args(api, args)?;
                to_json(api, &self.pan_by(dx, dy))
            },
            "getZoom" => Ok(json!(WorkspaceCapability::zoom(self))),
            "getTransform" => to_json(api, &self.transform()),
            "resizeContainer" => {
                let size: Size = parse_args(api, args)?;
                Ok(json!(self.resize_container(size)))
            },
            "clipRegion" => to_json(api, &self.clip_region()),
            other => Err(unknown_api(WORKSPACE_PLUGIN, other)),
        }
    }

    fn capabilities(self: Arc<Self>) -> Vec<Capability> {
        vec![Capability::Workspace(self)]
    }
}

impl WorkspaceCapability for WorkspacePlugin {
    fn set_size(&self, width: f64, height: f64) -> PluginResult<()> {
        self.scene.resize(width, height)?;
        let container = self.surface.container_size();
        self.viewport().set_container(container);
        self.surface.set_dimensions(container);
        debug!(width, height, "Workspace resized");
        self.fit();
        Ok(())
    }

    fn size(&self) -> Size {
        self.scene.bounds().size()
    }

    fn zoom_in(&self) -> f64 {
        let transform = self.viewport().zoom_in();
        self.present(transform)
    }

    fn zoom_out(&self) -> f64 {
        let transform = self.viewport().zoom_out();
        self.present(transform)
    }

    fn zoom_to_fit(&self) -> f64 {
        self.fit()
    }

    fn zoom_to_one(&self) -> f64 {
        let size = self.size();
        let transform = self.viewport().zoom_to_one(size);
        self.present(transform)
    }

    fn set_zoom(&self, zoom: f64) -> f64 {
        let transform = self.viewport().set_zoom(zoom);
        self.present(transform)
    }

    fn zoom_to_point(&self, screen_point: Point, zoom: f64) -> f64 {
        let transform = self.viewport().zoom_to_point(screen_point, zoom);
        self.present(transform)
    }

    fn pan_by(&self, dx: f64, dy: f64) -> ViewportTransform {
        let transform = self.viewport().pan_by(dx, dy);
        self.present(transform);
        transform
    }

    fn zoom(&self) -> f64 {
        self.viewport().zoom()
    }

    fn transform(&self) -> ViewportTransform {
        self.viewport().transform()
    }

    fn resize_container(&self, container: Size) -> f64 {
        self.viewport().set_container(container);
        self.surface.set_dimensions(container);
        self.fit()
    }

    fn clip_region(&self) -> Rect {
        self.scene.bounds().rect()
    }
}
