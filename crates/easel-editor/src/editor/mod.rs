//! The editor host.
//!
//! Owns the scene, the bus, the hook pipeline and the plugin registry for
//! one document, and registers the built-in plugins ahead of user plugins.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use easel_core::{DocumentBounds, RenderSurface, SceneGraph, Size};
use easel_events::{EditorEvent, EventBus, SubscriberId};
use easel_history::{Suppression, SuppressionGuard};
use easel_hooks::{HookCallback, HookId, HookPipeline, HookPoint};
use easel_plugins::{
    Facade, GuideCapability, HistoryCapability, PluginError, PluginFactory, PluginId, PluginRegistry,
    RegistrationReport, SceneHandle, WorkspaceCapability,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::builtin;
use crate::error::{EditorError, EditorResult};
use crate::settings::EditorSettings;
use crate::surface::wait_until_ready;

mod document;


/// Configures and builds an [`Editor`].
pub struct EditorBuilder {
    surface: Arc<dyn RenderSurface>,
    settings: EditorSettings,
    bounds: Option<DocumentBounds>,
    plugins: Vec<(Box<dyn PluginFactory>, Value)>,
    builtins: bool,
}

impl std::fmt::Debug for EditorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuilder")
            .field("settings", &self.settings)
            .field("plugins", &self.plugins.len())
            .field("builtins", &self.builtins)
            .finish_non_exhaustive()
    }
}

impl EditorBuilder {
    /// Use these settings instead of the defaults.
    #[must_use]
    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Start from these bounds instead of the configured workspace defaults.
    #[must_use]
    pub fn with_bounds(mut self, bounds: DocumentBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Register a plugin after the built-ins.
    ///
    /// Plugins register in the order given. A failing plugin is logged and
    /// skipped.
    #[must_use]
    pub fn with_plugin(mut self, factory: impl PluginFactory + 'static, options: Value) -> Self {
        self.plugins.push((Box::new(factory), options));
        self
    }

    /// Skip the built-in workspace, history and guides plugins.
    #[must_use]
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Wait for the surface, then build the scene and register plugins.
    pub async fn build(self) -> Editor {
        let Self {
            surface,
            settings,
            bounds,
            plugins,
            builtins,
        } = self;

        let surface_ready = wait_until_ready(surface.as_ref(), &settings.surface).await;

        let bounds = bounds.unwrap_or_else(|| settings.workspace.bounds());
        let scene = SceneHandle::new(SceneGraph::with_bounds(bounds), EventBus::new());
        let hooks = Arc::new(HookPipeline::new());
        let suppression = Suppression::new();
        let mut registry = PluginRegistry::new(scene.clone(), Arc::clone(&hooks));

        let mut factories: Vec<(Box<dyn PluginFactory>, Value)> = Vec::new();
        if builtins {
            factories.extend(
                builtin::factories(&surface, &settings, &suppression)
                    .into_iter()
                    .map(|f| (f, Value::Null)),
            );
        }
        factories.extend(plugins);

        let batch: Vec<(&dyn PluginFactory, Value)> = factories
            .iter()
            .map(|(factory, options)| (factory.as_ref() as &dyn PluginFactory, options.clone()))
            .collect();
        let report = registry.register_all(batch);

        if report.is_complete() {
            info!(plugins = report.registered.len(), "Editor ready");
        } else {
            warn!(
                registered = report.registered.len(),
                failed = report.failed.len(),
                "Editor ready with unavailable plugins"
            );
        }

        Editor {
            settings,
            surface,
            scene,
            hooks,
            registry,
            suppression,
            report,
            surface_ready: AtomicBool::new(surface_ready),
            closed: false,
        }
    }
}

/// One editing session over one document.
pub struct Editor {
    pub(super) settings: EditorSettings,
    pub(super) surface: Arc<dyn RenderSurface>,
    pub(super) scene: SceneHandle,
    pub(super) hooks: Arc<HookPipeline>,
    pub(super) registry: PluginRegistry,
    pub(super) suppression: Suppression,
    report: RegistrationReport,
    surface_ready: AtomicBool,
    closed: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("scene", &self.scene)
            .field("registry", &self.registry)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Start configuring an editor drawing through `surface`.
    #[must_use]
    pub fn builder(surface: Arc<dyn RenderSurface>) -> EditorBuilder {
        EditorBuilder {
            surface,
            settings: EditorSettings::default(),
            bounds: None,
            plugins: Vec::new(),
            builtins: true,
        }
    }

    // ---- accessors ----

    /// Settings the editor was built with.
    #[must_use]
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// The shared scene.
    #[must_use]
    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }

    /// The editor bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        self.scene.bus()
    }

    /// The hook pipeline.
    #[must_use]
    pub fn hooks(&self) -> &Arc<HookPipeline> {
        &self.hooks
    }

    /// The facade every plugin API is bound on.
    #[must_use]
    pub fn facade(&self) -> &Arc<Facade> {
        self.registry.facade()
    }

    /// The plugin registry.
    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// What happened when the initial plugins registered.
    #[must_use]
    pub fn registration_report(&self) -> &RegistrationReport {
        &self.report
    }

    /// Whether the surface reported ready at the last readiness poll.
    #[must_use]
    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready.load(Ordering::Relaxed)
    }

    /// Whether [`Editor::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ---- capabilities ----

    /// History capability, if the history plugin is available.
    #[must_use]
    pub fn history(&self) -> Option<Arc<dyn HistoryCapability>> {
        self.facade().history()
    }

    /// Workspace capability, if the workspace plugin is available.
    #[must_use]
    pub fn workspace(&self) -> Option<Arc<dyn WorkspaceCapability>> {
        self.facade().workspace()
    }

    /// Guide capability, if the guides plugin is available.
    #[must_use]
    pub fn guides(&self) -> Option<Arc<dyn GuideCapability>> {
        self.facade().guides()
    }

    fn require_workspace(&self, api: &str) -> EditorResult<Arc<dyn WorkspaceCapability>> {
        self.ensure_open()?;
        self.workspace().ok_or_else(|| {
            PluginError::CapabilityUnavailable {
                api: api.to_string(),
                reason: "workspace plugin is not registered".to_string(),
            }
            .into()
        })
    }

    // ---- workspace ----

    /// Resize the document once the surface is ready, then refit.
    ///
    /// Readiness is polled as at build time. A surface that never becomes
    /// ready is logged and the resize goes ahead. Returns the fitted zoom.
    ///
    /// # Errors
    ///
    /// Fails when the workspace plugin is unavailable or a dimension is not
    /// positive.
    pub async fn set_size(&self, width: f64, height: f64) -> EditorResult<f64> {
        let workspace = self.require_workspace("setSize")?;
        self.wait_until_ready().await;
        workspace.set_size(width, height)?;
        Ok(workspace.zoom())
    }

    /// Adopt a new container size once the surface is ready, then refit.
    ///
    /// # Errors
    ///
    /// Fails when the workspace plugin is unavailable.
    pub async fn resize_container(&self, container: Size) -> EditorResult<f64> {
        let workspace = self.require_workspace("resizeContainer")?;
        self.wait_until_ready().await;
        Ok(workspace.resize_container(container))
    }

    /// Optional call: `None` when no plugin provides `api`.
    ///
    /// Plugin errors are logged and also yield `None`.
    pub fn invoke(&self, api: &str, args: Value) -> Option<Value> {
        match self.facade().try_invoke(api, args) {
            Ok(value) => value,
            Err(e) => {
                warn!(api, error = %e, "Plugin call failed");
                None
            },
        }
    }

    /// Strict call.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Plugin`] when the API is unavailable or the
    /// plugin fails, and [`EditorError::Closed`] after close.
    pub fn call(&self, api: &str, args: Value) -> EditorResult<Value> {
        self.ensure_open()?;
        Ok(self.facade().invoke(api, args)?)
    }

    // ---- plugins ----

    /// Register another plugin.
    ///
    /// # Errors
    ///
    /// Fails if the editor is closed or registration fails. A failed
    /// plugin's APIs are marked unavailable.
    pub fn use_plugin(&mut self, factory: &dyn PluginFactory, options: &Value) -> EditorResult<PluginId> {
        self.ensure_open()?;
        Ok(self.registry.register(factory, options)?)
    }

    /// Tear down one plugin by name.
    ///
    /// # Errors
    ///
    /// Fails if the name is invalid or no such plugin is registered.
    pub fn unregister(&mut self, name: &str) -> EditorResult<()> {
        let id = PluginId::new(name)?;
        Ok(self.registry.unregister(&id)?)
    }

    // ---- events and hooks ----

    /// Subscribe a handler to a named event.
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        self.bus().on(name, handler)
    }

    /// Remove a handler.
    pub fn off(&self, id: SubscriberId) -> bool {
        self.bus().off(id)
    }

    /// Register a lifecycle hook on behalf of `owner`.
    pub fn register_hook(
        &self,
        point: HookPoint,
        owner: impl Into<String>,
        callback: Arc<dyn HookCallback>,
    ) -> HookId {
        self.hooks.register(point, owner, callback)
    }

    // ---- history ----

    /// The suppression counter shared with the history plugin.
    #[must_use]
    pub fn suppression(&self) -> &Suppression {
        &self.suppression
    }

    /// Stop recording history until the guard drops.
    #[must_use = "suppression ends as soon as the guard is dropped"]
    pub fn suppress_history(&self) -> SuppressionGuard {
        self.suppression.enter()
    }

    /// Undo one step. `false` if there was nothing to undo or no history.
    pub fn undo(&self) -> bool {
        self.history().is_some_and(|h| h.undo())
    }

    /// Redo one step. `false` if there was nothing to redo or no history.
    pub fn redo(&self) -> bool {
        self.history().is_some_and(|h| h.redo())
    }

    // ---- lifecycle ----

    /// Poll the surface again.
    pub async fn wait_until_ready(&self) -> bool {
        let ready = wait_until_ready(self.surface.as_ref(), &self.settings.surface).await;
        self.surface_ready.store(ready, Ordering::Relaxed);
        ready
    }

    /// Tear down every plugin in reverse registration order.
    ///
    /// Returns how many plugins were torn down. Later calls return 0.
    pub fn close(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.closed = true;
        let count = self.registry.teardown();
        info!(plugins = count, "Editor closed");
        count
    }

    pub(super) fn ensure_open(&self) -> EditorResult<()> {
        if self.closed {
            Err(EditorError::Closed)
        } else {
            Ok(())
        }
    }
}
