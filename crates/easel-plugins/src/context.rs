//! Per-plugin view of the editor host.
//!
//! Everything a plugin subscribes or registers through its context is
//! tracked, so the host can release it all when the plugin is torn down or
//! its registration is rolled back.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use easel_events::{EditorEvent, EventBus, SubscriberId};
use easel_hooks::{FailAction, HookCallback, HookId, HookPipeline, HookPoint};
use serde_json::Value;
use tracing::debug;

use crate::error::PluginResult;
use crate::facade::Facade;
use crate::plugin::PluginId;
use crate::scene::{RemoveFilter, SceneHandle};

/// Handles a plugin receives at construction.
pub struct PluginContext {
    plugin_id: PluginId,
    scene: SceneHandle,
    hooks: Arc<HookPipeline>,
    facade: Weak<Facade>,
    subscriptions: Mutex<Vec<SubscriberId>>,
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin_id", &self.plugin_id)
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
    }
}

/// What [`PluginContext::detach_all`] released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detached {
    /// Event subscriptions removed.
    pub subscriptions: usize,
    /// Hook registrations removed.
    pub hooks: usize,
    /// Removal filters removed.
    pub filters: usize,
}

impl PluginContext {
    /// Create a context for `plugin_id`.
    #[must_use]
    pub fn new(
        plugin_id: PluginId,
        scene: SceneHandle,
        hooks: Arc<HookPipeline>,
        facade: Weak<Facade>,
    ) -> Self {
        Self {
            plugin_id,
            scene,
            hooks,
            facade,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// The owning plugin.
    #[must_use]
    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    /// The shared scene.
    #[must_use]
    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }

    /// The editor event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        self.scene.bus()
    }

    /// The editor facade, unless the editor has been dropped.
    #[must_use]
    pub fn facade(&self) -> Option<Arc<Facade>> {
        self.facade.upgrade()
    }

    /// Call another plugin's API if it is available.
    ///
    /// # Errors
    ///
    /// Passes through errors raised by the called plugin.
    pub fn try_invoke(&self, api: &str, args: Value) -> PluginResult<Option<Value>> {
        match self.facade() {
            Some(facade) => facade.try_invoke(api, args),
            None => Ok(None),
        }
    }

    // ---- events ----

    /// Subscribe to a named event. Released on teardown.
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let id = self.bus().on(name, handler);
        self.track(id);
        id
    }

    /// Subscribe to several named events with one handler.
    pub fn on_each<F>(&self, names: &[&str], handler: F) -> Vec<SubscriberId>
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        names
            .iter()
            .map(|name| {
                let handler = Arc::clone(&handler);
                self.on(*name, move |e| handler(e))
            })
            .collect()
    }

    /// Unsubscribe early.
    pub fn off(&self, id: SubscriberId) -> bool {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|s| *s != id);
        self.bus().off(id)
    }

    /// Emit an event on the editor bus.
    pub fn emit(&self, event: EditorEvent) -> usize {
        self.bus().emit(event)
    }

    fn track(&self, id: SubscriberId) {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
    }

    /// Number of live subscriptions made through this context.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // ---- hooks ----

    /// Register a lifecycle hook that warns on failure.
    pub fn hook(&self, point: HookPoint, callback: Arc<dyn HookCallback>) -> HookId {
        self.hooks.register(point, self.plugin_id.as_str(), callback)
    }

    /// Register a lifecycle hook with an explicit failure action.
    pub fn hook_with(
        &self,
        point: HookPoint,
        fail_action: FailAction,
        callback: Arc<dyn HookCallback>,
    ) -> HookId {
        self.hooks
            .register_with(point, self.plugin_id.as_str(), fail_action, callback)
    }

    // ---- removal filters ----

    /// Install a removal filter. Released on teardown.
    pub fn add_remove_filter(&self, filter: RemoveFilter) {
        self.scene.add_remove_filter(self.plugin_id.as_str(), filter);
    }

    /// Release every subscription, hook and filter made through this
    /// context.
    pub fn detach_all(&self) -> Detached {
        let ids: Vec<SubscriberId> = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let subscriptions = ids.into_iter().filter(|id| self.bus().off(*id)).count();
        let hooks = self.hooks.unregister_owner(self.plugin_id.as_str());
        let filters = self.scene.remove_filters_of(self.plugin_id.as_str());
        let detached = Detached {
            subscriptions,
            hooks,
            filters,
        };
        debug!(
            plugin = %self.plugin_id,
            subscriptions,
            hooks,
            filters,
            "Plugin context detached"
        );
        detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::SceneGraph;
    use easel_hooks::{FnHook, HookPayload};

    fn context() -> PluginContext {
        let scene = SceneHandle::new(SceneGraph::new(), EventBus::new());
        PluginContext::new(
            PluginId::from_static("probe"),
            scene,
            Arc::new(HookPipeline::new()),
            Weak::new(),
        )
    }

    #[test]
    fn test_detach_releases_everything() {
        let ctx = context();
        ctx.on("object:added", |_| {});
        ctx.on_each(&["object:removed", "object:modified"], |_| {});
        ctx.hook(
            HookPoint::AfterImport,
            Arc::new(FnHook::new("noop", |_: &mut HookPayload| Ok(()))),
        );
        ctx.add_remove_filter(Arc::new(|ids| ids));

        assert_eq!(ctx.bus().handler_count(), 3);
        let detached = ctx.detach_all();
        assert_eq!(
            detached,
            Detached {
                subscriptions: 3,
                hooks: 1,
                filters: 1
            }
        );
        assert_eq!(ctx.bus().handler_count(), 0);
        assert_eq!(ctx.subscription_count(), 0);
        assert_eq!(ctx.scene().filter_count(), 0);
    }

    #[test]
    fn test_off_untracks() {
        let ctx = context();
        let id = ctx.on("object:added", |_| {});
        assert!(ctx.off(id));
        assert_eq!(ctx.detach_all().subscriptions, 0);
    }

    #[test]
    fn test_dropped_facade_makes_calls_optional() {
        let ctx = context();
        assert!(ctx.facade().is_none());
        assert_eq!(ctx.try_invoke("undo", Value::Null).unwrap(), None);
    }
}
