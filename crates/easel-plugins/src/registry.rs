//! Plugin registry.
//!
//! Registration is all-or-nothing per plugin: a plugin whose name, API or
//! events collide, or whose construction or init fails, is rolled back and
//! its API names are marked unavailable. Other plugins are unaffected.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use easel_hooks::HookPipeline;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::context::PluginContext;
use crate::error::{PluginError, PluginResult, panic_message};
use crate::facade::Facade;
use crate::plugin::{Plugin, PluginDescriptor, PluginFactory, PluginId, PluginState};
use crate::scene::SceneHandle;

struct PluginEntry {
    descriptor: PluginDescriptor,
    plugin: Arc<dyn Plugin>,
    context: Arc<PluginContext>,
}

/// Outcome of [`PluginRegistry::register_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Plugins that are now ready, in registration order.
    pub registered: Vec<PluginId>,
    /// Plugins that failed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl RegistrationReport {
    /// Whether every plugin registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry of plugins loaded into one editor.
pub struct PluginRegistry {
    scene: SceneHandle,
    hooks: Arc<HookPipeline>,
    facade: Arc<Facade>,
    entries: Vec<PluginEntry>,
    failed: BTreeMap<String, String>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.list())
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl PluginRegistry {
    /// Create an empty registry over a scene and hook pipeline.
    #[must_use]
    pub fn new(scene: SceneHandle, hooks: Arc<HookPipeline>) -> Self {
        Self {
            scene,
            hooks,
            facade: Arc::new(Facade::new()),
            entries: Vec::new(),
            failed: BTreeMap::new(),
        }
    }

    /// The facade all plugins bind into.
    #[must_use]
    pub fn facade(&self) -> &Arc<Facade> {
        &self.facade
    }

    /// The shared scene.
    #[must_use]
    pub fn scene(&self) -> &SceneHandle {
        &self.scene
    }

    /// The hook pipeline.
    #[must_use]
    pub fn hooks(&self) -> &Arc<HookPipeline> {
        &self.hooks
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Construct, bind and initialize one plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, an API or event name collides,
    /// or the factory or init fails. Nothing the plugin contributed survives
    /// a failure.
    pub fn register(&mut self, factory: &dyn PluginFactory, options: &Value) -> PluginResult<PluginId> {
        let descriptor = factory.descriptor();
        let id = descriptor.name.clone();

        if self.contains(&id) {
            return Err(PluginError::AlreadyRegistered(id));
        }

        match self.try_register(factory, &descriptor, options) {
            Ok(entry) => {
                self.failed.remove(id.as_str());
                self.entries.push(entry);
                info!(
                    plugin = %id,
                    apis = descriptor.api_names.len(),
                    events = descriptor.event_names.len(),
                    "Registered plugin"
                );
                Ok(id)
            },
            Err(e) => {
                let reason = e.to_string();
                warn!(plugin = %id, error = %reason, "Plugin registration failed");
                self.facade.mark_unavailable(&descriptor.api_names, &reason);
                self.failed.insert(id.to_string(), reason);
                Err(e)
            },
        }
    }

    fn try_register(
        &self,
        factory: &dyn PluginFactory,
        descriptor: &PluginDescriptor,
        options: &Value,
    ) -> PluginResult<PluginEntry> {
        let id = &descriptor.name;
        let context = Arc::new(PluginContext::new(
            id.clone(),
            self.scene.clone(),
            Arc::clone(&self.hooks),
            Arc::downgrade(&self.facade),
        ));

        let plugin = match std::panic::catch_unwind(AssertUnwindSafe(|| {
            factory.create(&context, options)
        })) {
            Ok(Ok(plugin)) => plugin,
            Ok(Err(e)) => {
                context.detach_all();
                return Err(match e {
                    e @ PluginError::ConstructionFailed { .. } => e,
                    other => PluginError::ConstructionFailed {
                        plugin_id: id.to_string(),
                        message: other.to_string(),
                    },
                });
            },
            Err(panic) => {
                context.detach_all();
                return Err(PluginError::ConstructionFailed {
                    plugin_id: id.to_string(),
                    message: panic_message(panic.as_ref()),
                });
            },
        };

        let bus = self.scene.bus();
        if let Err(e) = bus.declare_events(id.as_str(), &descriptor.event_names) {
            context.detach_all();
            return Err(e.into());
        }

        if let Err(e) = self.facade.bind(id, &descriptor.api_names, &plugin) {
            bus.undeclare_events(id.as_str());
            context.detach_all();
            return Err(e);
        }

        let init = std::panic::catch_unwind(AssertUnwindSafe(|| {
            Arc::clone(&plugin).init(&context)
        }));
        let init_error = match init {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };
        if let Some(message) = init_error {
            self.rollback(id, &context);
            return Err(PluginError::InitFailed {
                plugin_id: id.clone(),
                message,
            });
        }

        for capability in Arc::clone(&plugin).capabilities() {
            self.facade.add_capability(id, capability);
        }

        Ok(PluginEntry {
            descriptor: descriptor.clone(),
            plugin,
            context,
        })
    }

    fn rollback(&self, id: &PluginId, context: &PluginContext) {
        let released = self.facade.unbind_owner(id);
        let events = self.scene.bus().undeclare_events(id.as_str());
        let detached = context.detach_all();
        debug!(
            plugin = %id,
            apis = released,
            events,
            subscriptions = detached.subscriptions,
            "Rolled back plugin registration"
        );
    }

    /// Register several plugins in order, continuing past failures.
    pub fn register_all<'a, I>(&mut self, plugins: I) -> RegistrationReport
    where
        I: IntoIterator<Item = (&'a dyn PluginFactory, Value)>,
    {
        let mut report = RegistrationReport::default();
        for (factory, options) in plugins {
            match self.register(factory, &options) {
                Ok(id) => report.registered.push(id),
                Err(e) => report
                    .failed
                    .push((factory.descriptor().name.to_string(), e.to_string())),
            }
        }
        report
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Destroy and remove one plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] if no such plugin is registered.
    pub fn unregister(&mut self, id: &PluginId) -> PluginResult<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.descriptor.name == *id)
            .ok_or_else(|| PluginError::NotFound(id.clone()))?;
        let entry = self.entries.remove(index);
        self.teardown_entry(&entry);
        info!(plugin = %id, "Unregistered plugin");
        Ok(())
    }

    fn teardown_entry(&self, entry: &PluginEntry) {
        let id = &entry.descriptor.name;
        if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(|| {
            entry.plugin.destroy(&entry.context);
        })) {
            warn!(
                plugin = %id,
                error = %panic_message(panic.as_ref()),
                "Plugin destroy panicked"
            );
        }
        self.rollback(id, &entry.context);
    }

    /// Tear down every plugin in reverse registration order.
    ///
    /// Returns the number of plugins torn down.
    pub fn teardown(&mut self) -> usize {
        let mut count = 0usize;
        while let Some(entry) = self.entries.pop() {
            self.teardown_entry(&entry);
            count = count.saturating_add(1);
        }
        if count > 0 {
            info!(count, "Plugins torn down");
        }
        count
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether a plugin with this name is ready.
    #[must_use]
    pub fn contains(&self, id: &PluginId) -> bool {
        self.entries.iter().any(|e| e.descriptor.name == *id)
    }

    /// Get a ready plugin.
    #[must_use]
    pub fn get(&self, id: &PluginId) -> Option<Arc<dyn Plugin>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == *id)
            .map(|e| Arc::clone(&e.plugin))
    }

    /// Descriptor of a ready plugin.
    #[must_use]
    pub fn descriptor(&self, id: &PluginId) -> Option<&PluginDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == *id)
            .map(|e| &e.descriptor)
    }

    /// State of the last registration attempt for `name`.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<PluginState> {
        if self.entries.iter().any(|e| e.descriptor.name.as_str() == name) {
            return Some(PluginState::Ready);
        }
        self.failed.get(name).cloned().map(PluginState::Failed)
    }

    /// Ready plugins in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<&PluginId> {
        self.entries.iter().map(|e| &e.descriptor.name).collect()
    }

    /// Failed registrations with their reasons.
    #[must_use]
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.failed
            .iter()
            .map(|(name, reason)| (name.as_str(), reason.as_str()))
            .collect()
    }

    /// Number of ready plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no plugin is ready.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for PluginRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::FnFactory;
    use easel_core::SceneGraph;
    use easel_events::EventBus;
    use serde_json::json;
    use std::sync::Mutex;

    struct Counter {
        hits: Mutex<u32>,
        order: Option<Arc<Mutex<Vec<String>>>>,
        name: &'static str,
    }

    impl Plugin for Counter {
        fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
            let me = Arc::downgrade(&self);
            ctx.on("object:added", move |_| {
                if let Some(me) = me.upgrade() {
                    let mut hits = me.hits.lock().unwrap();
                    *hits = hits.saturating_add(1);
                }
            });
            Ok(())
        }

        fn destroy(&self, _ctx: &PluginContext) {
            if let Some(order) = &self.order {
                order.lock().unwrap().push(self.name.to_string());
            }
        }

        fn call(&self, _api: &str, _args: Value) -> PluginResult<Value> {
            Ok(json!(*self.hits.lock().unwrap()))
        }
    }

    fn counter_factory(name: &'static str, api: &'static str) -> FnFactory {
        counter_factory_with_order(name, api, None)
    }

    fn counter_factory_with_order(
        name: &'static str,
        api: &'static str,
        order: Option<Arc<Mutex<Vec<String>>>>,
    ) -> FnFactory {
        FnFactory::new(
            PluginDescriptor::new(PluginId::from_static(name))
                .with_apis(&[api])
                .with_events(&[format!("{name}:changed")]),
            move |_, _| {
                Ok(Arc::new(Counter {
                    hits: Mutex::new(0),
                    order: order.clone(),
                    name,
                }) as Arc<dyn Plugin>)
            },
        )
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new(
            SceneHandle::new(SceneGraph::new(), EventBus::new()),
            Arc::new(HookPipeline::new()),
        )
    }

    #[test]
    fn test_register_binds_api_and_events() {
        let mut reg = registry();
        let id = reg.register(&counter_factory("counter", "hits"), &Value::Null).unwrap();

        assert_eq!(reg.state("counter"), Some(PluginState::Ready));
        assert!(reg.facade().has_api("hits"));
        assert!(reg.scene().bus().known_events().is_known("counter:changed"));

        reg.scene()
            .add(easel_core::SceneObject::new(easel_core::ObjectKind::Rect))
            .unwrap();
        assert_eq!(reg.facade().invoke("hits", Value::Null).unwrap(), json!(1));
        assert!(reg.contains(&id));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = registry();
        reg.register(&counter_factory("counter", "hits"), &Value::Null).unwrap();
        let err = reg
            .register(&counter_factory("counter", "other"), &Value::Null)
            .unwrap_err();
        assert!(matches!(err, PluginError::AlreadyRegistered(_)));
        assert!(!reg.facade().has_api("other"));
    }

    #[test]
    fn test_api_collision_rolls_back() {
        let mut reg = registry();
        reg.register(&counter_factory("first", "hits"), &Value::Null).unwrap();
        let err = reg
            .register(&counter_factory("second", "hits"), &Value::Null)
            .unwrap_err();
        assert!(matches!(err, PluginError::ApiCollision { .. }));
        assert!(!reg.scene().bus().known_events().is_known("second:changed"));
        assert!(matches!(reg.state("second"), Some(PluginState::Failed(_))));
        assert_eq!(reg.facade().owner_of("hits").unwrap().as_str(), "first");
    }

    #[test]
    fn test_failing_constructor_marks_api_unavailable() {
        let mut reg = registry();
        let broken = FnFactory::new(
            PluginDescriptor::new(PluginId::from_static("broken")).with_apis(&["undo"]),
            |_, _| Err(PluginError::ExecutionFailed("no canvas".into())),
        );
        let panicking = FnFactory::new(
            PluginDescriptor::new(PluginId::from_static("panicky")).with_apis(&["redo"]),
            |_, _| panic!("constructor exploded"),
        );

        let report = reg.register_all([
            (&broken as &dyn PluginFactory, Value::Null),
            (&panicking as &dyn PluginFactory, Value::Null),
            (&counter_factory("counter", "hits") as &dyn PluginFactory, Value::Null),
        ]);

        assert_eq!(report.registered.len(), 1);
        assert_eq!(report.failed.len(), 2);
        assert!(!report.is_complete());

        let err = reg.facade().invoke("undo", Value::Null).unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("no canvas"));
        let err = reg.facade().invoke("redo", Value::Null).unwrap_err();
        assert!(err.to_string().contains("constructor exploded"));
    }

    #[test]
    fn test_failing_init_releases_subscriptions() {
        struct BadInit;
        impl Plugin for BadInit {
            fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
                ctx.on("object:added", |_| {});
                Err(PluginError::ExecutionFailed("init refused".into()))
            }
            fn call(&self, _api: &str, _args: Value) -> PluginResult<Value> {
                Ok(Value::Null)
            }
        }

        let mut reg = registry();
        let factory = FnFactory::new(
            PluginDescriptor::new(PluginId::from_static("bad-init"))
                .with_apis(&["thing"])
                .with_events(&["thing:happened"]),
            |_, _| Ok(Arc::new(BadInit) as Arc<dyn Plugin>),
        );
        let err = reg.register(&factory, &Value::Null).unwrap_err();
        assert!(matches!(err, PluginError::InitFailed { .. }));
        assert_eq!(reg.scene().bus().handler_count(), 0);
        assert!(!reg.facade().has_api("thing"));
        assert!(!reg.scene().bus().known_events().is_known("thing:happened"));
    }

    #[test]
    fn test_teardown_runs_in_reverse_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut reg = registry();
        reg.register(
            &counter_factory_with_order("alpha", "a", Some(Arc::clone(&order))),
            &Value::Null,
        )
        .unwrap();
        reg.register(
            &counter_factory_with_order("beta", "b", Some(Arc::clone(&order))),
            &Value::Null,
        )
        .unwrap();

        assert_eq!(reg.teardown(), 2);
        assert_eq!(*order.lock().unwrap(), vec!["beta", "alpha"]);
        assert!(reg.facade().api_names().is_empty());
        assert_eq!(reg.scene().bus().handler_count(), 0);
    }

    #[test]
    fn test_unregister_unknown() {
        let mut reg = registry();
        let err = reg.unregister(&PluginId::from_static("ghost")).unwrap_err();
        assert!(matches!(err, PluginError::NotFound(_)));
    }
}
