//! Plugin factories for registration tests.

use std::sync::Arc;

use easel_plugins::{
    Plugin, PluginContext, PluginDescriptor, PluginError, PluginFactory, PluginId, PluginResult,
};
use serde_json::{Value, json};

/// A plugin whose every API returns `{ "api": name, "args": args }`.
#[derive(Debug, Clone)]
pub struct EchoPluginFactory {
    descriptor: PluginDescriptor,
}

impl EchoPluginFactory {
    /// Create a factory for plugin `name` exposing `apis`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid plugin id.
    #[must_use]
    pub fn new(name: &str, apis: &[&str]) -> Self {
        let id = PluginId::new(name).expect("fixture plugin name must be valid");
        Self {
            descriptor: PluginDescriptor::new(id).with_apis(apis),
        }
    }

    /// Also declare `events`.
    #[must_use]
    pub fn with_events(mut self, events: &[&str]) -> Self {
        self.descriptor = self.descriptor.with_events(events);
        self
    }
}

struct EchoPlugin;

impl Plugin for EchoPlugin {
    fn call(&self, api: &str, args: Value) -> PluginResult<Value> {
        Ok(json!({ "api": api, "args": args }))
    }
}

impl PluginFactory for EchoPluginFactory {
    fn descriptor(&self) -> PluginDescriptor {
        self.descriptor.clone()
    }

    fn create(&self, _ctx: &PluginContext, _options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        Ok(Arc::new(EchoPlugin))
    }
}

/// Where a [`FailingPluginFactory`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// `create` returns an error.
    Construct,
    /// `create` panics.
    Panic,
    /// `create` succeeds and `init` returns an error.
    Init,
}

/// A factory that fails in a chosen way.
#[derive(Debug, Clone)]
pub struct FailingPluginFactory {
    descriptor: PluginDescriptor,
    mode: FailureMode,
}

impl FailingPluginFactory {
    /// Create a failing factory for plugin `name` declaring `apis`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid plugin id.
    #[must_use]
    pub fn new(name: &str, apis: &[&str], mode: FailureMode) -> Self {
        let id = PluginId::new(name).expect("fixture plugin name must be valid");
        Self {
            descriptor: PluginDescriptor::new(id).with_apis(apis),
            mode,
        }
    }
}

struct InitFailsPlugin;

impl Plugin for InitFailsPlugin {
    fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
        Err(PluginError::InitFailed {
            plugin_id: ctx.plugin_id().clone(),
            message: "font service offline".into(),
        })
    }

    fn call(&self, api: &str, _args: Value) -> PluginResult<Value> {
        Err(PluginError::ExecutionFailed(format!("{api} called on a failed plugin")))
    }
}

impl PluginFactory for FailingPluginFactory {
    fn descriptor(&self) -> PluginDescriptor {
        self.descriptor.clone()
    }

    fn create(&self, _ctx: &PluginContext, _options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        match self.mode {
            FailureMode::Construct => Err(PluginError::ConstructionFailed {
                plugin_id: self.descriptor.name.to_string(),
                message: "missing required option".into(),
            }),
            FailureMode::Panic => panic!("{} exploded during construction", self.descriptor.name),
            FailureMode::Init => Ok(Arc::new(InitFailsPlugin)),
        }
    }
}
