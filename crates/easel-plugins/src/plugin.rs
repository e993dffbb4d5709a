//! Plugin trait, factories and identity types.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::Capability;
use crate::context::PluginContext;
use crate::error::{PluginError, PluginResult};

/// Unique, human-readable plugin name.
///
/// Names are non-empty and use lowercase alphanumerics and hyphens, for
/// example `"workspace"` or `"snap-to-grid"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PluginId(String);

impl<'de> Deserialize<'de> for PluginId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl PluginId {
    /// Create a new `PluginId`, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidId`] if the name is empty, contains
    /// characters outside `[a-z0-9-]`, or starts or ends with a hyphen.
    pub fn new(id: impl Into<String>) -> PluginResult<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a `PluginId` without validation (for tests and built-ins).
    #[must_use]
    pub fn from_static(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> PluginResult<()> {
        if id.is_empty() {
            return Err(PluginError::InvalidId("plugin name must not be empty".into()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(PluginError::InvalidId(format!(
                "plugin name must contain only lowercase alphanumeric characters and hyphens, got: {id}"
            )));
        }
        if id.starts_with('-') || id.ends_with('-') {
            return Err(PluginError::InvalidId(format!(
                "plugin name must not start or end with a hyphen, got: {id}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum PluginState {
    /// Constructed, initialized and serving its API.
    Ready,
    /// Construction or init failed; the plugin contributes nothing.
    Failed(String),
}

impl PluginState {
    /// Whether the plugin is serving its API.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Static description of what a plugin contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    /// Unique plugin name.
    pub name: PluginId,
    /// API names merged into the facade.
    #[serde(default)]
    pub api_names: Vec<String>,
    /// Event names added to the known-event registry.
    #[serde(default)]
    pub event_names: Vec<String>,
}

impl PluginDescriptor {
    /// Describe a plugin with no APIs and no events.
    #[must_use]
    pub fn new(name: PluginId) -> Self {
        Self {
            name,
            api_names: Vec::new(),
            event_names: Vec::new(),
        }
    }

    /// Set the contributed API names.
    #[must_use]
    pub fn with_apis<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.api_names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Set the contributed event names.
    #[must_use]
    pub fn with_events<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.event_names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }
}

/// A constructed plugin instance.
///
/// Handlers that need the plugin itself should capture a `Weak` taken from
/// the `Arc` passed to [`Plugin::init`].
pub trait Plugin: Send + Sync {
    /// Post-construction hook, called once the plugin's APIs are bound.
    ///
    /// # Errors
    ///
    /// An error rolls the registration back.
    fn init(self: Arc<Self>, ctx: &PluginContext) -> PluginResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Teardown hook. Subscriptions and hooks made through the context are
    /// released by the host afterwards.
    fn destroy(&self, ctx: &PluginContext) {
        let _ = ctx;
    }

    /// Serve one of the plugin's declared API methods.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidArguments`] for malformed arguments and
    /// any error raised by the operation itself.
    fn call(&self, api: &str, args: Value) -> PluginResult<Value>;

    /// Typed capabilities published alongside the string-keyed API.
    fn capabilities(self: Arc<Self>) -> Vec<Capability> {
        Vec::new()
    }
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin").finish_non_exhaustive()
    }
}

/// Constructs a plugin from the scene context and its options.
pub trait PluginFactory: Send + Sync {
    /// Name and contributions of the plugin this factory builds.
    fn descriptor(&self) -> PluginDescriptor;

    /// Build the plugin.
    ///
    /// # Errors
    ///
    /// A failure marks the plugin's APIs unavailable; other plugins are
    /// unaffected.
    fn create(&self, ctx: &PluginContext, options: &Value) -> PluginResult<Arc<dyn Plugin>>;
}

type CreateFn =
    dyn Fn(&PluginContext, &Value) -> PluginResult<Arc<dyn Plugin>> + Send + Sync + 'static;

/// A [`PluginFactory`] backed by a closure.
pub struct FnFactory {
    descriptor: PluginDescriptor,
    create: Box<CreateFn>,
}

impl FnFactory {
    /// Wrap a constructor closure.
    pub fn new<F>(descriptor: PluginDescriptor, create: F) -> Self
    where
        F: Fn(&PluginContext, &Value) -> PluginResult<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            create: Box::new(create),
        }
    }
}

impl fmt::Debug for FnFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl PluginFactory for FnFactory {
    fn descriptor(&self) -> PluginDescriptor {
        self.descriptor.clone()
    }

    fn create(&self, ctx: &PluginContext, options: &Value) -> PluginResult<Arc<dyn Plugin>> {
        (self.create)(ctx, options)
    }
}
