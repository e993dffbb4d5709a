//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_plugins::prelude::*;` to import all essential types.

// Errors
pub use crate::{PluginError, PluginResult};

// Plugins
pub use crate::{FnFactory, Plugin, PluginDescriptor, PluginFactory, PluginId, PluginState};

// Host
pub use crate::{Facade, PluginContext, PluginRegistry, RegistrationReport, SceneHandle};

// Capabilities
pub use crate::{Capability, GuideCapability, HistoryCapability, WorkspaceCapability};
