//! Easel Plugins - Plugin host and capability facade.
//!
//! This crate provides:
//! - [`PluginRegistry`]: constructs plugins from factories, binds their APIs
//!   into the [`Facade`] and declares their events, rolling back any plugin
//!   whose registration fails
//! - [`Facade`]: one merged, name-keyed API surface with optional-call
//!   semantics, plus typed [`Capability`] accessors
//! - [`PluginContext`]: a plugin's tracked access to the scene, bus and hook
//!   pipeline
//! - [`SceneHandle`]: shared scene access that emits events after each
//!   mutation and runs removal filters
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use easel_core::SceneGraph;
//! use easel_events::EventBus;
//! use easel_hooks::HookPipeline;
//! use easel_plugins::prelude::*;
//! use serde_json::{Value, json};
//!
//! struct Hello;
//!
//! impl Plugin for Hello {
//!     fn call(&self, _api: &str, _args: Value) -> PluginResult<Value> {
//!         Ok(json!("hello"))
//!     }
//! }
//!
//! let scene = SceneHandle::new(SceneGraph::new(), EventBus::new());
//! let mut registry = PluginRegistry::new(scene, Arc::new(HookPipeline::new()));
//! let factory = FnFactory::new(
//!     PluginDescriptor::new(PluginId::from_static("hello")).with_apis(&["greet"]),
//!     |_, _| Ok(Arc::new(Hello) as Arc<dyn Plugin>),
//! );
//! registry.register(&factory, &Value::Null).unwrap();
//!
//! assert_eq!(registry.facade().invoke("greet", Value::Null).unwrap(), json!("hello"));
//! assert_eq!(registry.facade().try_invoke("undo", Value::Null).unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod capability;
pub mod context;
pub mod error;
pub mod facade;
pub mod plugin;
pub mod registry;
pub mod scene;

pub use capability::{Capability, GuideCapability, HistoryCapability, WorkspaceCapability};
pub use context::{Detached, PluginContext};
pub use error::{PluginError, PluginResult};
pub use facade::Facade;
pub use plugin::{FnFactory, Plugin, PluginDescriptor, PluginFactory, PluginId, PluginState};
pub use registry::{PluginRegistry, RegistrationReport};
pub use scene::{RemoveFilter, SceneHandle};
