//! Easel Events - Event bus for the Easel editor core.
//!
//! This crate provides:
//! - Event types for scene, selection, workspace and history changes
//! - A synchronous `on`/`off` subscriber registry
//! - Broadcast receivers for async consumers
//! - A registry of declared event names and their owners
//!
//! # Architecture
//!
//! Events are emitted on an [`EventBus`]. Synchronous handlers subscribed with
//! [`EventBus::on`] run in registration order before `emit` returns; a
//! panicking handler is logged and skipped. Async consumers call
//! [`EventBus::subscribe`] for an [`EventReceiver`].
//!
//! Plugins declare the events they contribute with
//! [`EventBus::declare_events`]; two owners can never declare the same name.
//!
//! # Example
//!
//! ```rust
//! use easel_events::{EditorEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let id = bus.on(EditorEvent::SELECTION_CLEARED, |event| {
//!     assert_eq!(event.name(), "selection:cleared");
//! });
//!
//! bus.emit(EditorEvent::SelectionCleared);
//! assert!(bus.off(id));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod error;
mod event;
mod known;
mod subscriber;

pub use bus::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver, SCENE_OWNER};
pub use error::{EventError, EventResult};
pub use event::{EditorEvent, SCENE_EVENTS};
pub use known::KnownEvents;
pub use subscriber::{EventFilter, EventHandler, SubscriberId, SubscriberRegistry};
