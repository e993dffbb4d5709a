//! Prelude module - commonly used types for convenient import.
//!
//! Use `use easel_events::prelude::*;` to import all essential types.

// Event bus
pub use crate::{DEFAULT_CHANNEL_CAPACITY, EventBus, EventReceiver};

// Events
pub use crate::{EditorEvent, KnownEvents, SCENE_EVENTS};

// Subscriber system
pub use crate::{EventFilter, EventHandler, SubscriberId, SubscriberRegistry};

// Errors
pub use crate::{EventError, EventResult};
