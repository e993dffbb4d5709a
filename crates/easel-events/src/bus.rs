//! Event bus for broadcasting editor events to subscribers.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::error::EventResult;
use crate::event::{EditorEvent, SCENE_EVENTS};
use crate::known::KnownEvents;
use crate::subscriber::{EventFilter, EventHandler, SubscriberId, SubscriberRegistry};

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Owner recorded for the events the scene graph emits itself.
pub const SCENE_OWNER: &str = "scene";

/// Event bus shared by every plugin of one editing session.
///
/// Synchronous handlers registered with [`EventBus::on`] run immediately on
/// the emitting thread, in registration order. Async consumers can take a
/// broadcast [`EventReceiver`] with [`EventBus::subscribe`].
///
/// **WARNING:** Handlers are shared across clones. A handler that captures a
/// cloned `EventBus` creates an `Arc` cycle; capture a `Weak` or clear the
/// bus on teardown.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<Arc<EditorEvent>>,
    registry: Arc<SubscriberRegistry>,
    known: Arc<KnownEvents>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with specified capacity.
    ///
    /// Scene events are declared up front under [`SCENE_OWNER`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let known = KnownEvents::new();
        // Fresh registry, no collision possible
        let _ = known.declare(SCENE_OWNER, SCENE_EVENTS);
        Self {
            sender,
            registry: Arc::new(SubscriberRegistry::new()),
            known: Arc::new(known),
            capacity,
        }
    }

    /// Emit an event.
    ///
    /// Synchronous handlers run before this returns. Returns the number of
    /// async receivers that got the event.
    pub fn emit(&self, event: EditorEvent) -> usize {
        if !self.known.is_known(event.name()) {
            debug!(event = %event.name(), "Emitting undeclared event");
        }

        let event = Arc::new(event);
        trace!(event = %event.name(), "Emitting event");

        let count = if let Ok(c) = self.sender.send(Arc::clone(&event)) {
            trace!(event = %event.name(), receiver_count = c, "Event broadcast");
            c
        } else {
            // No receivers - this is fine
            0
        };

        self.registry.notify(&event);
        count
    }

    /// Subscribe a handler to events with the given name.
    pub fn on<F>(&self, name: impl Into<String>, handler: F) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let name = name.into();
        if !self.known.is_known(&name) {
            debug!(event = %name, "Subscribing to undeclared event");
        }
        self.registry
            .register(EventFilter::Named(name), Arc::new(handler))
    }

    /// Subscribe a handler to every event.
    pub fn on_any<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        self.registry.register(EventFilter::Any, Arc::new(handler))
    }

    /// Subscribe a pre-built handler.
    pub fn on_filtered(&self, filter: EventFilter, handler: EventHandler) -> SubscriberId {
        self.registry.register(filter, handler)
    }

    /// Remove a handler. Returns `true` if it was subscribed.
    pub fn off(&self, id: SubscriberId) -> bool {
        self.registry.unregister(id)
    }

    /// Declare event names contributed by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if another owner already declared one of the names.
    pub fn declare_events<S: AsRef<str>>(&self, owner: &str, names: &[S]) -> EventResult<()> {
        self.known.declare(owner, names)
    }

    /// Forget every event name declared by `owner`.
    pub fn undeclare_events(&self, owner: &str) -> usize {
        self.known.undeclare_owner(owner)
    }

    /// The known-event registry.
    #[must_use]
    pub fn known_events(&self) -> &KnownEvents {
        &self.known
    }

    /// Take a broadcast receiver for every emitted event.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver::new(self.sender.subscribe(), None)
    }

    /// Take a broadcast receiver for events with one name.
    #[must_use]
    pub fn subscribe_named(&self, name: impl Into<String>) -> EventReceiver {
        EventReceiver::new(self.sender.subscribe(), Some(name.into()))
    }

    /// Number of synchronous handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Current number of subscribers, both async and synchronous.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .receiver_count()
            .saturating_add(self.registry.len())
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every synchronous handler.
    pub fn clear(&self) {
        self.registry.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            registry: Arc::clone(&self.registry),
            known: Arc::clone(&self.known),
            capacity: self.capacity,
        }
    }
}

/// Receiver for events from the event bus.
pub struct EventReceiver {
    receiver: broadcast::Receiver<Arc<EditorEvent>>,
    name: Option<String>,
}

impl EventReceiver {
    fn new(receiver: broadcast::Receiver<Arc<EditorEvent>>, name: Option<String>) -> Self {
        Self { receiver, name }
    }

    fn matches(&self, event: &EditorEvent) -> bool {
        self.name.as_deref().is_none_or(|name| event.name() == name)
    }

    /// Receive the next matching event.
    ///
    /// Returns `None` once the bus is gone. Lagged events are skipped with a
    /// warning.
    pub async fn recv(&mut self) -> Option<Arc<EditorEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(event);
                    }
                },
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "Event receiver lagged, events dropped");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive the next matching event without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<EditorEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(event);
                    }
                },
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(skipped = count, "Event receiver lagged, events dropped");
                },
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
