//! Synchronous subscriber registry.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::event::EditorEvent;

/// Handler invoked synchronously for each matching event.
pub type EventHandler = Arc<dyn Fn(&EditorEvent) + Send + Sync>;

/// Registration handle for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which events a subscriber receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Events with exactly this name.
    Named(String),
    /// Every event.
    Any,
}

impl EventFilter {
    /// Whether the filter accepts the event.
    #[must_use]
    pub fn accepts(&self, event: &EditorEvent) -> bool {
        match self {
            Self::Named(name) => event.name() == name,
            Self::Any => true,
        }
    }
}

struct Subscription {
    id: SubscriberId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Ordered registry of synchronous subscribers.
///
/// Subscribers are notified in registration order. The list is copied before
/// notifying, so handlers may subscribe, unsubscribe or publish re-entrantly.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<Vec<Subscription>>,
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscriber_count", &self.len())
            .finish()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events matching `filter`.
    pub fn register(&self, filter: EventFilter, handler: EventHandler) -> SubscriberId {
        let id = SubscriberId::new();
        debug!(subscriber_id = %id, filter = ?filter, "Subscriber registered");
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                id,
                filter,
                handler,
            });
        id
    }

    /// Unregister a subscriber. Returns `true` if it was registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        if removed {
            debug!(subscriber_id = %id, "Subscriber unregistered");
        }
        removed
    }

    /// Notify every matching subscriber, in registration order.
    ///
    /// A panicking handler is logged and skipped; later handlers still run.
    pub fn notify(&self, event: &EditorEvent) {
        let targets: Vec<(SubscriberId, EventHandler)> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.filter.accepts(event))
            .map(|s| (s.id, Arc::clone(&s.handler)))
            .collect();

        for (id, handler) in targets {
            trace!(subscriber_id = %id, event = %event.name(), "Notifying subscriber");

            // Catch panics to prevent one subscriber from affecting others
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(event);
            }));

            if let Err(e) = result {
                warn!(
                    subscriber_id = %id,
                    event = %event.name(),
                    error = ?e,
                    "Subscriber panicked"
                );
            }
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("All subscribers cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(count: &Arc<AtomicUsize>) -> EventHandler {
        let count = Arc::clone(count);
        Arc::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_named_filter() {
        let registry = SubscriberRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.register(
            EventFilter::Named(EditorEvent::SELECTION_CLEARED.into()),
            counter(&count),
        );

        registry.notify(&EditorEvent::SelectionCleared);
        registry.notify(&EditorEvent::ViewportZoomed { zoom: 2.0 });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notification_order_is_registration_order() {
        let registry = SubscriberRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for label in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            registry.register(
                EventFilter::Any,
                Arc::new(move |_| seen.lock().unwrap().push(label)),
            );
        }
        registry.notify(&EditorEvent::SelectionCleared);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unregister() {
        let registry = SubscriberRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = registry.register(EventFilter::Any, counter(&count));
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        registry.notify(&EditorEvent::SelectionCleared);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let registry = SubscriberRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.register(EventFilter::Any, Arc::new(|_| panic!("boom")));
        registry.register(EventFilter::Any, counter(&count));

        registry.notify(&EditorEvent::SelectionCleared);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_unsubscribe() {
        let registry = Arc::new(SubscriberRegistry::new());
        let slot: Arc<Mutex<Option<SubscriberId>>> = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&registry);
        let handler_slot = Arc::clone(&slot);
        let id = registry.register(
            EventFilter::Any,
            Arc::new(move |_| {
                let id = *handler_slot.lock().unwrap();
                if let (Some(reg), Some(id)) = (weak.upgrade(), id) {
                    reg.unregister(id);
                }
            }),
        );
        *slot.lock().unwrap() = Some(id);

        registry.notify(&EditorEvent::SelectionCleared);
        assert!(registry.is_empty());
    }
}
