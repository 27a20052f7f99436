use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use triton_core::{EventTag, MarketEvent};

/// A synchronous event consumer
///
/// Listeners receive events on the publisher's call stack, so `on_event`
/// must not block and must not publish back into the bus for the same tag
/// it is handling.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &MarketEvent);
}

/// Tag-keyed synchronous publish/subscribe dispatcher
///
/// Listeners are registered per [`EventTag`] and invoked in registration
/// order. Publishing is not buffered or reordered: when `publish` returns,
/// every listener for the event's tag has run.
pub struct EventBus {
    listeners: RwLock<HashMap<EventTag, Vec<Arc<dyn EventListener>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener for a tag
    ///
    /// The same listener may be registered for several tags; registering it
    /// twice for one tag makes it fire twice.
    pub fn add_listener(&self, tag: EventTag, listener: Arc<dyn EventListener>) {
        self.listeners.write().entry(tag).or_default().push(listener);
    }

    /// Remove a listener previously registered for a tag
    ///
    /// Identity is the `Arc` allocation, so the caller must pass a clone of
    /// the original handle. Removing an unknown listener is a no-op.
    pub fn remove_listener(&self, tag: EventTag, listener: &Arc<dyn EventListener>) {
        let mut listeners = self.listeners.write();
        if let Some(registered) = listeners.get_mut(&tag) {
            registered.retain(|l| !Arc::ptr_eq(l, listener));
            if registered.is_empty() {
                listeners.remove(&tag);
            }
        }
    }

    /// Number of listeners registered for a tag
    pub fn listener_count(&self, tag: EventTag) -> usize {
        self.listeners.read().get(&tag).map_or(0, Vec::len)
    }

    /// Invoke all listeners registered for the event's tag, synchronously,
    /// in registration order
    ///
    /// The listener list is snapshotted before dispatch, so listeners may
    /// add or remove listeners without deadlocking; such changes take effect
    /// from the next publish.
    pub fn publish(&self, event: &MarketEvent) {
        let snapshot: Vec<Arc<dyn EventListener>> = {
            let listeners = self.listeners.read();
            match listeners.get(&event.tag()) {
                Some(registered) => registered.clone(),
                None => return,
            }
        };
        tracing::trace!(tag = ?event.tag(), listeners = snapshot.len(), "publishing event");
        for listener in snapshot {
            listener.on_event(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use parking_lot::Mutex;
    use triton_core::{BookUpdateEvent, MarketId};

    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
        name: &'static str,
        shared: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventListener for Recorder {
        fn on_event(&self, _event: &MarketEvent) {
            self.seen.lock().push(self.name);
            self.shared.lock().push(self.name);
        }
    }

    fn book_event() -> MarketEvent {
        MarketEvent::BookDiff(BookUpdateEvent {
            market: MarketId::new("binance"),
            trading_pair: "BTC-USDT".parse().unwrap(),
            update_id: 1,
            timestamp: Utc::now(),
        })
    }

    fn recorder(name: &'static str, shared: Arc<Mutex<Vec<&'static str>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            name,
            shared,
        })
    }

    #[test]
    fn test_publish_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = recorder("first", order.clone());
        let second = recorder("second", order.clone());
        bus.add_listener(EventTag::BookDiff, first);
        bus.add_listener(EventTag::BookDiff, second);

        bus.publish(&book_event());
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_publish_routes_by_tag() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let listener = recorder("diff-only", order.clone());
        bus.add_listener(EventTag::OrderFilled, listener);

        // Listener is registered for fills, not book diffs
        bus.publish(&book_event());
        assert!(order.lock().is_empty());
    }

    #[test]
    fn test_remove_listener() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let listener = recorder("gone", order.clone());
        let handle: Arc<dyn EventListener> = listener;
        bus.add_listener(EventTag::BookDiff, handle.clone());
        assert_eq!(bus.listener_count(EventTag::BookDiff), 1);

        bus.remove_listener(EventTag::BookDiff, &handle);
        assert_eq!(bus.listener_count(EventTag::BookDiff), 0);

        bus.publish(&book_event());
        assert!(order.lock().is_empty());
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let handle: Arc<dyn EventListener> = recorder("never-added", order);
        bus.remove_listener(EventTag::BookDiff, &handle);
    }
}
