//! Broadcast channel for committed registry changes
//!
//! The notifier publishes here only after a save or delete has committed, so
//! subscribers never see a change that was vetoed or rolled back. Publishing
//! never blocks the writer; a subscriber that falls behind by more than the
//! channel capacity skips the oldest changes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::events::{Event, EventMessage};

/// Default number of buffered changes per subscriber (`events.bus_capacity`)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out of `DomainSaved` / `DomainDeleted` events to every subscriber
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A capacity of zero is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stamp `event` with an id and time and send it; no subscribers is not an error
    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let domain_name = message.event.domain_name().to_string();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, domain_name = %domain_name, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, domain_name = %domain_name, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end handed to one subscriber; dropping it unsubscribes
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next change, skipping over any that were missed; `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev - 1, "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::with_capacity(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{DomainDeletedEvent, DomainSavedEvent};
    use crate::domain::Domain;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        let domain = Domain::new("shop.example.com").with_root_content(42);
        bus.publish(Event::DomainSaved(DomainSavedEvent::from(&domain)));

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("Timeout")
        .expect("No message");

        assert_eq!(received.event.event_type(), "domain_saved");
        assert_eq!(received.event.domain_name(), "shop.example.com");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(4);
        let domain = Domain::new("shop.example.com");
        bus.publish(Event::DomainSaved(DomainSavedEvent::from(&domain)));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_capacity_still_delivers() {
        let bus = EventBus::with_capacity(0);
        let mut subscriber = bus.subscribe();

        let domain = Domain::new("shop.example.com").with_root_content(42);
        bus.publish(Event::DomainDeleted(DomainDeletedEvent::from(&domain)));

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("Timeout")
        .expect("No message");
        assert_eq!(received.event.event_type(), "domain_deleted");
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_latest() {
        let bus = EventBus::with_capacity(1);
        let mut subscriber = bus.subscribe();

        for name in ["a.example.com", "b.example.com", "c.example.com"] {
            let domain = Domain::new(name).with_root_content(1);
            bus.publish(Event::DomainSaved(DomainSavedEvent::from(&domain)));
        }

        let received = subscriber.recv().await.expect("No message");
        assert_eq!(received.event.domain_name(), "c.example.com");
    }

    #[test]
    fn test_subscriber_count() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(_sub1);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
