//! Cancelable save/delete notifications
//!
//! Listeners are registered on an explicitly constructed [`DomainNotifier`]
//! that the service receives at construction. "Before" hooks may veto the
//! operation; "after" hooks only observe it. All hooks run inline on the
//! caller's task.

use std::sync::Arc;

use tracing::{debug, warn};

use super::event_bus::SharedEventBus;
use crate::domain::events::{DomainDeletedEvent, DomainSavedEvent, Event};
use crate::domain::{Domain, EventMessages};

/// Answer of a "before" hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookDecision {
    #[default]
    Proceed,
    Cancel,
}

impl HookDecision {
    pub fn is_cancel(self) -> bool {
        matches!(self, HookDecision::Cancel)
    }
}

/// Arguments of `saving` / `saved`
pub struct SaveEventArgs<'a> {
    pub domain: &'a Domain,
    pub messages: &'a EventMessages,
}

/// Arguments of `deleting` / `deleted`
pub struct DeleteEventArgs<'a> {
    pub domain: &'a Domain,
    pub messages: &'a EventMessages,
}

/// Listener for registry mutations. Every hook defaults to a no-op.
pub trait DomainEventHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn saving(&self, _args: &SaveEventArgs<'_>) -> HookDecision {
        HookDecision::Proceed
    }

    fn saved(&self, _args: &SaveEventArgs<'_>) {}

    fn deleting(&self, _args: &DeleteEventArgs<'_>) -> HookDecision {
        HookDecision::Proceed
    }

    fn deleted(&self, _args: &DeleteEventArgs<'_>) {}
}

/// Ordered set of listeners, optionally bridged to an [`EventBus`](super::EventBus).
#[derive(Default, Clone)]
pub struct DomainNotifier {
    handlers: Vec<Arc<dyn DomainEventHandler>>,
    bus: Option<SharedEventBus>,
}

impl DomainNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also publish committed changes on `bus`
    pub fn with_event_bus(mut self, bus: SharedEventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn subscribe(&mut self, handler: Arc<dyn DomainEventHandler>) {
        debug!(handler = handler.name(), "Domain event handler registered");
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when a listener vetoed the save
    pub fn dispatch_saving(&self, domain: &Domain, messages: &EventMessages) -> bool {
        let args = SaveEventArgs { domain, messages };
        for handler in &self.handlers {
            if handler.saving(&args).is_cancel() {
                warn!(
                    handler = handler.name(),
                    domain = %domain.name,
                    "Domain save cancelled by listener"
                );
                return true;
            }
        }
        false
    }

    pub fn dispatch_saved(&self, domain: &Domain, messages: &EventMessages) {
        let args = SaveEventArgs { domain, messages };
        for handler in &self.handlers {
            handler.saved(&args);
        }
        if let Some(bus) = &self.bus {
            bus.publish(Event::DomainSaved(DomainSavedEvent::from(domain)));
        }
    }

    /// Returns `true` when a listener vetoed the delete
    pub fn dispatch_deleting(&self, domain: &Domain, messages: &EventMessages) -> bool {
        let args = DeleteEventArgs { domain, messages };
        for handler in &self.handlers {
            if handler.deleting(&args).is_cancel() {
                warn!(
                    handler = handler.name(),
                    domain = %domain.name,
                    "Domain delete cancelled by listener"
                );
                return true;
            }
        }
        false
    }

    pub fn dispatch_deleted(&self, domain: &Domain, messages: &EventMessages) {
        let args = DeleteEventArgs { domain, messages };
        for handler in &self.handlers {
            handler.deleted(&args);
        }
        if let Some(bus) = &self.bus {
            bus.publish(Event::DomainDeleted(DomainDeletedEvent::from(domain)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::events::EventBus;
    use crate::domain::{Notice, NoticeKind};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl DomainEventHandler for Counting {
        fn saving(&self, _args: &SaveEventArgs<'_>) -> HookDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            HookDecision::Proceed
        }
    }

    struct Veto;

    impl DomainEventHandler for Veto {
        fn saving(&self, args: &SaveEventArgs<'_>) -> HookDecision {
            args.messages
                .add(Notice::new("domains", "read-only host", NoticeKind::Warning));
            HookDecision::Cancel
        }
    }

    #[test]
    fn veto_stops_dispatch_at_first_cancel() {
        let first = Arc::new(Counting::default());
        let last = Arc::new(Counting::default());

        let mut notifier = DomainNotifier::new();
        notifier.subscribe(first.clone());
        notifier.subscribe(Arc::new(Veto));
        notifier.subscribe(last.clone());

        let messages = EventMessages::new();
        let domain = Domain::new("shop.example.com");
        assert!(notifier.dispatch_saving(&domain, &messages));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.calls.load(Ordering::SeqCst), 0);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn default_hooks_never_cancel() {
        let mut notifier = DomainNotifier::new();
        notifier.subscribe(Arc::new(Counting::default()));
        let domain = Domain::new("shop.example.com");
        assert!(!notifier.dispatch_deleting(&domain, &EventMessages::new()));
        assert_eq!(notifier.handler_count(), 1);
    }

    #[tokio::test]
    async fn after_hooks_publish_to_bus() {
        let bus = Arc::new(EventBus::with_capacity(8));
        let mut sub = bus.subscribe();
        let notifier = DomainNotifier::new().with_event_bus(bus);

        let domain = Domain::new("gone.example.com");
        notifier.dispatch_deleted(&domain, &EventMessages::new());

        let msg = tokio::time::timeout(std::time::Duration::from_millis(100), sub.recv())
            .await
            .expect("Timeout")
            .expect("No message");
        assert_eq!(msg.event.event_type(), "domain_deleted");
    }
}
