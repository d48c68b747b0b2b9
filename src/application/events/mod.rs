//! Application events
//!
//! Event types are defined in `domain::events`. The synchronous, vetoing
//! notifier and the `EventBus` (broadcast channel) live here.

pub mod event_bus;
pub mod notifier;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use notifier::{
    DeleteEventArgs, DomainEventHandler, DomainNotifier, HookDecision, SaveEventArgs,
};
