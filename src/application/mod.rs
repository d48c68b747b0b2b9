pub mod events;
pub mod services;

// Re-export key types for convenience
pub use events::{
    create_event_bus, DomainEventHandler, DomainNotifier, EventBus, EventSubscriber,
    HookDecision, SharedEventBus,
};
pub use services::DomainService;
