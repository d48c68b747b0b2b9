//! Domain events
//!
//! Event types that represent facts about what happened in the registry.
//! The EventBus implementation lives in `application::events`.

pub mod types;

pub use types::{DomainDeletedEvent, DomainSavedEvent, Event, EventMessage};
