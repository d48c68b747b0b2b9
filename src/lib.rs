//! # Domain Registry
//!
//! Manages hostname-to-content "domain" records for a content-management
//! system, with cancelable save/delete notifications.
//!
//! ## Architecture
//!
//! - **domain**: the `Domain` entity, repository and unit-of-work traits,
//!   operation outcomes and event types
//! - **application**: `DomainService` facade, the vetoing notifier and the
//!   broadcast event bus
//! - **infrastructure**: SeaORM/SQLite and in-memory unit-of-work providers
//! - **support**: errors and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::{
    create_event_bus, DomainEventHandler, DomainNotifier, DomainService, EventBus,
    HookDecision, SharedEventBus,
};
pub use domain::{Domain, DomainError, DomainResult, OperationOutcome, OperationStatus};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryUnitOfWorkProvider,
    SeaOrmUnitOfWorkProvider,
};
