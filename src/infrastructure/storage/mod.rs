//! Storage backends that need no database

pub mod memory;

pub use memory::{InMemoryStore, InMemoryUnitOfWorkProvider};
