//! Domain aggregate
//!
//! Hostname-to-content mappings used for multi-site routing.

pub mod model;
pub mod repository;

pub use model::{filter_wildcards, validate_name, Domain, MAX_NAME_LENGTH, WILDCARD_PREFIX};
pub use repository::DomainRepository;
