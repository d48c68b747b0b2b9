pub mod events;
pub mod outcome;
pub mod site_domain;
pub mod unit_of_work;

// Re-export commonly used types
pub use outcome::{EventMessages, Notice, NoticeKind, OperationOutcome, OperationStatus};
pub use site_domain::{Domain, DomainRepository};
pub use unit_of_work::{ScopeMode, UnitOfWork, UnitOfWorkProvider};

// Re-export DomainError from support for convenience
pub use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
