pub mod errors;
pub mod logging;

pub use errors::{AppError, DomainError, InfraError};
pub use logging::init_tracing;
