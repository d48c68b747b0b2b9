//! Database repository implementations
//!
//! SeaORM domain repository + the unit-of-work provider that hands it out.

pub mod domain_repository;
pub mod unit_of_work;

pub use domain_repository::SeaOrmDomainRepository;
pub use unit_of_work::SeaOrmUnitOfWorkProvider;
