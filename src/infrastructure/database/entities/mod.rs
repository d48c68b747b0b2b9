//! Database entities module

pub mod domain;

pub use domain::Entity as DomainEntity;
