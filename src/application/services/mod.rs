//! Application services

mod domain_service;

pub use domain_service::DomainService;
