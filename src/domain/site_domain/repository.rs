//! Domain repository interface

use async_trait::async_trait;

use super::model::Domain;
use crate::domain::DomainResult;

/// Persistence for domain records, bound to one open unit of work.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn exists(&self, name: &str) -> DomainResult<bool>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Domain>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Domain>>;
    async fn find_all(&self, include_wildcards: bool) -> DomainResult<Vec<Domain>>;
    async fn find_assigned(
        &self,
        content_id: i32,
        include_wildcards: bool,
    ) -> DomainResult<Vec<Domain>>;
    /// Insert when `domain.id == 0`, update otherwise. Id and timestamps are
    /// written back into `domain`.
    async fn save(&self, domain: &mut Domain) -> DomainResult<()>;
    async fn delete(&self, domain: &Domain) -> DomainResult<()>;
}
