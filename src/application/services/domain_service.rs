//! Domain registry service
//!
//! Every call runs in its own unit of work. Saves and deletes go through
//! the notifier: a veto in `saving`/`deleting` still commits the (empty)
//! scope and returns `Cancelled`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::events::DomainNotifier;
use crate::domain::{
    Domain, DomainResult, EventMessages, OperationOutcome, ScopeMode, UnitOfWorkProvider,
};

/// Service for domain registry operations
pub struct DomainService {
    uow: Arc<dyn UnitOfWorkProvider>,
    notifier: DomainNotifier,
}

impl DomainService {
    pub fn new(uow: Arc<dyn UnitOfWorkProvider>, notifier: DomainNotifier) -> Self {
        Self { uow, notifier }
    }

    /// True iff a domain with exactly this name exists
    pub async fn exists(&self, name: &str) -> DomainResult<bool> {
        let uow = self.uow.begin(ScopeMode::ReadOnly).await?;
        let exists = uow.domains().exists(name).await?;
        debug!(name, exists, "Domain existence checked");
        Ok(exists)
    }

    pub async fn get_by_name(&self, name: &str) -> DomainResult<Option<Domain>> {
        let uow = self.uow.begin(ScopeMode::ReadOnly).await?;
        let found = uow.domains().find_by_name(name).await?;
        Ok(found)
    }

    pub async fn get_by_id(&self, id: i32) -> DomainResult<Option<Domain>> {
        let uow = self.uow.begin(ScopeMode::ReadOnly).await?;
        let found = uow.domains().find_by_id(id).await?;
        Ok(found)
    }

    pub async fn get_all(&self, include_wildcards: bool) -> DomainResult<Vec<Domain>> {
        let uow = self.uow.begin(ScopeMode::ReadOnly).await?;
        let domains = uow.domains().find_all(include_wildcards).await?;
        Ok(domains)
    }

    /// Domains owned by `content_id`
    pub async fn get_assigned_domains(
        &self,
        content_id: i32,
        include_wildcards: bool,
    ) -> DomainResult<Vec<Domain>> {
        let uow = self.uow.begin(ScopeMode::ReadOnly).await?;
        let domains = uow
            .domains()
            .find_assigned(content_id, include_wildcards)
            .await?;
        Ok(domains)
    }

    /// Insert or update `domain`; its id and timestamps are refreshed on success.
    /// On error `domain` is left as it was passed in.
    pub async fn save(&self, domain: &mut Domain) -> DomainResult<OperationOutcome> {
        let messages = EventMessages::new();
        let uow = self.uow.begin(ScopeMode::ReadWrite).await?;

        if self.notifier.dispatch_saving(domain, &messages) {
            uow.commit().await?;
            return Ok(OperationOutcome::cancelled(messages));
        }

        let mut staged = domain.clone();
        uow.domains().save(&mut staged).await?;
        uow.commit().await?;
        *domain = staged;

        info!(id = domain.id, name = %domain.name, "Domain saved");
        self.notifier.dispatch_saved(domain, &messages);
        Ok(OperationOutcome::success(messages))
    }

    pub async fn delete(&self, domain: &Domain) -> DomainResult<OperationOutcome> {
        let messages = EventMessages::new();
        let uow = self.uow.begin(ScopeMode::ReadWrite).await?;

        if self.notifier.dispatch_deleting(domain, &messages) {
            uow.commit().await?;
            return Ok(OperationOutcome::cancelled(messages));
        }

        uow.domains().delete(domain).await?;
        uow.commit().await?;

        info!(id = domain.id, name = %domain.name, "Domain deleted");
        self.notifier.dispatch_deleted(domain, &messages);
        Ok(OperationOutcome::success(messages))
    }
}
