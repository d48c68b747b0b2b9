//! In-memory unit of work for development and testing
//!
//! Committed records live in a shared `DashMap`. A read-write scope stages
//! its writes and applies them in one step on commit; reads inside the scope
//! see the staged writes on top of the committed state.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::site_domain::filter_wildcards;
use crate::domain::{
    Domain, DomainError, DomainRepository, DomainResult, ScopeMode, UnitOfWork,
    UnitOfWorkProvider,
};

/// Shared committed state
pub struct InMemoryStore {
    domains: DashMap<i32, Domain>,
    next_id: AtomicI32,
    commits: AtomicUsize,
    commit_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            domains: DashMap::new(),
            next_id: AtomicI32::new(1),
            commits: AtomicUsize::new(0),
            commit_lock: Mutex::new(()),
        }
    }

    /// Number of committed scopes (read-only scopes included)
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens scopes over an [`InMemoryStore`]
#[derive(Clone)]
pub struct InMemoryUnitOfWorkProvider {
    store: Arc<InMemoryStore>,
}

impl InMemoryUnitOfWorkProvider {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }
}

impl Default for InMemoryUnitOfWorkProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitOfWorkProvider for InMemoryUnitOfWorkProvider {
    async fn begin(&self, mode: ScopeMode) -> DomainResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            mode,
            store: self.store.clone(),
            staged: Mutex::new(Vec::new()),
        }))
    }
}

#[derive(Debug, Clone)]
enum StagedWrite {
    Upsert(Domain),
    Delete(i32),
}

struct InMemoryUnitOfWork {
    mode: ScopeMode,
    store: Arc<InMemoryStore>,
    staged: Mutex<Vec<StagedWrite>>,
}

impl InMemoryUnitOfWork {
    fn staged(&self) -> MutexGuard<'_, Vec<StagedWrite>> {
        self.staged
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Committed state with this scope's staged writes applied, ordered by id
    fn view(&self) -> BTreeMap<i32, Domain> {
        let mut view: BTreeMap<i32, Domain> = self
            .store
            .domains
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        for write in self.staged().iter() {
            match write {
                StagedWrite::Upsert(d) => {
                    view.insert(d.id, d.clone());
                }
                StagedWrite::Delete(id) => {
                    view.remove(id);
                }
            }
        }
        view
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn mode(&self) -> ScopeMode {
        self.mode
    }

    fn domains(&self) -> Box<dyn DomainRepository + '_> {
        Box::new(InMemoryDomainRepository { uow: self })
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let writes = std::mem::take(&mut *self.staged());
        let _guard = self
            .store
            .commit_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another scope may have committed the same name since we staged
        for write in &writes {
            if let StagedWrite::Upsert(d) = write {
                let taken = self
                    .store
                    .domains
                    .iter()
                    .any(|e| e.value().name == d.name && *e.key() != d.id);
                if taken {
                    return Err(DomainError::Conflict(format!(
                        "domain name '{}' is already assigned",
                        d.name
                    )));
                }
            }
        }

        for write in writes {
            match write {
                StagedWrite::Upsert(d) => {
                    self.store.domains.insert(d.id, d);
                }
                StagedWrite::Delete(id) => {
                    self.store.domains.remove(&id);
                }
            }
        }
        self.store.commits.fetch_add(1, Ordering::SeqCst);
        debug!(mode = %self.mode, "In-memory scope committed");
        Ok(())
    }
}

struct InMemoryDomainRepository<'a> {
    uow: &'a InMemoryUnitOfWork,
}

impl InMemoryDomainRepository<'_> {
    fn ensure_writable(&self) -> DomainResult<()> {
        if self.uow.mode.is_read_only() {
            return Err(DomainError::Storage(
                "cannot write through a read-only scope".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepository<'_> {
    async fn exists(&self, name: &str) -> DomainResult<bool> {
        Ok(self.uow.view().values().any(|d| d.name == name))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Domain>> {
        Ok(self.uow.view().remove(&id))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Domain>> {
        Ok(self.uow.view().into_values().find(|d| d.name == name))
    }

    async fn find_all(&self, include_wildcards: bool) -> DomainResult<Vec<Domain>> {
        let all = self.uow.view().into_values().collect();
        Ok(filter_wildcards(all, include_wildcards))
    }

    async fn find_assigned(
        &self,
        content_id: i32,
        include_wildcards: bool,
    ) -> DomainResult<Vec<Domain>> {
        let assigned = self
            .uow
            .view()
            .into_values()
            .filter(|d| d.root_content_id == Some(content_id))
            .collect();
        Ok(filter_wildcards(assigned, include_wildcards))
    }

    async fn save(&self, domain: &mut Domain) -> DomainResult<()> {
        self.ensure_writable()?;
        domain.validate()?;

        let view = self.uow.view();
        if view
            .values()
            .any(|d| d.name == domain.name && d.id != domain.id)
        {
            return Err(DomainError::Conflict(format!(
                "domain name '{}' is already assigned",
                domain.name
            )));
        }

        let now = Utc::now();
        if domain.has_identity() {
            let Some(existing) = view.get(&domain.id) else {
                return Err(DomainError::NotFound {
                    entity: "Domain",
                    field: "id",
                    value: domain.id.to_string(),
                });
            };
            domain.created_at = existing.created_at;
            domain.updated_at = now;
        } else {
            domain.id = self.uow.store.next_id.fetch_add(1, Ordering::SeqCst);
            domain.created_at = now;
            domain.updated_at = now;
        }

        self.uow.staged().push(StagedWrite::Upsert(domain.clone()));
        Ok(())
    }

    async fn delete(&self, domain: &Domain) -> DomainResult<()> {
        self.ensure_writable()?;
        if !self.uow.view().contains_key(&domain.id) {
            return Err(DomainError::NotFound {
                entity: "Domain",
                field: "id",
                value: domain.id.to_string(),
            });
        }
        self.uow.staged().push(StagedWrite::Delete(domain.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn staged_writes_are_invisible_until_commit() {
        let provider = InMemoryUnitOfWorkProvider::new();

        let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let mut d = Domain::new("shop.example.com").with_root_content(42);
        uow.domains().save(&mut d).await.unwrap();
        assert!(d.has_identity());
        assert!(uow.domains().exists("shop.example.com").await.unwrap());

        let reader = provider.begin(ScopeMode::ReadOnly).await.unwrap();
        assert!(!reader.domains().exists("shop.example.com").await.unwrap());

        uow.commit().await.unwrap();
        assert!(reader.domains().exists("shop.example.com").await.unwrap());
        assert_eq!(provider.store().len(), 1);
    }

    #[tokio::test]
    async fn dropped_scope_discards_writes() {
        let provider = InMemoryUnitOfWorkProvider::new();
        {
            let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
            let mut d = Domain::new("shop.example.com");
            uow.domains().save(&mut d).await.unwrap();
        }
        assert!(provider.store().is_empty());
        assert_eq!(provider.store().commit_count(), 0);
    }

    #[tokio::test]
    async fn read_only_scope_rejects_writes() {
        let provider = InMemoryUnitOfWorkProvider::new();
        let uow = provider.begin(ScopeMode::ReadOnly).await.unwrap();
        let mut d = Domain::new("shop.example.com");
        let err = uow.domains().save(&mut d).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let provider = InMemoryUnitOfWorkProvider::new();
        let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let mut first = Domain::new("shop.example.com");
        uow.domains().save(&mut first).await.unwrap();
        uow.commit().await.unwrap();

        let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let mut second = Domain::new("shop.example.com");
        let err = uow.domains().save(&mut second).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_scopes_cannot_commit_same_name() {
        let provider = InMemoryUnitOfWorkProvider::new();
        let a = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let b = provider.begin(ScopeMode::ReadWrite).await.unwrap();

        let mut da = Domain::new("shop.example.com");
        let mut db = Domain::new("shop.example.com");
        a.domains().save(&mut da).await.unwrap();
        b.domains().save(&mut db).await.unwrap();

        a.commit().await.unwrap();
        assert!(matches!(
            b.commit().await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert_eq!(provider.store().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_created_at() {
        let provider = InMemoryUnitOfWorkProvider::new();
        let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let mut d = Domain::new("shop.example.com").with_root_content(1);
        uow.domains().save(&mut d).await.unwrap();
        let created = d.created_at;

        d.root_content_id = Some(2);
        uow.domains().save(&mut d).await.unwrap();
        uow.commit().await.unwrap();

        let reader = provider.begin(ScopeMode::ReadOnly).await.unwrap();
        let stored = reader.domains().find_by_id(d.id).await.unwrap().unwrap();
        assert_eq!(stored.root_content_id, Some(2));
        assert_eq!(stored.created_at, created);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let provider = InMemoryUnitOfWorkProvider::new();
        let uow = provider.begin(ScopeMode::ReadWrite).await.unwrap();
        let mut ghost = Domain::new("ghost.example.com");
        ghost.id = 99;
        let err = uow.domains().delete(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
