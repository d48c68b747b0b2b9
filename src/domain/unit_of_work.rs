//! Unit-of-work interfaces
//!
//! A unit of work is one transactional scope. Repositories are handed out
//! bound to the scope, so everything done through them commits or rolls back
//! together.

use async_trait::async_trait;

use super::site_domain::DomainRepository;
use super::DomainResult;

/// Access mode requested when opening a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    ReadOnly,
    ReadWrite,
}

impl ScopeMode {
    pub fn is_read_only(self) -> bool {
        matches!(self, ScopeMode::ReadOnly)
    }
}

impl std::fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// Opens transactional scopes.
#[async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    async fn begin(&self, mode: ScopeMode) -> DomainResult<Box<dyn UnitOfWork>>;
}

/// One open scope.
///
/// Dropping a read-write scope without calling [`UnitOfWork::commit`]
/// discards everything written through it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn mode(&self) -> ScopeMode;

    /// Domain repository bound to this scope
    fn domains(&self) -> Box<dyn DomainRepository + '_>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
