//! SeaORM implementation of UnitOfWorkProvider

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::debug;

use super::domain_repository::{db_err, SeaOrmDomainRepository};
use crate::domain::{DomainRepository, DomainResult, ScopeMode, UnitOfWork, UnitOfWorkProvider};

/// Opens scopes on one connection pool.
///
/// Read-only scopes run directly on the pool; read-write scopes open a
/// database transaction that rolls back when dropped without commit.
///
/// ```ignore
/// let uows = SeaOrmUnitOfWorkProvider::new(db.clone());
/// let uow = uows.begin(ScopeMode::ReadWrite).await?;
/// uow.domains().save(&mut domain).await?;
/// uow.commit().await?;
/// ```
#[derive(Clone)]
pub struct SeaOrmUnitOfWorkProvider {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWorkProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWorkProvider for SeaOrmUnitOfWorkProvider {
    async fn begin(&self, mode: ScopeMode) -> DomainResult<Box<dyn UnitOfWork>> {
        let scope = match mode {
            ScopeMode::ReadOnly => Scope::ReadOnly(self.db.clone()),
            ScopeMode::ReadWrite => Scope::ReadWrite(self.db.begin().await.map_err(db_err)?),
        };
        debug!(%mode, "Scope opened");
        Ok(Box::new(SeaOrmUnitOfWork { scope }))
    }
}

enum Scope {
    ReadOnly(DatabaseConnection),
    ReadWrite(DatabaseTransaction),
}

struct SeaOrmUnitOfWork {
    scope: Scope,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn mode(&self) -> ScopeMode {
        match self.scope {
            Scope::ReadOnly(_) => ScopeMode::ReadOnly,
            Scope::ReadWrite(_) => ScopeMode::ReadWrite,
        }
    }

    fn domains(&self) -> Box<dyn DomainRepository + '_> {
        match &self.scope {
            Scope::ReadOnly(conn) => Box::new(SeaOrmDomainRepository::new(conn, ScopeMode::ReadOnly)),
            Scope::ReadWrite(txn) => Box::new(SeaOrmDomainRepository::new(txn, ScopeMode::ReadWrite)),
        }
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        match self.scope {
            Scope::ReadOnly(_) => Ok(()),
            Scope::ReadWrite(txn) => {
                txn.commit().await.map_err(db_err)?;
                debug!("Transaction committed");
                Ok(())
            }
        }
    }
}
