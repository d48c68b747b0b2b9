//! SeaORM implementation of DomainRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::info;
use uuid::Uuid;

use crate::domain::site_domain::filter_wildcards;
use crate::domain::{Domain, DomainError, DomainRepository, DomainResult, ScopeMode};
use crate::infrastructure::database::entities::domain;

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
        _ => DomainError::from(e),
    }
}

fn entity_to_domain(m: domain::Model) -> Domain {
    Domain {
        id: m.id,
        key: m.key,
        name: m.name,
        root_content_id: m.root_content_id,
        language_iso_code: m.language_iso_code,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn name_taken(name: &str) -> DomainError {
    DomainError::Conflict(format!("domain name '{}' is already assigned", name))
}

fn not_found(id: i32) -> DomainError {
    DomainError::NotFound {
        entity: "Domain",
        field: "id",
        value: id.to_string(),
    }
}

// ── SeaOrmDomainRepository ──────────────────────────────────────

/// Domain repository bound to one connection or transaction
pub struct SeaOrmDomainRepository<'a, C> {
    conn: &'a C,
    mode: ScopeMode,
}

impl<'a, C> SeaOrmDomainRepository<'a, C>
where
    C: ConnectionTrait + Sync,
{
    pub fn new(conn: &'a C, mode: ScopeMode) -> Self {
        Self { conn, mode }
    }

    fn ensure_writable(&self) -> DomainResult<()> {
        if self.mode.is_read_only() {
            return Err(DomainError::Storage(
                "cannot write through a read-only scope".into(),
            ));
        }
        Ok(())
    }

    async fn find_model_by_name(&self, name: &str) -> DomainResult<Option<domain::Model>> {
        domain::Entity::find()
            .filter(domain::Column::Name.eq(name))
            .one(self.conn)
            .await
            .map_err(db_err)
    }

    async fn insert(&self, d: &mut Domain) -> DomainResult<()> {
        if self.find_model_by_name(&d.name).await?.is_some() {
            return Err(name_taken(&d.name));
        }

        let now = Utc::now();
        let key = if d.key.is_nil() { Uuid::new_v4() } else { d.key };
        let model = domain::ActiveModel {
            id: ActiveValue::NotSet,
            key: Set(key),
            name: Set(d.name.clone()),
            root_content_id: Set(d.root_content_id),
            language_iso_code: Set(d.language_iso_code.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(self.conn).await.map_err(db_err)?;
        info!(id = result.id, name = %result.name, "Domain created");
        *d = entity_to_domain(result);
        Ok(())
    }

    async fn update(&self, d: &mut Domain) -> DomainResult<()> {
        let existing = domain::Entity::find_by_id(d.id)
            .one(self.conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| not_found(d.id))?;

        if let Some(other) = self.find_model_by_name(&d.name).await? {
            if other.id != d.id {
                return Err(name_taken(&d.name));
            }
        }

        let model = domain::ActiveModel {
            id: Set(d.id),
            key: Set(d.key),
            name: Set(d.name.clone()),
            root_content_id: Set(d.root_content_id),
            language_iso_code: Set(d.language_iso_code.clone()),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        let result = model.update(self.conn).await.map_err(db_err)?;
        info!(id = result.id, name = %result.name, "Domain updated");
        *d = entity_to_domain(result);
        Ok(())
    }
}

#[async_trait]
impl<C> DomainRepository for SeaOrmDomainRepository<'_, C>
where
    C: ConnectionTrait + Sync,
{
    async fn exists(&self, name: &str) -> DomainResult<bool> {
        let count = domain::Entity::find()
            .filter(domain::Column::Name.eq(name))
            .count(self.conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Domain>> {
        let model = domain::Entity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Domain>> {
        Ok(self.find_model_by_name(name).await?.map(entity_to_domain))
    }

    async fn find_all(&self, include_wildcards: bool) -> DomainResult<Vec<Domain>> {
        let models = domain::Entity::find()
            .order_by_asc(domain::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_err)?;
        let all = models.into_iter().map(entity_to_domain).collect();
        Ok(filter_wildcards(all, include_wildcards))
    }

    async fn find_assigned(
        &self,
        content_id: i32,
        include_wildcards: bool,
    ) -> DomainResult<Vec<Domain>> {
        let models = domain::Entity::find()
            .filter(domain::Column::RootContentId.eq(content_id))
            .order_by_asc(domain::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_err)?;
        let assigned = models.into_iter().map(entity_to_domain).collect();
        Ok(filter_wildcards(assigned, include_wildcards))
    }

    async fn save(&self, d: &mut Domain) -> DomainResult<()> {
        self.ensure_writable()?;
        d.validate()?;
        if d.has_identity() {
            self.update(d).await
        } else {
            self.insert(d).await
        }
    }

    async fn delete(&self, d: &Domain) -> DomainResult<()> {
        self.ensure_writable()?;
        let result = domain::Entity::delete_by_id(d.id)
            .exec(self.conn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(not_found(d.id));
        }
        info!(id = d.id, name = %d.name, "Domain deleted");
        Ok(())
    }
}
