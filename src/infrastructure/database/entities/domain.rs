//! Domain entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Domain model - hostname (or hostname + path) routed to a content item
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stable external key
    pub key: Uuid,

    /// Unique domain name (e.g., "shop.example.com", "example.com/en")
    #[sea_orm(unique)]
    pub name: String,

    /// Owning content item; NULL for wildcard domains
    pub root_content_id: Option<i32>,

    /// Culture tag (e.g., "en-US")
    pub language_iso_code: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
