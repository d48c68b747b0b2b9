//! Create domains table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Domains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Domains::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Domains::Key).uuid().not_null())
                    .col(ColumnDef::new(Domains::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Domains::RootContentId).integer())
                    .col(ColumnDef::new(Domains::LanguageIsoCode).string_len(14))
                    .col(
                        ColumnDef::new(Domains::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Domains::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Domain names are unique across the registry
        manager
            .create_index(
                Index::create()
                    .name("idx_domains_name")
                    .table(Domains::Table)
                    .col(Domains::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_domains_root_content_id")
                    .table(Domains::Table)
                    .col(Domains::RootContentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Domains::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Domains {
    Table,
    Id,
    Key,
    Name,
    RootContentId,
    LanguageIsoCode,
    CreatedAt,
    UpdatedAt,
}
