//! Create `manufacturer` table.
//!
//! Codes are assigned by the database; cars reference them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Manufacturer::Table)
                    .if_not_exists()
                    .col(pk_auto(Manufacturer::Code))
                    .col(string_len(Manufacturer::Name, 128).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Manufacturer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Manufacturer { Table, Code, Name }
