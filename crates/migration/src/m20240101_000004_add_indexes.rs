use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Car: index on manufacturer_code
        manager
            .create_index(
                Index::create()
                    .name("idx_car_manufacturer")
                    .table(Car::Table)
                    .col(Car::ManufacturerCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_car_manufacturer").table(Car::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Car { Table, ManufacturerCode }
