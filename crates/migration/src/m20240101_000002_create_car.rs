//! Create `car` table.
//! Details are flattened into columns; price and resolved address are never stored.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Car::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(timestamp_with_time_zone(Car::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Car::ModifiedAt).not_null())
                    .col(string_len(Car::Condition, 16).not_null())
                    .col(double(Car::Lat).not_null())
                    .col(double(Car::Lon).not_null())
                    .col(integer_null(Car::ManufacturerCode))
                    .col(string_len_null(Car::Model, 128))
                    .col(integer_null(Car::Mileage))
                    .col(string_len_null(Car::ExternalColor, 64))
                    .col(string_len_null(Car::Body, 64))
                    .col(string_len_null(Car::Engine, 64))
                    .col(string_len_null(Car::FuelType, 64))
                    .col(integer_null(Car::ModelYear))
                    .col(integer_null(Car::ProductionYear))
                    .col(integer_null(Car::NumberOfDoors))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_manufacturer")
                            .from(Car::Table, Car::ManufacturerCode)
                            .to(Manufacturer::Table, Manufacturer::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Car::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Car {
    Table,
    Id,
    CreatedAt,
    ModifiedAt,
    Condition,
    Lat,
    Lon,
    ManufacturerCode,
    Model,
    Mileage,
    ExternalColor,
    Body,
    Engine,
    FuelType,
    ModelYear,
    ProductionYear,
    NumberOfDoors,
}

#[derive(DeriveIden)]
enum Manufacturer { Table, Code }
