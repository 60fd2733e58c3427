//! Migrator registering entity-specific migrations in dependency order.
//! Seed data and indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_manufacturer;
mod m20240101_000002_create_car;
mod m20240101_000003_seed_manufacturers;
mod m20240101_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_manufacturer::Migration),
            Box::new(m20240101_000002_create_car::Migration),
            Box::new(m20240101_000003_seed_manufacturers::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000004_add_indexes::Migration),
        ]
    }
}
