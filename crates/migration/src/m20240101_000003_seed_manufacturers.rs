//! Seed the well-known manufacturers so clients can reference them by code.
use sea_orm_migration::prelude::*;

const SEED: [(i32, &str); 5] = [
    (100, "Audi"),
    (101, "Chevrolet"),
    (102, "Ford"),
    (103, "BMW"),
    (104, "Dodge"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Manufacturer::Table)
            .columns([Manufacturer::Code, Manufacturer::Name]);
        for (code, name) in SEED {
            insert.values_panic([code.into(), name.into()]);
        }
        manager.exec_stmt(insert).await?;

        // explicit codes do not advance the serial sequence
        manager
            .get_connection()
            .execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('manufacturer', 'code'), (SELECT MAX(code) FROM manufacturer))",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Manufacturer::Table)
            .and_where(Expr::col(Manufacturer::Code).is_in(SEED.iter().map(|(code, _)| *code)))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum Manufacturer { Table, Code, Name }
