#![cfg(test)]
use axum::Router;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio::sync::OnceCell;

use crate::car::domain::{Car, Condition, Details, Location, Manufacturer};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_init(|| async {
            let cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;

    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(|_| DatabaseConfig::from_env());
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    Ok(connect_with_config(&cfg).await?)
}

/// Serve `app` on an ephemeral local port and return its base url.
pub async fn spawn_stub(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// Used 2018 Chevrolet Impala parked in Queens.
pub fn impala() -> Car {
    Car::new(
        Condition::Used,
        Details {
            manufacturer: Some(Manufacturer::new(101, "Chevrolet")),
            model: Some("Impala".into()),
            mileage: Some(32280),
            external_color: Some("white".into()),
            body: Some("sedan".into()),
            engine: Some("3.6L V6".into()),
            fuel_type: Some("Gasoline".into()),
            model_year: Some(2018),
            production_year: Some(2018),
            number_of_doors: Some(4),
        },
        Location::new(40.730610, -73.935242),
    )
}
