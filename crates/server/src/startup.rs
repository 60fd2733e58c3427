use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::car::repo::seaorm::{SeaOrmCarRepository, SeaOrmManufacturerRepository};
use service::car::CarService;
use service::clients::{HttpMapsClient, HttpPriceClient};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file first, environment variables when the file is missing or invalid.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => {
            warn!(error = %file_err, "config file unusable, falling back to environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

pub fn load_bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Connect and migrate the database, then wire stores and lookup clients
/// into a `CarService`.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    migration::Migrator::up(&db, None).await.map_err(anyhow::Error::from)?;
    info!("migrations applied");

    let prices = HttpPriceClient::new(&cfg.pricing)?;
    let maps = HttpMapsClient::new(&cfg.maps)?;
    info!(pricing = %cfg.pricing.base_url, maps = %cfg.maps.base_url, "lookup clients configured");

    let cars = CarService::new(
        Arc::new(SeaOrmCarRepository { db: db.clone() }),
        Arc::new(SeaOrmManufacturerRepository { db }),
        Arc::new(prices),
        Arc::new(maps),
    );
    Ok(AppState::new(cars))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c listener failed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config()?;
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting vehicles api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
