//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shipment_backend::inbound::http::health::HealthState;
use shipment_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use shipment_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use shipment_backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("loading server settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("loading session settings")?;
    let mut config = ServerConfig::new(settings.bind_addr()?, session);

    match settings.database_url() {
        Some(url) => config = config.with_db_pool(prepare_database(url, &settings).await?),
        None => warn!("no database URL configured; using the in-memory store"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}

async fn prepare_database(url: &str, settings: &ServerSettings) -> Result<DbPool> {
    let migration_url = url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|err| eyre!("migration task failed: {err}"))??;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size))
        .await
        .wrap_err("building database pool")?;
    Ok(pool)
}
