//! Backend entry-point: loads settings, migrates the schema and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use reviewhub::demo_data::seed_demo_data_on_startup;
use reviewhub::inbound::http::health::HealthState;
use reviewhub::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use reviewhub::outbound::security::{BuildMode, token_secret_from_env};
use reviewhub::settings::AppSettings;

use server::{ServerConfig, build_demo_seeder, build_http_state, create_server};

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

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let database_url = settings.database_url()?;
    let bind_addr = settings.bind_addr()?;

    let token_secret =
        token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())?;
    info!(
        fingerprint = %token_secret.fingerprint(),
        ephemeral = token_secret.is_ephemeral(),
        "token secret loaded"
    );

    run_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;

    let config = ServerConfig::new(bind_addr, pool, token_secret)
        .with_token_ttl(settings.token_ttl())
        .with_hashing(settings.hashing_params());
    let http_state = build_http_state(&config)?;

    let seeder = build_demo_seeder(&config, &http_state);
    seed_demo_data_on_startup(settings.seed_demo_data, &seeder)
        .await
        .wrap_err("failed to seed demo data")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &config)?;
    info!(addr = %config.bind_addr(), "listening");
    server.await?;
    Ok(())
}
