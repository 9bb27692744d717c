//! Backend entry-point: loads settings, prepares storage and serves the API.

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use salesdesk::inbound::http::health::HealthState;
use salesdesk::inbound::http::session_config::{BuildMode, session_settings_from_env};
use salesdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use salesdesk::server::{ServerConfig, build_http_state, create_server};
use salesdesk::settings::AppSettings;

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

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let mut config = ServerConfig::new(session, settings.bind_addr()?)
        .with_page_limits(settings.page_limits()?)
        .with_bcrypt_cost(settings.bcrypt_cost());

    match settings.database_url.clone() {
        Some(url) => {
            let migration_url = url.clone();
            let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
                .await
                .wrap_err("migration task panicked")?
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations applied");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => {
            warn!("SALESDESK_DATABASE_URL not set; data is kept in memory and lost on exit");
        }
    }

    let admin = settings.bootstrap_admin()?;
    let http_state = build_http_state(&config, admin.as_ref())
        .await
        .wrap_err("failed to prepare application state")?;

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting server");
    let server = create_server(health_state, http_state, config)?;
    server.await?;
    Ok(())
}
