//! Chore roster entry-point: loads settings, wires adapters and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use chore_roster::inbound::http::health::HealthState;
use chore_roster::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use chore_roster::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;

use server::{RosterSettings, ServerConfig, build_http_state, create_server};

async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| io::Error::other(format!("run migrations: {err}")))?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io::Error::other(format!("connect to database: {err}")))
}

/// Session cookie settings read from the process environment.
fn load_session_settings(mode: BuildMode) -> io::Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), mode)
        .map_err(|err| io::Error::other(format!("session settings: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RosterSettings::load()
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?;
    let session = load_session_settings(BuildMode::current())?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::other(err.to_string()))?;

    let db_pool = match settings.database_url.as_deref() {
        Some(url) => Some(connect_database(url).await?),
        None => None,
    };
    let http_state = build_http_state(&settings, db_pool).await?;

    match http_state.roster.ensure_current_week().await {
        Ok(roster) => info!(
            roster_id = %roster.id,
            week_start = %roster.week.start(),
            "current week ready"
        ),
        Err(err) => error!(error = %err, "could not prepare the current week"),
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    info!(%bind_addr, "starting chore roster server");
    let server = create_server(health_state, web::Data::new(http_state), config)?;
    server.await
}
