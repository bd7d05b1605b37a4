//! Backend entry-point: loads settings, connects the document store, and
//! serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use relief_backend::inbound::http::health::HealthState;
use relief_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use relief_backend::settings::AppSettings;
use server::{ServerConfig, build_store, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_env().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let ttl = settings.token_ttl().map_err(std::io::Error::other)?;
    let secret = settings.jwt_secret().map_err(std::io::Error::other)?;

    let store = build_store(&settings).await?;
    let tokens = Arc::new(JwtTokenService::new(secret.as_slice(), ttl));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let config = ServerConfig::new(bind_addr, store, hasher, tokens);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
