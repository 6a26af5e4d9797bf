//! Backend entry-point: loads settings, wires the REST API and serves it.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal_backend::inbound::http::health::HealthState;
use portal_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use portal_backend::settings::PortalSettings;

use server::{ServerConfig, create_server};

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

    let settings = PortalSettings::load().map_err(|err| {
        error!(error = %err, "failed to load settings");
        std::io::Error::other(err.to_string())
    })?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| {
            error!(error = %err, "invalid session configuration");
            std::io::Error::other(err)
        })?;
    let config = ServerConfig::from_settings(&settings, session).map_err(|err| {
        error!(error = %err, "invalid server settings");
        std::io::Error::other(err)
    })?;
    let bind_addr = config.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "portal backend listening");
    server.await
}
