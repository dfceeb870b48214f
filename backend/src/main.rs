//! Media server entry point: Subsonic REST endpoints and the admin pages.

mod server;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use media_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{ServerConfig, ServerSettings, create_server};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("invalid server settings: {e}")))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let bind_addr = settings.bind_addr();
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    info!(%bind_addr, "starting media server");
    create_server(config)?.await
}
