//! HTTP server configuration objects.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Listener settings loaded via OrthoConfig (`MEDIA_SERVER_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEDIA_SERVER")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
}

impl ServerSettings {
    /// Socket address to bind, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }
}

/// Everything the server factory needs to build the app.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Construct a server configuration from session and listener settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
        }
    }
}
