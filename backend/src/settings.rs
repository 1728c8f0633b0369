//! Server settings loaded via OrthoConfig.
//!
//! Values come from `SHIPMENT_*` environment variables, configuration files
//! or command-line flags. Port and pool size carry loader defaults so an
//! empty environment still yields a complete configuration.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";

/// Bind address and storage settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHIPMENT")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL; without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

/// Reasons the bind address cannot be built.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address '{address}': {source}")]
pub struct BindAddrError {
    address: String,
    #[source]
    source: std::net::AddrParseError,
}

impl ServerSettings {
    /// Configured host, defaulting to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Socket address built from [`Self::host`] and the port.
    ///
    /// # Errors
    /// Returns [`BindAddrError`] when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, BindAddrError> {
        let address = format!("{}:{}", self.host(), self.port);
        address
            .parse()
            .map_err(|source| BindAddrError { address, source })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
