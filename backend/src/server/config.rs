//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use shipment_backend::inbound::http::session_config::SessionSettings;
use shipment_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session: SessionSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, session: SessionSettings) -> Self {
        Self {
            bind_addr,
            session,
            db_pool: None,
        }
    }

    /// Use PostgreSQL through `pool` instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
