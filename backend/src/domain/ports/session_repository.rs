//! Port for server-side login sessions.

use async_trait::async_trait;

use crate::domain::{Session, SessionFingerprint};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session store query failed: {message}",
    }
}

/// Port for creating, resolving and revoking sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    async fn insert(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    /// Find a session by fingerprint regardless of expiry.
    async fn find(
        &self,
        fingerprint: &SessionFingerprint,
    ) -> Result<Option<Session>, SessionRepositoryError>;

    /// Remove a session; removing an unknown session is not an error.
    async fn delete(&self, fingerprint: &SessionFingerprint) -> Result<(), SessionRepositoryError>;
}
