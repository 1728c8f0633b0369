//! Driving port for registration and login sessions.
//!
//! Inbound adapters validate payloads into [`Registration`] and
//! [`LoginCredentials`] before calling the port, so implementations only see
//! well-formed input.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, LoginCredentials, Registration, SessionToken, User, UserId};

/// Session issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Token for the client cookie.
    pub token: SessionToken,
    /// Session owner.
    pub user_id: UserId,
    /// Cookie and session expiry.
    pub expires_at: DateTime<Utc>,
}

/// Use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a new staff user.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Verify credentials and open a session.
    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error>;

    /// Revoke the session behind `token`; unknown tokens are accepted.
    async fn logout(&self, token: &SessionToken) -> Result<(), Error>;
}
