//! Driving port used by the authorization gate to resolve a presented
//! session token into an identity.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, SessionToken};

/// Resolves session tokens to authenticated users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthorizer: Send + Sync {
    /// Return the identity behind `token`.
    ///
    /// Fails with `Unauthorized` when the session is unknown, expired, or
    /// points at a missing user, and with `InternalError` when the store
    /// cannot be read.
    async fn resolve(&self, token: &SessionToken) -> Result<AuthenticatedUser, Error>;
}
