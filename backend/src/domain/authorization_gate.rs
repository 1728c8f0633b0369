//! Authorization gate: resolves a session token into the acting user.
//!
//! A session counts only while `expires_at > now`. Store faults are reported
//! as internal errors and never fall through to an authenticated identity.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{SessionAuthorizer, SessionRepository, UserRepository};
use crate::domain::{AuthenticatedUser, Error, SessionToken};

const VALIDATION_FAILED: &str = "An error occurred during session validation";

fn system_error(cause: &dyn std::fmt::Display) -> Error {
    error!(error = %cause, "{VALIDATION_FAILED}");
    Error::internal(VALIDATION_FAILED)
}

/// Service implementing [`SessionAuthorizer`].
#[derive(Clone)]
pub struct SessionGate<S: ?Sized, U: ?Sized> {
    sessions: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, U: ?Sized> SessionGate<S, U> {
    /// Create the gate over the session store and user repository.
    pub fn new(sessions: Arc<S>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<S, U> SessionAuthorizer for SessionGate<S, U>
where
    S: SessionRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn resolve(&self, token: &SessionToken) -> Result<AuthenticatedUser, Error> {
        let session = self
            .sessions
            .find(&token.fingerprint())
            .await
            .map_err(|err| system_error(&err))?
            .filter(|session| session.is_active_at(self.clock.utc()))
            .ok_or_else(|| {
                debug!("session unknown or expired");
                Error::unauthorized("Invalid session")
            })?;

        let user = self
            .users
            .find_by_id(&session.user_id)
            .await
            .map_err(|err| system_error(&err))?
            .ok_or_else(|| Error::unauthorized("User not found"))?;

        Ok(AuthenticatedUser::new(user.id(), user.role()))
    }
}
