//! Account service: registration, login sessions and logout.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AccountCommand, IssuedSession, PasswordHasher, SessionRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, Registration, Session, SessionToken, User, UserDraft, UserId,
    UserRole,
};

/// Session lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

const REGISTER_FAILED: &str = "An error occurred during registration";
const LOGIN_FAILED: &str = "An error occurred during login";
const LOGOUT_FAILED: &str = "An error occurred during logout";

fn system_error(message: &'static str, cause: &dyn std::fmt::Display) -> Error {
    error!(error = %cause, "{message}");
    Error::internal(message)
}

fn email_taken() -> Error {
    Error::invalid_request("Email already exists")
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Invalid credentials")
}

/// Service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U: ?Sized, S: ?Sized> {
    users: Arc<U>,
    sessions: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    session_ttl: TimeDelta,
}

impl<U: ?Sized, S: ?Sized> AccountService<U, S> {
    /// Create the service with the default session lifetime.
    pub fn new(
        users: Arc<U>,
        sessions: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            clock,
            session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    /// Override how long new sessions stay valid.
    #[must_use]
    pub fn with_session_ttl(mut self, session_ttl: TimeDelta) -> Self {
        self.session_ttl = session_ttl;
        self
    }
}

#[async_trait]
impl<U, S> AccountCommand for AccountService<U, S>
where
    U: UserRepository + ?Sized,
    S: SessionRepository + ?Sized,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(|err| system_error(REGISTER_FAILED, &err))?;
        if existing.is_some() {
            return Err(email_taken());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|err| system_error(REGISTER_FAILED, &err))?;
        let user = User::new(UserDraft {
            id: UserId::random(),
            name: registration.name().clone(),
            email: registration.email().clone(),
            role: UserRole::Staff,
            created_at: self.clock.utc(),
        });

        match self.users.insert(&user, &password_hash).await {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateEmail { .. }) => return Err(email_taken()),
            Err(err) => return Err(system_error(REGISTER_FAILED, &err)),
        }

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| system_error(LOGIN_FAILED, &err))?
        else {
            warn!("login attempted for unknown email");
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(|err| system_error(LOGIN_FAILED, &err))?;
        if !verified {
            warn!(user_id = %account.user.id(), "login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        let now = self.clock.utc();
        let token = SessionToken::generate();
        let session = Session {
            fingerprint: token.fingerprint(),
            user_id: account.user.id(),
            expires_at: now + self.session_ttl,
            created_at: now,
        };
        self.sessions
            .insert(&session)
            .await
            .map_err(|err| system_error(LOGIN_FAILED, &err))?;

        info!(user_id = %session.user_id, expires_at = %session.expires_at, "session opened");
        Ok(IssuedSession {
            token,
            user_id: session.user_id,
            expires_at: session.expires_at,
        })
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        self.sessions
            .delete(&token.fingerprint())
            .await
            .map_err(|err| system_error(LOGOUT_FAILED, &err))?;
        info!("session revoked");
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
