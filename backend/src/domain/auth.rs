//! Authentication primitives: credentials, registrations, sessions and the
//! authenticated identity handed to protected operations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{EmailAddress, Error, UserId, UserName, UserRole, UserValidationError};

/// Roles allowed to create, advance, list and read shipments.
pub const SHIPMENT_OPERATORS: &[UserRole] = &[UserRole::Admin, UserRole::Staff];
/// Roles allowed to amend recorded tracking events.
pub const EVENT_EDITORS: &[UserRole] = &[UserRole::Admin];

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// Name or email failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// Password was blank.
    #[error("Password is required")]
    EmptyPassword,
}

impl From<AuthValidationError> for Error {
    fn from(value: AuthValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, AuthValidationError> {
    if password.trim().is_empty() {
        return Err(AuthValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised the same way as at registration.
/// - `password` must not be blank but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use shipment_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ops@Example.com", "pw").expect("valid");
/// assert_eq!(creds.email().as_ref(), "ops@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email)?;
        let password = require_password(password)?;
        Ok(Self { email, password })
    }

    /// Normalised email used for lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate name, email and password, in that order.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        let password = require_password(password)?;
        Ok(Self {
            name,
            email,
            password,
        })
    }

    /// Requested display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Normalised email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque session token handed to the client in the `Authorization` cookie.
///
/// The store never sees the token itself, only its [`SessionFingerprint`].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Generate a fresh token from two random UUIDs in simple form.
    pub fn generate() -> Self {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Self(Zeroizing::new(token))
    }

    /// Accept a token presented by a client; blank values are treated as
    /// absent.
    pub fn from_presented(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Token text for the cookie.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lookup key stored server-side.
    pub fn fingerprint(&self) -> SessionFingerprint {
        SessionFingerprint(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Hex-encoded SHA-256 of a [`SessionToken`]; the session's stored identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionFingerprint(String);

impl SessionFingerprint {
    /// Wrap a value read from storage.
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SessionFingerprint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Server-side login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stored identifier derived from the client token.
    pub fingerprint: SessionFingerprint,
    /// Session owner.
    pub user_id: UserId,
    /// Moment the session stops being valid.
    pub expires_at: DateTime<Utc>,
    /// Login time.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A session is active only while `expires_at` lies strictly in the
    /// future.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Identity resolved by the authorization gate and passed explicitly into
/// protected operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
    role: UserRole,
}

impl AuthenticatedUser {
    /// Bind a user to the role read from storage.
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Acting user.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Role at the time the session was resolved.
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Fail with [`crate::domain::ErrorCode::Forbidden`] unless the role is
    /// one of `allowed`.
    ///
    /// # Examples
    /// ```
    /// use shipment_backend::domain::{AuthenticatedUser, EVENT_EDITORS, UserId, UserRole};
    ///
    /// let staff = AuthenticatedUser::new(UserId::random(), UserRole::Staff);
    /// assert!(staff.require_any_role(EVENT_EDITORS).is_err());
    /// ```
    pub fn require_any_role(&self, allowed: &[UserRole]) -> Result<(), Error> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::forbidden("Forbidden: insufficient role"))
        }
    }
}
