//! Session configuration parsing and validation.
//!
//! Cookie and lifetime toggles come from the environment through
//! [`mockable::Env`] so they can be tested without touching process state.
//! Debug builds tolerate missing or malformed values with a warning; release
//! builds reject them.

use chrono::TimeDelta;
use mockable::Env;
use tracing::warn;

use crate::domain::DEFAULT_SESSION_TTL_HOURS;

use super::state::CookiePolicy;

const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const TTL_HOURS_ENV: &str = "SESSION_TTL_HOURS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of hours";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to defaults and warn.
    Debug,
    /// Release builds require explicit, valid toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Attributes of the `Authorization` cookie.
    pub cookie: CookiePolicy,
    /// Lifetime of newly issued sessions.
    pub ttl: TimeDelta,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but holds an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Build session settings from environment variables and build mode.
///
/// `SESSION_COOKIE_SECURE` is mandatory in release builds.
/// `SESSION_TTL_HOURS` is optional and defaults to 12 hours; a present but
/// invalid value is rejected in release builds.
///
/// # Examples
///
/// ```rust
/// use shipment_backend::inbound::http::session_config::{
///     BuildMode, session_settings_from_env,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
///     "SESSION_TTL_HOURS" => Some("2".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid");
/// assert!(!settings.cookie.secure);
/// assert_eq!(settings.ttl.num_hours(), 2);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    Ok(SessionSettings {
        cookie: CookiePolicy {
            secure: cookie_secure_from_env(env, mode)?,
        },
        ttl: ttl_from_env(env, mode)?,
    })
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_COOKIE_SECURE not set; defaulting to secure");
            return Ok(true);
        }
        return Err(SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        });
    };

    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<TimeDelta, SessionConfigError> {
    let default_ttl = TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS);
    let Some(value) = env.string(TTL_HOURS_ENV) else {
        return Ok(default_ttl);
    };

    match value.trim().parse::<u16>() {
        Ok(hours) if hours > 0 => Ok(TimeDelta::hours(i64::from(hours))),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_TTL_HOURS; using default");
            Ok(default_ttl)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: TTL_HOURS_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
