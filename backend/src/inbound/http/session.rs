//! Session credential handling at the HTTP edge.
//!
//! The opaque session token travels in the `Authorization` cookie. The
//! [`RequireSessionCookie`] middleware rejects protected requests that carry
//! no cookie at all; the [`SessionUser`] extractor resolves the cookie into
//! an [`AuthenticatedUser`] through the [`SessionAuthorizer`] port.
//!
//! [`SessionAuthorizer`]: crate::domain::ports::SessionAuthorizer

use std::ops::Deref;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpRequest, ResponseError, web};
use chrono::{DateTime, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{AuthenticatedUser, Error, SessionToken};

use super::state::{CookiePolicy, HttpState};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "Authorization";

/// Path prefixes reachable without a session cookie, compared
/// case-insensitively.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/tracking",
    "/docs",
    "/api-docs",
    "/health",
];

const MISSING_SESSION: &str = "Unauthorized: Session id is missing";

/// True when `path` starts with one of [`PUBLIC_PATH_PREFIXES`].
pub fn is_public_path(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

/// Read the session token presented by the client, if any.
pub fn presented_token(req: &HttpRequest) -> Option<SessionToken> {
    req.cookie(SESSION_COOKIE)
        .and_then(|cookie| SessionToken::from_presented(cookie.value()))
}

/// Build the credential cookie for a freshly issued session.
pub fn session_cookie(
    token: &SessionToken,
    expires_at: DateTime<Utc>,
    policy: CookiePolicy,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, token.as_str().to_owned())
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Strict)
        .finish();
    match OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
        Ok(expiry) => cookie.set_expires(expiry),
        Err(err) => warn!(error = %err, "session expiry outside cookie range"),
    }
    cookie
}

/// Build a cookie that instructs the client to drop its credential.
pub fn removal_cookie(policy: CookiePolicy) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Strict)
        .finish();
    cookie.make_removal();
    cookie
}

/// Extractor yielding the identity behind the request's session.
///
/// Fails with `401` when the cookie is missing or the session is unknown,
/// expired or orphaned; store faults surface as `500`.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(AuthenticatedUser);

impl SessionUser {
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl Deref for SessionUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for SessionUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                return Err(Error::unauthorized(MISSING_SESSION));
            };
            let Some(state) = state else {
                return Err(Error::internal("HTTP state is not configured"));
            };
            state.sessions.resolve(&token).await.map(SessionUser)
        })
    }
}

/// Middleware rejecting protected requests that present no session cookie.
///
/// Public paths always pass through. Session validity is checked later by
/// [`SessionUser`].
#[derive(Clone, Copy, Default)]
pub struct RequireSessionCookie;

impl<S, B> Transform<S, ServiceRequest> for RequireSessionCookie
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireSessionCookieMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionCookieMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequireSessionCookie`].
pub struct RequireSessionCookieMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireSessionCookieMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let has_cookie = presented_token(req.request()).is_some();
        if has_cookie || is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        debug!(path = %req.path(), "rejecting request without session cookie");
        let response = Error::unauthorized(MISSING_SESSION).error_response();
        Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
    }
}
