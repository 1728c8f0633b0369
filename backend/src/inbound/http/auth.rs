//! Account handlers: registration, login and logout.
//!
//! ```text
//! POST /api/auth/register {"name":"Ann","email":"ann@example.com","password":"pw"}
//! POST /api/auth/login {"email":"ann@example.com","password":"pw"}
//! POST /api/auth/logout
//! ```

use actix_web::{HttpRequest, HttpResponse, post, web};

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{presented_token, removal_cookie, session_cookie};
use crate::inbound::http::state::HttpState;

/// Register a new Staff account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request or email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let registration = Registration::try_from(payload.into_inner()).map_err(Error::from)?;
    let user = state.accounts.register(registration).await?;
    Ok(web::Json(user.into()))
}

/// Verify credentials and issue the `Authorization` session cookie.
///
/// Logging in again replaces the cookie with a new session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner()).map_err(Error::from)?;
    let issued = state.accounts.login(credentials).await?;
    let cookie = session_cookie(&issued.token, issued.expires_at, state.cookies);
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        user_id: *issued.user_id.as_uuid(),
        expires_at: issued.expires_at,
    }))
}

/// Revoke the presented session and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "No session cookie", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    if let Some(token) = presented_token(&req) {
        state.accounts.logout(&token).await?;
    }
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(state.cookies))
        .json(MessageResponse {
            message: "Logout successful".to_owned(),
        }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
