//! Tests for the account handlers.

use actix_web::cookie::time::Duration;
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::IssuedSession;
use crate::domain::{
    EmailAddress, Error, SessionToken, User, UserDraft, UserId, UserName, UserRole,
};
use crate::inbound::http::session::SESSION_COOKIE;
use crate::inbound::http::test_utils::{TEST_TOKEN, TestPorts, call_api, session_cookie};

fn staff_user() -> User {
    User::new(UserDraft {
        id: UserId::random(),
        name: UserName::new("Ann Staff").expect("valid name"),
        email: EmailAddress::new("ann@example.com").expect("valid email"),
        role: UserRole::Staff,
        created_at: Utc::now(),
    })
}

#[rstest]
#[actix_web::test]
async fn register_returns_account_without_password() {
    let mut ports = TestPorts::new();
    ports
        .accounts
        .expect_register()
        .times(1)
        .withf(|registration| registration.email().as_ref() == "ann@example.com")
        .return_once(|_| Ok(staff_user()));

    let response = call_api(
        ports,
        test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "name": "Ann Staff",
            "email": " Ann@Example.com ",
            "password": "hunter2"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["role"], "Staff");
    assert_eq!(body["email"], "ann@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("createdAt").is_some());
}

#[rstest]
#[case(json!({ "email": "a@b.c", "password": "pw" }), "Name is required")]
#[case(json!({ "name": "Ann", "password": "pw" }), "Email is required")]
#[case(json!({ "name": "Ann", "email": "a@b.c", "password": "  " }), "Password is required")]
#[actix_web::test]
async fn register_validation_runs_before_the_service(
    #[case] payload: Value,
    #[case] message: &str,
) {
    let mut ports = TestPorts::new();
    ports.accounts.expect_register().times(0);

    let response = call_api(
        ports,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_a_validation_error() {
    let response = call_api(
        TestPorts::new(),
        test::TestRequest::post()
            .uri("/api/auth/register")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Invalid request body");
}

#[rstest]
#[actix_web::test]
async fn login_sets_session_cookie() {
    let user_id = UserId::random();
    let expires_at = Utc
        .with_ymd_and_hms(2026, 6, 1, 20, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut ports = TestPorts::new();
    ports.accounts.expect_login().times(1).return_once(move |_| {
        Ok(IssuedSession {
            token: SessionToken::from_presented(TEST_TOKEN).expect("token"),
            user_id,
            expires_at,
        })
    });

    let response = call_api(
        ports,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@example.com", "password": "hunter2" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned();
    assert_eq!(cookie.value(), TEST_TOKEN);
    assert_eq!(cookie.http_only(), Some(true));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["userId"], user_id.to_string());
    assert!(body.get("token").is_none());
}

#[rstest]
#[actix_web::test]
async fn login_with_bad_credentials_is_unauthorized() {
    let mut ports = TestPorts::new();
    ports
        .accounts
        .expect_login()
        .return_once(|_| Err(Error::unauthorized("Invalid credentials")));

    let response = call_api(
        ports,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@example.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(
        response
            .response()
            .cookies()
            .all(|cookie| cookie.name() != SESSION_COOKIE)
    );
}

#[rstest]
#[actix_web::test]
async fn logout_revokes_session_and_clears_cookie() {
    let mut ports = TestPorts::new();
    ports
        .accounts
        .expect_logout()
        .times(1)
        .withf(|token| token.as_str() == TEST_TOKEN)
        .return_once(|_| Ok(()));

    let response = call_api(
        ports,
        test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(session_cookie()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("removal cookie")
        .into_owned();
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Logout successful");
}

#[rstest]
#[actix_web::test]
async fn logout_without_cookie_is_rejected_by_the_gate() {
    let mut ports = TestPorts::new();
    ports.accounts.expect_logout().times(0);

    let response = call_api(
        ports,
        test::TestRequest::post().uri("/api/auth/logout"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
