//! Tests for the account service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockPasswordHasher, MockSessionRepository, MockUserRepository, PasswordHashError,
    SessionRepositoryError, UserAccount,
};
use crate::domain::{EmailAddress, ErrorCode, UserName};
use crate::test_support::clock::MutableClock;

type Service = AccountService<MockUserRepository, MockSessionRepository>;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn build(
    users: MockUserRepository,
    sessions: MockSessionRepository,
    hasher: MockPasswordHasher,
    now: DateTime<Utc>,
) -> Service {
    AccountService::new(
        Arc::new(users),
        Arc::new(sessions),
        Arc::new(hasher),
        Arc::new(MutableClock::new(now)),
    )
}

fn account(now: DateTime<Utc>) -> UserAccount {
    UserAccount {
        user: User::new(UserDraft {
            id: UserId::random(),
            name: UserName::new("Ops Lead").expect("valid name"),
            email: EmailAddress::new("ops@example.com").expect("valid email"),
            role: UserRole::Admin,
            created_at: now,
        }),
        password_hash: "$argon2id$stored".to_owned(),
    }
}

fn registration() -> Registration {
    Registration::try_from_parts("Ann Staff", " Ann@Example.com ", "hunter2").expect("valid")
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("OPS@example.com", "hunter2").expect("valid")
}

#[rstest]
#[tokio::test]
async fn register_creates_staff_user_with_hashed_password(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .withf(|email| email.as_ref() == "ann@example.com")
        .return_once(|_| Ok(None));
    users
        .expect_insert()
        .times(1)
        .withf(|user, hash| user.role() == UserRole::Staff && hash == "hashed")
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Ok("hashed".to_owned()));

    let user = build(users, MockSessionRepository::new(), hasher, now)
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), UserRole::Staff);
    assert_eq!(user.email().as_ref(), "ann@example.com");
    assert_eq!(user.created_at(), now);
}

#[rstest]
#[tokio::test]
async fn register_rejects_known_email_up_front(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account(now))));
    users.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let err = build(users, MockSessionRepository::new(), hasher, now)
        .register(registration())
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Email already exists");
}

#[rstest]
#[tokio::test]
async fn register_maps_racing_unique_violation(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users
        .expect_insert()
        .return_once(|_, _| Err(UserPersistenceError::duplicate_email("ann@example.com")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hashed".to_owned()));

    let err = build(users, MockSessionRepository::new(), hasher, now)
        .register(registration())
        .await
        .expect_err("duplicate");

    assert_eq!(err.message(), "Email already exists");
}

#[rstest]
#[tokio::test]
async fn register_store_failure_is_fixed_system_error(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserPersistenceError::connection("refused")));

    let err = build(
        users,
        MockSessionRepository::new(),
        MockPasswordHasher::new(),
        now,
    )
    .register(registration())
    .await
    .expect_err("system error");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "An error occurred during registration");
}

#[rstest]
#[tokio::test]
async fn login_opens_session_with_ttl(now: DateTime<Utc>) {
    let stored = account(now);
    let user_id = stored.user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email.as_ref() == "ops@example.com")
        .return_once(move |_| Ok(Some(stored)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, hash| password == "hunter2" && hash == "$argon2id$stored")
        .return_once(|_, _| Ok(true));
    let mut sessions = MockSessionRepository::new();
    let expected_expiry = now + TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS);
    sessions
        .expect_insert()
        .times(1)
        .withf(move |session| {
            session.user_id == user_id
                && session.expires_at == expected_expiry
                && session.created_at == now
        })
        .return_once(|_| Ok(()));

    let issued = build(users, sessions, hasher, now)
        .login(credentials())
        .await
        .expect("login succeeds");

    assert_eq!(issued.user_id, user_id);
    assert_eq!(issued.expires_at, expected_expiry);
    assert_eq!(issued.token.as_str().len(), 64);
}

#[rstest]
#[tokio::test]
async fn login_honours_configured_ttl(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account(now))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(true));
    let mut sessions = MockSessionRepository::new();
    sessions.expect_insert().return_once(|_| Ok(()));

    let issued = build(users, sessions, hasher, now)
        .with_session_ttl(TimeDelta::hours(1))
        .login(credentials())
        .await
        .expect("login succeeds");

    assert_eq!(issued.expires_at, now + TimeDelta::hours(1));
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn login_rejects_bad_credentials(now: DateTime<Utc>, #[case] known_email: bool) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(known_email.then(|| account(now))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(false));
    let mut sessions = MockSessionRepository::new();
    sessions.expect_insert().times(0);

    let err = build(users, sessions, hasher, now)
        .login(credentials())
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Invalid credentials");
}

#[rstest]
#[tokio::test]
async fn login_with_malformed_hash_is_system_error(now: DateTime<Utc>) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account(now))));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHashError::malformed_hash("bad phc")));

    let err = build(users, MockSessionRepository::new(), hasher, now)
        .login(credentials())
        .await
        .expect_err("system error");

    assert_eq!(err.message(), "An error occurred during login");
}

#[rstest]
#[tokio::test]
async fn logout_deletes_by_fingerprint(now: DateTime<Utc>) {
    let token = SessionToken::generate();
    let expected = token.fingerprint();
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_delete()
        .times(1)
        .withf(move |fingerprint| fingerprint == &expected)
        .return_once(|_| Ok(()));

    build(
        MockUserRepository::new(),
        sessions,
        MockPasswordHasher::new(),
        now,
    )
    .logout(&token)
    .await
    .expect("logout succeeds");
}

#[rstest]
#[tokio::test]
async fn logout_failure_is_fixed_system_error(now: DateTime<Utc>) {
    let mut sessions = MockSessionRepository::new();
    sessions
        .expect_delete()
        .return_once(|_| Err(SessionRepositoryError::query("timeout")));

    let err = build(
        MockUserRepository::new(),
        sessions,
        MockPasswordHasher::new(),
        now,
    )
    .logout(&SessionToken::generate())
    .await
    .expect_err("system error");

    assert_eq!(err.message(), "An error occurred during logout");
}
