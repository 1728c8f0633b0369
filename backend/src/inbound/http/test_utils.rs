//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::ServiceResponse;
use actix_web::{App, test, web};

use crate::domain::ports::{
    MockAccountCommand, MockSessionAuthorizer, MockShipmentCommand, MockShipmentQuery,
    MockTrackingEventCommand,
};
use crate::domain::{AuthenticatedUser, UserId, UserRole};

use super::configure_api;
use super::session::RequireSessionCookie;
use super::state::{CookiePolicy, HttpState};

/// Token value tests put in the `Authorization` cookie.
pub const TEST_TOKEN: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// Mocked driving ports; set expectations, then call [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountCommand,
    pub sessions: MockSessionAuthorizer,
    pub shipments: MockShipmentCommand,
    pub shipment_queries: MockShipmentQuery,
    pub tracking_events: MockTrackingEventCommand,
}

impl TestPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every session resolve to a user with `role`.
    pub fn signed_in_as(mut self, role: UserRole) -> (Self, AuthenticatedUser) {
        let user = AuthenticatedUser::new(UserId::random(), role);
        self.sessions
            .expect_resolve()
            .returning(move |_| Ok(user));
        (self, user)
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            sessions: Arc::new(self.sessions),
            shipments: Arc::new(self.shipments),
            shipment_queries: Arc::new(self.shipment_queries),
            tracking_events: Arc::new(self.tracking_events),
            cookies: CookiePolicy { secure: false },
        })
    }
}

/// Cookie carrying [`TEST_TOKEN`].
pub fn session_cookie() -> actix_web::cookie::Cookie<'static> {
    actix_web::cookie::Cookie::new(super::session::SESSION_COOKIE, TEST_TOKEN)
}

/// Run one request through the full `/api` surface behind the session gate.
pub async fn call_api(
    ports: TestPorts,
    request: test::TestRequest,
) -> ServiceResponse<EitherBody<BoxBody>> {
    let app = test::init_service(
        App::new()
            .app_data(ports.into_state())
            .wrap(RequireSessionCookie)
            .configure(configure_api),
    )
    .await;
    test::call_service(&app, request.to_request()).await
}
