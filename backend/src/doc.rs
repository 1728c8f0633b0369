//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the `Authorization` cookie security
//! scheme. Swagger UI serves it in debug builds and the `openapi-dump` binary
//! prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::dto::{
    AdvanceStatusBody, AmendEventBody, CreateShipmentBody, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, RegisterResponse, ShipmentResponse, StatusAdvancedResponse,
    TrackingEventResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ShipmentStatusSchema};
use crate::inbound::http::session::SESSION_COOKIE;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the shipment tracking API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shipment tracking API",
        description = "Shipment lifecycle, tracking history and cookie-session accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::shipments::create_shipment,
        crate::inbound::http::shipments::list_shipments,
        crate::inbound::http::shipments::get_shipment,
        crate::inbound::http::shipments::list_events,
        crate::inbound::http::shipments::advance_status,
        crate::inbound::http::tracking::track_shipment,
        crate::inbound::http::events::amend_event,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ShipmentStatusSchema,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        CreateShipmentBody,
        AdvanceStatusBody,
        AmendEventBody,
        ShipmentResponse,
        TrackingEventResponse,
        StatusAdvancedResponse,
    )),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "shipments", description = "Shipment lifecycle for staff"),
        (name = "tracking", description = "Public tracking lookup"),
        (name = "events", description = "Administrative event amendments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
