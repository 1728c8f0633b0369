//! Request and response payloads for the shipment tracking API.
//!
//! Every payload uses camelCase on the wire. Request bodies default missing
//! text fields to empty strings so the domain reports the field-specific
//! validation message instead of a generic body parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{AdvanceStatusRequest, CreateShipmentRequest, StatusAdvanced};
use crate::domain::{
    AuthValidationError, LoginCredentials, Registration, Shipment, ShipmentId, ShipmentStatus,
    TrackingEvent, TrackingEventPatch, User,
};

/// Default page number when the query omits `pageNo`.
pub const DEFAULT_PAGE_NO: i64 = 1;
/// Default page size when the query omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[schema(example = "Ann Staff")]
    pub name: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AuthValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.email, &value.password)
    }
}

/// Registered account, without credentials.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "Staff")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    #[schema(example = "ann@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AuthValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Session summary returned by login; the token itself travels only in the
/// `Authorization` cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logout successful")]
    pub message: String,
}

/// Body for `POST /api/shipments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateShipmentBody {
    #[schema(example = "NYC")]
    pub origin: String,
    #[schema(example = "LA")]
    pub destination: String,
}

impl From<CreateShipmentBody> for CreateShipmentRequest {
    fn from(value: CreateShipmentBody) -> Self {
        Self {
            origin: value.origin,
            destination: value.destination,
        }
    }
}

/// Query for `GET /api/shipments`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListShipmentsQuery {
    /// 1-based page number; defaults to 1.
    pub page_no: Option<i64>,
    /// Page size between 1 and 100; defaults to 20.
    pub page_size: Option<i64>,
}

impl ListShipmentsQuery {
    pub fn page_no(&self) -> i64 {
        self.page_no.unwrap_or(DEFAULT_PAGE_NO)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Body for `PATCH /api/shipments/{id}/events`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvanceStatusBody {
    #[schema(example = "PickedUp")]
    pub status: String,
    #[schema(example = "Newark depot")]
    pub location: String,
    pub description: Option<String>,
}

impl AdvanceStatusBody {
    pub fn into_request(self, shipment_id: ShipmentId) -> AdvanceStatusRequest {
        AdvanceStatusRequest {
            shipment_id,
            status: self.status,
            location: self.location,
            description: self.description,
        }
    }
}

/// Body for `PATCH /api/events/{id}`. Absent or blank fields are left alone.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AmendEventBody {
    pub status: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl From<AmendEventBody> for TrackingEventPatch {
    fn from(value: AmendEventBody) -> Self {
        Self {
            status: value.status,
            location: value.location,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub shipment_id: Uuid,
    #[schema(example = "TRK-0A1B2C3D4E")]
    pub tracking_no: String,
    pub origin: String,
    pub destination: String,
    #[schema(value_type = crate::inbound::http::schemas::ShipmentStatusSchema)]
    pub status: ShipmentStatus,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        Self {
            shipment_id: *shipment.id.as_uuid(),
            tracking_no: shipment.tracking_number.as_ref().to_owned(),
            origin: shipment.origin,
            destination: shipment.destination,
            status: shipment.status,
            user_id: *shipment.owner.as_uuid(),
            created_at: shipment.created_at,
            updated_at: shipment.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEventResponse {
    pub event_id: Uuid,
    pub shipment_id: Uuid,
    #[schema(value_type = crate::inbound::http::schemas::ShipmentStatusSchema)]
    pub status: ShipmentStatus,
    pub location: String,
    pub description: String,
    pub updated_by_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TrackingEvent> for TrackingEventResponse {
    fn from(event: TrackingEvent) -> Self {
        Self {
            event_id: *event.id.as_uuid(),
            shipment_id: *event.shipment_id.as_uuid(),
            status: event.status,
            location: event.location,
            description: event.description,
            updated_by_user_id: *event.updated_by.as_uuid(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Result of advancing a shipment: the new state and the event recording it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusAdvancedResponse {
    pub shipment: ShipmentResponse,
    pub tracking_event: TrackingEventResponse,
}

impl From<StatusAdvanced> for StatusAdvancedResponse {
    fn from(value: StatusAdvanced) -> Self {
        Self {
            shipment: value.shipment.into(),
            tracking_event: value.event.into(),
        }
    }
}
