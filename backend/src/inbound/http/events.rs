//! Administrative amendment of recorded tracking events.
//!
//! ```text
//! PATCH /api/events/{id} {"location":"Corrected depot"}
//! ```

use actix_web::{patch, web};
use uuid::Uuid;

use crate::domain::{Error, TrackingEventId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AmendEventBody, TrackingEventResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionUser;
use crate::inbound::http::state::HttpState;

/// Amend status, location or description of an event.
///
/// The shipment's own status is never touched.
#[utoipa::path(
    patch,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Tracking event identifier")),
    request_body = AmendEventBody,
    responses(
        (status = 200, description = "Event amended", body = TrackingEventResponse),
        (status = 400, description = "Invalid amendment or unknown event", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "amendTrackingEvent"
)]
#[patch("/events/{id}")]
pub async fn amend_event(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
    payload: web::Json<AmendEventBody>,
) -> ApiResult<web::Json<TrackingEventResponse>> {
    let event_id = Uuid::parse_str(path.trim())
        .map(TrackingEventId::from_uuid)
        .map_err(|_| Error::invalid_request("Tracking event not found"))?;
    let event = state
        .tracking_events
        .amend_event(&user, event_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(event.into()))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
