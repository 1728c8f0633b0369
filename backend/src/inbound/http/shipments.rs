//! Shipment handlers for staff and administrators.
//!
//! ```text
//! POST  /api/shipments {"origin":"NYC","destination":"LA"}
//! GET   /api/shipments?pageNo=1&pageSize=20
//! GET   /api/shipments/{id}
//! GET   /api/shipments/{id}/events
//! PATCH /api/shipments/{id}/events {"status":"PickedUp","location":"Depot","description":"..."}
//! ```
//!
//! Role checks happen in the services; handlers only map payloads.

use actix_web::{get, patch, post, web};
use uuid::Uuid;

use crate::domain::{Error, ShipmentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    AdvanceStatusBody, CreateShipmentBody, ListShipmentsQuery, ShipmentResponse,
    StatusAdvancedResponse, TrackingEventResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionUser;
use crate::inbound::http::state::HttpState;

/// Parse a path identifier; malformed values are reported like unknown ones.
pub(crate) fn shipment_id_from_path(raw: &str) -> Result<ShipmentId, Error> {
    Uuid::parse_str(raw.trim())
        .map(ShipmentId::from_uuid)
        .map_err(|_| Error::invalid_request("Shipment not found"))
}

/// Register a shipment in the `Created` state.
#[utoipa::path(
    post,
    path = "/api/shipments",
    request_body = CreateShipmentBody,
    responses(
        (status = 200, description = "Shipment created", body = ShipmentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["shipments"],
    operation_id = "createShipment"
)]
#[post("/shipments")]
pub async fn create_shipment(
    state: web::Data<HttpState>,
    user: SessionUser,
    payload: web::Json<CreateShipmentBody>,
) -> ApiResult<web::Json<ShipmentResponse>> {
    let shipment = state
        .shipments
        .create_shipment(&user, payload.into_inner().into())
        .await?;
    Ok(web::Json(shipment.into()))
}

/// List shipments, newest first.
#[utoipa::path(
    get,
    path = "/api/shipments",
    params(ListShipmentsQuery),
    responses(
        (status = 200, description = "Shipments", body = [ShipmentResponse]),
        (status = 400, description = "Invalid paging", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["shipments"],
    operation_id = "listShipments"
)]
#[get("/shipments")]
pub async fn list_shipments(
    state: web::Data<HttpState>,
    user: SessionUser,
    query: web::Query<ListShipmentsQuery>,
) -> ApiResult<web::Json<Vec<ShipmentResponse>>> {
    let shipments = state
        .shipment_queries
        .list_shipments(&user, query.page_no(), query.page_size())
        .await?;
    Ok(web::Json(shipments.into_iter().map(Into::into).collect()))
}

/// Fetch one shipment.
#[utoipa::path(
    get,
    path = "/api/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment identifier")),
    responses(
        (status = 200, description = "Shipment", body = ShipmentResponse),
        (status = 400, description = "Shipment not found", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["shipments"],
    operation_id = "getShipment"
)]
#[get("/shipments/{id}")]
pub async fn get_shipment(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShipmentResponse>> {
    let id = shipment_id_from_path(&path)?;
    let shipment = state.shipment_queries.get_shipment(&user, id).await?;
    Ok(web::Json(shipment.into()))
}

/// A shipment's tracking history in creation order.
#[utoipa::path(
    get,
    path = "/api/shipments/{id}/events",
    params(("id" = Uuid, Path, description = "Shipment identifier")),
    responses(
        (status = 200, description = "Tracking events", body = [TrackingEventResponse]),
        (status = 400, description = "Shipment not found", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["shipments"],
    operation_id = "listShipmentEvents"
)]
#[get("/shipments/{id}/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<TrackingEventResponse>>> {
    let id = shipment_id_from_path(&path)?;
    let events = state.shipment_queries.list_events(&user, id).await?;
    Ok(web::Json(events.into_iter().map(Into::into).collect()))
}

/// Advance a shipment to its next status and record the tracking event.
#[utoipa::path(
    patch,
    path = "/api/shipments/{id}/events",
    params(("id" = Uuid, Path, description = "Shipment identifier")),
    request_body = AdvanceStatusBody,
    responses(
        (status = 200, description = "Status advanced", body = StatusAdvancedResponse),
        (status = 400, description = "Invalid transition or payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["shipments"],
    operation_id = "advanceShipmentStatus"
)]
#[patch("/shipments/{id}/events")]
pub async fn advance_status(
    state: web::Data<HttpState>,
    user: SessionUser,
    path: web::Path<String>,
    payload: web::Json<AdvanceStatusBody>,
) -> ApiResult<web::Json<StatusAdvancedResponse>> {
    let id = shipment_id_from_path(&path)?;
    let advanced = state
        .shipments
        .advance_status(&user, payload.into_inner().into_request(id))
        .await?;
    Ok(web::Json(advanced.into()))
}

#[cfg(test)]
#[path = "shipments_tests.rs"]
mod tests;
