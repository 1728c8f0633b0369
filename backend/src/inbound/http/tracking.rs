//! Public tracking lookup.
//!
//! ```text
//! GET /api/tracking/TRK-0A1B2C3D4E
//! ```

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ShipmentResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Look up a shipment by tracking number without a session.
///
/// The number is trimmed and upper-cased before lookup.
#[utoipa::path(
    get,
    path = "/api/tracking/{trackingNo}",
    params(("trackingNo" = String, Path, description = "Tracking number", example = "TRK-0A1B2C3D4E")),
    responses(
        (status = 200, description = "Shipment", body = ShipmentResponse),
        (status = 400, description = "Shipment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tracking"],
    operation_id = "trackShipment",
    security([])
)]
#[get("/tracking/{tracking_no}")]
pub async fn track_shipment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShipmentResponse>> {
    let shipment = state
        .shipment_queries
        .get_by_tracking_number(&path)
        .await?;
    Ok(web::Json(shipment.into()))
}

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
