//! HTTP inbound adapter exposing the shipment tracking REST API.

pub mod auth;
pub mod dto;
pub mod error;
pub mod events;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod shipments;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tracking;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` route together with the JSON and query error
/// handlers that turn extractor failures into domain errors.
///
/// The session gate and shared state are applied by the caller.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(shipments::create_shipment)
            .service(shipments::list_shipments)
            .service(shipments::get_shipment)
            .service(shipments::list_events)
            .service(shipments::advance_status)
            .service(tracking::track_shipment)
            .service(events::amend_event),
    );
}
