//! Shipment query service: list, lookup by id or tracking number, and event
//! history.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{ShipmentQuery, ShipmentRepository, ShipmentRepositoryError};
use crate::domain::{
    AuthenticatedUser, Error, PageRequest, SHIPMENT_OPERATORS, Shipment, ShipmentId,
    TrackingEvent, TrackingNumber,
};

const LIST_FAILED: &str = "An error occurred during retrieving shipments";
const GET_FAILED: &str = "An error occurred during retrieving shipment";
const EVENTS_FAILED: &str = "An error occurred during retrieving tracking events";

fn system_error(message: &'static str) -> impl FnOnce(ShipmentRepositoryError) -> Error {
    move |cause| {
        error!(error = %cause, "{message}");
        Error::internal(message)
    }
}

fn not_found() -> Error {
    Error::invalid_request("Shipment not found")
}

/// Service implementing [`ShipmentQuery`].
#[derive(Clone)]
pub struct ShipmentQueryService<R: ?Sized> {
    shipments: Arc<R>,
}

impl<R: ?Sized> ShipmentQueryService<R> {
    /// Create the service over a shipment repository.
    pub fn new(shipments: Arc<R>) -> Self {
        Self { shipments }
    }
}

#[async_trait]
impl<R> ShipmentQuery for ShipmentQueryService<R>
where
    R: ShipmentRepository + ?Sized,
{
    async fn list_shipments(
        &self,
        actor: &AuthenticatedUser,
        page_no: i64,
        page_size: i64,
    ) -> Result<Vec<Shipment>, Error> {
        actor.require_any_role(SHIPMENT_OPERATORS)?;
        let page = PageRequest::new(page_no, page_size)?;
        let shipments = self
            .shipments
            .list_page(page)
            .await
            .map_err(system_error(LIST_FAILED))?;
        info!(count = shipments.len(), page_no, "shipments listed");
        Ok(shipments)
    }

    async fn get_shipment(
        &self,
        actor: &AuthenticatedUser,
        id: ShipmentId,
    ) -> Result<Shipment, Error> {
        actor.require_any_role(SHIPMENT_OPERATORS)?;
        self.shipments
            .find_by_id(&id)
            .await
            .map_err(system_error(GET_FAILED))?
            .ok_or_else(not_found)
    }

    async fn get_by_tracking_number(&self, tracking_number: &str) -> Result<Shipment, Error> {
        let number = TrackingNumber::normalise(tracking_number);
        if number.as_ref().is_empty() {
            return Err(not_found());
        }
        self.shipments
            .find_by_tracking_number(&number)
            .await
            .map_err(system_error(GET_FAILED))?
            .ok_or_else(not_found)
    }

    async fn list_events(
        &self,
        actor: &AuthenticatedUser,
        id: ShipmentId,
    ) -> Result<Vec<TrackingEvent>, Error> {
        actor.require_any_role(SHIPMENT_OPERATORS)?;
        let exists = self
            .shipments
            .find_by_id(&id)
            .await
            .map_err(system_error(EVENTS_FAILED))?
            .is_some();
        if !exists {
            return Err(not_found());
        }
        self.shipments
            .list_events(&id)
            .await
            .map_err(system_error(EVENTS_FAILED))
    }
}
