//! Shipment lifecycle engine.
//!
//! Creates shipments and advances them through the status state machine. The
//! advance is delegated to [`ShipmentRepository::advance_status`], which runs
//! the transition check against the locked row and writes the shipment and
//! its tracking event in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    AdvanceOutcome, AdvanceStatusRequest, CreateShipmentRequest, ShipmentCommand,
    ShipmentRepository, ShipmentRepositoryError, StatusAdvanced,
};
use crate::domain::{
    AuthenticatedUser, Error, NewShipment, SHIPMENT_OPERATORS, Shipment, ShipmentId,
    StatusAdvance, TrackingEventId, TrackingNumber,
};

const CREATE_FAILED: &str = "An error occurred during creating shipment";
const ADVANCE_FAILED: &str = "An error occurred during updating shipment status";

fn system_error(message: &'static str, cause: &ShipmentRepositoryError) -> Error {
    error!(error = %cause, "{message}");
    Error::internal(message)
}

/// Service implementing [`ShipmentCommand`].
#[derive(Clone)]
pub struct ShipmentLifecycleService<R: ?Sized> {
    shipments: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> ShipmentLifecycleService<R> {
    /// Create the service over a shipment repository and clock.
    pub fn new(shipments: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { shipments, clock }
    }
}

#[async_trait]
impl<R> ShipmentCommand for ShipmentLifecycleService<R>
where
    R: ShipmentRepository + ?Sized,
{
    async fn create_shipment(
        &self,
        actor: &AuthenticatedUser,
        request: CreateShipmentRequest,
    ) -> Result<Shipment, Error> {
        actor.require_any_role(SHIPMENT_OPERATORS)?;
        let draft = NewShipment::new(actor.user_id(), &request.origin, &request.destination)?;
        let shipment = draft.into_shipment(
            ShipmentId::random(),
            TrackingNumber::generate(),
            self.clock.utc(),
        );

        self.shipments
            .insert(&shipment)
            .await
            .map_err(|err| system_error(CREATE_FAILED, &err))?;

        info!(
            shipment_id = %shipment.id,
            tracking_number = %shipment.tracking_number,
            user_id = %actor.user_id(),
            "shipment created"
        );
        Ok(shipment)
    }

    async fn advance_status(
        &self,
        actor: &AuthenticatedUser,
        request: AdvanceStatusRequest,
    ) -> Result<StatusAdvanced, Error> {
        actor.require_any_role(SHIPMENT_OPERATORS)?;
        let advance = StatusAdvance {
            shipment_id: request.shipment_id,
            actor: actor.user_id(),
            target: request.status,
            location: request.location,
            description: request.description,
        };

        let outcome = self
            .shipments
            .advance_status(&advance, TrackingEventId::random(), self.clock.utc())
            .await
            .map_err(|err| system_error(ADVANCE_FAILED, &err))?;

        match outcome {
            AdvanceOutcome::Applied { shipment, event } => {
                info!(
                    shipment_id = %shipment.id,
                    status = %shipment.status,
                    event_id = %event.id,
                    user_id = %actor.user_id(),
                    "shipment status advanced"
                );
                Ok(StatusAdvanced { shipment, event })
            }
            AdvanceOutcome::Missing => Err(Error::invalid_request("Shipment not found")),
            AdvanceOutcome::Rejected(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "shipment_lifecycle_tests.rs"]
mod tests;
