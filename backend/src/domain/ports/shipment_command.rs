//! Driving port for shipment lifecycle mutations.
//!
//! Inbound adapters call this port with the identity resolved by the
//! authorization gate; the implementation enforces role requirements.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Shipment, ShipmentId, TrackingEvent};

/// Request to register a new shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateShipmentRequest {
    /// Pickup location.
    pub origin: String,
    /// Delivery location.
    pub destination: String,
}

/// Request to move a shipment to its next status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceStatusRequest {
    /// Shipment to advance.
    pub shipment_id: ShipmentId,
    /// Requested status name.
    pub status: String,
    /// Where the change happened.
    pub location: String,
    /// Free-text note; required.
    pub description: Option<String>,
}

/// Shipment and event produced by a successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAdvanced {
    /// Shipment after the advance.
    pub shipment: Shipment,
    /// Event recorded for the advance.
    pub event: TrackingEvent,
}

/// Use-case port for creating and advancing shipments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentCommand: Send + Sync {
    /// Create a shipment in the `Created` state owned by `actor`.
    async fn create_shipment(
        &self,
        actor: &AuthenticatedUser,
        request: CreateShipmentRequest,
    ) -> Result<Shipment, Error>;

    /// Advance a shipment and append its tracking event atomically.
    async fn advance_status(
        &self,
        actor: &AuthenticatedUser,
        request: AdvanceStatusRequest,
    ) -> Result<StatusAdvanced, Error>;
}
