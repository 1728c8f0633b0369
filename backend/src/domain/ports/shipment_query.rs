//! Driving port for shipment reads.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Shipment, ShipmentId, TrackingEvent};

/// Use-case port for listing and looking up shipments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentQuery: Send + Sync {
    /// One page of shipments, newest first.
    async fn list_shipments(
        &self,
        actor: &AuthenticatedUser,
        page_no: i64,
        page_size: i64,
    ) -> Result<Vec<Shipment>, Error>;

    /// A shipment by identifier.
    async fn get_shipment(
        &self,
        actor: &AuthenticatedUser,
        id: ShipmentId,
    ) -> Result<Shipment, Error>;

    /// Public lookup by tracking number.
    async fn get_by_tracking_number(&self, tracking_number: &str) -> Result<Shipment, Error>;

    /// A shipment's events in creation order.
    async fn list_events(
        &self,
        actor: &AuthenticatedUser,
        id: ShipmentId,
    ) -> Result<Vec<TrackingEvent>, Error>;
}
