//! Port for shipment persistence, including the locked status advance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Error, PageRequest, Shipment, ShipmentId, StatusAdvance, TrackingEvent, TrackingEventId,
    TrackingNumber,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shipment repository adapters.
    pub enum ShipmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "shipment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "shipment repository query failed: {message}",
        /// A generated tracking number is already taken.
        DuplicateTrackingNumber { tracking_number: String } =>
            "tracking number already exists: {tracking_number}",
    }
}

/// Result of attempting a status advance inside the store's transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The shipment was updated and the event appended atomically.
    Applied {
        /// Shipment after the advance.
        shipment: Shipment,
        /// Event recorded for the advance.
        event: TrackingEvent,
    },
    /// No shipment has the requested identifier.
    Missing,
    /// The locked shipment rejected the advance; nothing was written.
    Rejected(Error),
}

/// Port for reading and mutating shipments and their tracking history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Persist a newly created shipment.
    async fn insert(&self, shipment: &Shipment) -> Result<(), ShipmentRepositoryError>;

    /// Find a shipment by identifier.
    async fn find_by_id(
        &self,
        id: &ShipmentId,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError>;

    /// Find a shipment by its public tracking number.
    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError>;

    /// List shipments newest first.
    async fn list_page(&self, page: PageRequest) -> Result<Vec<Shipment>, ShipmentRepositoryError>;

    /// List a shipment's events in creation order.
    async fn list_events(
        &self,
        id: &ShipmentId,
    ) -> Result<Vec<TrackingEvent>, ShipmentRepositoryError>;

    /// Lock the shipment, apply [`Shipment::advance`] and persist the updated
    /// shipment together with the new event in one transaction.
    ///
    /// Concurrent calls for the same shipment serialise on the lock, so the
    /// transition check always sees the committed status.
    async fn advance_status(
        &self,
        request: &StatusAdvance,
        event_id: TrackingEventId,
        now: DateTime<Utc>,
    ) -> Result<AdvanceOutcome, ShipmentRepositoryError>;
}
