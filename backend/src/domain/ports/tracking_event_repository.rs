//! Port for amending recorded tracking events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, TrackingEvent, TrackingEventId, TrackingEventPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tracking event repository adapters.
    pub enum TrackingEventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tracking event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "tracking event repository query failed: {message}",
    }
}

/// Result of attempting an amendment inside the store's transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum AmendOutcome {
    /// The event was rewritten.
    Applied(TrackingEvent),
    /// No event has the requested identifier.
    Missing,
    /// The patch was rejected; the event is unchanged.
    Rejected(Error),
}

/// Port for read-modify-write of a single tracking event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingEventRepository: Send + Sync {
    /// Lock the event, apply [`TrackingEvent::amend`] and persist the result.
    async fn amend(
        &self,
        id: &TrackingEventId,
        patch: &TrackingEventPatch,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmendOutcome, TrackingEventRepositoryError>;
}
