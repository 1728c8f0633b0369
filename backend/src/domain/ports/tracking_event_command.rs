//! Driving port for amending recorded tracking events.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, TrackingEvent, TrackingEventId, TrackingEventPatch};

/// Use-case port for the tracking event editor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingEventCommand: Send + Sync {
    /// Amend fields of an existing event without consulting the state machine.
    async fn amend_event(
        &self,
        actor: &AuthenticatedUser,
        event_id: TrackingEventId,
        patch: TrackingEventPatch,
    ) -> Result<TrackingEvent, Error>;
}
