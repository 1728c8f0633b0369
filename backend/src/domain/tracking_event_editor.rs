//! Tracking event editor.
//!
//! Amends already-recorded events. Amendments bypass the state machine and
//! never touch the owning shipment, so a shipment's current status keeps
//! reflecting its most recently created event.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{AmendOutcome, TrackingEventCommand, TrackingEventRepository};
use crate::domain::{
    AuthenticatedUser, EVENT_EDITORS, Error, TrackingEvent, TrackingEventId, TrackingEventPatch,
};

const AMEND_FAILED: &str = "An error occurred during updating tracking event";

/// Service implementing [`TrackingEventCommand`].
#[derive(Clone)]
pub struct TrackingEventEditor<R: ?Sized> {
    events: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> TrackingEventEditor<R> {
    /// Create the editor over a tracking event repository and clock.
    pub fn new(events: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { events, clock }
    }
}

#[async_trait]
impl<R> TrackingEventCommand for TrackingEventEditor<R>
where
    R: TrackingEventRepository + ?Sized,
{
    async fn amend_event(
        &self,
        actor: &AuthenticatedUser,
        event_id: TrackingEventId,
        patch: TrackingEventPatch,
    ) -> Result<TrackingEvent, Error> {
        actor.require_any_role(EVENT_EDITORS)?;

        let outcome = self
            .events
            .amend(&event_id, &patch, actor.user_id(), self.clock.utc())
            .await
            .map_err(|err| {
                error!(error = %err, %event_id, "{AMEND_FAILED}");
                Error::internal(AMEND_FAILED)
            })?;

        match outcome {
            AmendOutcome::Applied(event) => {
                info!(%event_id, user_id = %actor.user_id(), "tracking event amended");
                Ok(event)
            }
            AmendOutcome::Missing => Err(Error::invalid_request("Tracking event not found")),
            AmendOutcome::Rejected(err) => Err(err),
        }
    }
}
