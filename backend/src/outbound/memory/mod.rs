//! In-memory adapters for every driven port.
//!
//! Used when no database URL is configured and by tests that exercise the
//! services end to end. All state sits behind one async mutex, so writers are
//! serialised the same way row locks serialise them in PostgreSQL: a status
//! advance reads, checks and writes without another advance interleaving.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    AdvanceOutcome, AmendOutcome, SessionRepository, SessionRepositoryError, ShipmentRepository,
    ShipmentRepositoryError, TrackingEventRepository, TrackingEventRepositoryError, UserAccount,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, PageRequest, Session, SessionFingerprint, Shipment, ShipmentId, StatusAdvance,
    TrackingEvent, TrackingEventId, TrackingEventPatch, TrackingNumber, User, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    sessions: HashMap<SessionFingerprint, Session>,
    shipments: HashMap<ShipmentId, Shipment>,
    events: Vec<TrackingEvent>,
}

/// Process-local store implementing the user, session, shipment and tracking
/// event repositories.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_index(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|account| account.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(
            user.id(),
            UserAccount {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.get(id).map(|account| account.user.clone()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let mut state = self.state.lock().await;
        state
            .sessions
            .insert(session.fingerprint.clone(), session.clone());
        Ok(())
    }

    async fn find(
        &self,
        fingerprint: &SessionFingerprint,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.sessions.get(fingerprint).cloned())
    }

    async fn delete(&self, fingerprint: &SessionFingerprint) -> Result<(), SessionRepositoryError> {
        let mut state = self.state.lock().await;
        state.sessions.remove(fingerprint);
        Ok(())
    }
}

#[async_trait]
impl ShipmentRepository for InMemoryStore {
    async fn insert(&self, shipment: &Shipment) -> Result<(), ShipmentRepositoryError> {
        let mut state = self.state.lock().await;
        if state
            .shipments
            .values()
            .any(|existing| existing.tracking_number == shipment.tracking_number)
        {
            return Err(ShipmentRepositoryError::duplicate_tracking_number(
                shipment.tracking_number.as_ref(),
            ));
        }
        state.shipments.insert(shipment.id, shipment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ShipmentId,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.shipments.get(id).cloned())
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .shipments
            .values()
            .find(|shipment| &shipment.tracking_number == tracking_number)
            .cloned())
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Shipment>, ShipmentRepositoryError> {
        let state = self.state.lock().await;
        let mut shipments: Vec<Shipment> = state.shipments.values().cloned().collect();
        shipments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(shipments
            .into_iter()
            .skip(to_index(page.offset()))
            .take(to_index(page.limit()))
            .collect())
    }

    async fn list_events(
        &self,
        id: &ShipmentId,
    ) -> Result<Vec<TrackingEvent>, ShipmentRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .events
            .iter()
            .filter(|event| &event.shipment_id == id)
            .cloned()
            .collect())
    }

    async fn advance_status(
        &self,
        request: &StatusAdvance,
        event_id: TrackingEventId,
        now: DateTime<Utc>,
    ) -> Result<AdvanceOutcome, ShipmentRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(current) = state.shipments.get(&request.shipment_id) else {
            return Ok(AdvanceOutcome::Missing);
        };
        let (shipment, event) = match current.advance(request, event_id, now) {
            Ok(applied) => applied,
            Err(err) => return Ok(AdvanceOutcome::Rejected(err)),
        };
        state.shipments.insert(shipment.id, shipment.clone());
        state.events.push(event.clone());
        Ok(AdvanceOutcome::Applied { shipment, event })
    }
}

#[async_trait]
impl TrackingEventRepository for InMemoryStore {
    async fn amend(
        &self,
        id: &TrackingEventId,
        patch: &TrackingEventPatch,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmendOutcome, TrackingEventRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(slot) = state.events.iter_mut().find(|event| &event.id == id) else {
            return Ok(AmendOutcome::Missing);
        };
        match slot.amend(patch, actor, now) {
            Ok(amended) => {
                *slot = amended.clone();
                Ok(AmendOutcome::Applied(amended))
            }
            Err(err) => Ok(AmendOutcome::Rejected(err)),
        }
    }
}
