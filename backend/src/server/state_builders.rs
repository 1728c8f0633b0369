//! Builders wiring repositories into services and services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use shipment_backend::domain::ports::{
    SessionRepository, ShipmentRepository, TrackingEventRepository, UserRepository,
};
use shipment_backend::domain::{
    AccountService, SessionGate, ShipmentLifecycleService, ShipmentQueryService,
    TrackingEventEditor,
};
use shipment_backend::inbound::http::session_config::SessionSettings;
use shipment_backend::inbound::http::state::HttpState;
use shipment_backend::outbound::memory::InMemoryStore;
use shipment_backend::outbound::persistence::{
    DbPool, DieselSessionRepository, DieselShipmentRepository, DieselTrackingEventRepository,
    DieselUserRepository,
};
use shipment_backend::outbound::security::Argon2PasswordHasher;

/// Driven ports shared by the services.
pub(super) struct Repositories {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    shipments: Arc<dyn ShipmentRepository>,
    events: Arc<dyn TrackingEventRepository>,
}

impl Repositories {
    /// PostgreSQL adapters over one pool.
    pub(super) fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
            shipments: Arc::new(DieselShipmentRepository::new(pool.clone())),
            events: Arc::new(DieselTrackingEventRepository::new(pool.clone())),
        }
    }

    /// One in-memory store behind every port.
    pub(super) fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            sessions: store.clone(),
            shipments: store.clone(),
            events: store,
        }
    }
}

/// Build the shared HTTP state over `repositories`.
pub(super) fn build_http_state(
    repositories: Repositories,
    session: SessionSettings,
) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let Repositories {
        users,
        sessions,
        shipments,
        events,
    } = repositories;

    let accounts = AccountService::new(
        users.clone(),
        sessions.clone(),
        Arc::new(Argon2PasswordHasher::default()),
        clock.clone(),
    )
    .with_session_ttl(session.ttl);

    web::Data::new(HttpState {
        accounts: Arc::new(accounts),
        sessions: Arc::new(SessionGate::new(sessions, users, clock.clone())),
        shipments: Arc::new(ShipmentLifecycleService::new(shipments.clone(), clock.clone())),
        shipment_queries: Arc::new(ShipmentQueryService::new(shipments)),
        tracking_events: Arc::new(TrackingEventEditor::new(events, clock)),
        cookies: session.cookie,
    })
}
