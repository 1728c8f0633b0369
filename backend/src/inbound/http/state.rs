//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, SessionAuthorizer, ShipmentCommand, ShipmentQuery, TrackingEventCommand,
};

/// Cookie attributes applied to the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Whether the cookie carries the `Secure` attribute.
    pub secure: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub sessions: Arc<dyn SessionAuthorizer>,
    pub shipments: Arc<dyn ShipmentCommand>,
    pub shipment_queries: Arc<dyn ShipmentQuery>,
    pub tracking_events: Arc<dyn TrackingEventCommand>,
    pub cookies: CookiePolicy,
}
