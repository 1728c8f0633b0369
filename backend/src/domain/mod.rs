//! Domain primitives, aggregates and services.
//!
//! Purpose: define the shipment lifecycle, accounts and sessions as strongly
//! typed values, plus the services that drive them through ports. Nothing in
//! this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic error payload.
//! - ShipmentStatus and its state machine, Shipment and TrackingEvent.
//! - User, Session and AuthenticatedUser for the authorization gate.
//! - Services implementing the driving ports in [`ports`].

pub mod account_service;
pub mod auth;
pub mod authorization_gate;
pub mod error;
pub mod page;
pub mod ports;
pub mod shipment;
pub mod shipment_lifecycle;
pub mod shipment_query_service;
pub mod trace_id;
pub mod tracking_event_editor;
pub mod user;

pub use self::account_service::{AccountService, DEFAULT_SESSION_TTL_HOURS};
pub use self::auth::{
    AuthValidationError, AuthenticatedUser, EVENT_EDITORS, LoginCredentials, Registration,
    SHIPMENT_OPERATORS, Session, SessionFingerprint, SessionToken,
};
pub use self::authorization_gate::SessionGate;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::page::{MAX_PAGE_SIZE, PageRequest};
pub use self::shipment::{
    InvalidStatus, LOCATION_MAX, NewShipment, PLACE_MAX, Shipment, ShipmentId, ShipmentStatus,
    StatusAdvance, TRACKING_NUMBER_MAX, TrackingEvent, TrackingEventId, TrackingEventPatch,
    TrackingNumber,
};
pub use self::shipment_lifecycle::ShipmentLifecycleService;
pub use self::shipment_query_service::ShipmentQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::tracking_event_editor::TrackingEventEditor;
pub use self::user::{
    EMAIL_MAX, EmailAddress, USER_NAME_MAX, User, UserDraft, UserId, UserName, UserRole,
    UserValidationError,
};
