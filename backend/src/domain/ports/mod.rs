//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) describe what the domain
//! needs from storage and crypto adapters and raise typed errors generated by
//! `define_port_error!`. Driving ports (`*Command`, `*Query`,
//! [`SessionAuthorizer`]) are what inbound adapters call; they speak the
//! domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod session_authorizer;
mod session_repository;
mod shipment_command;
mod shipment_query;
mod shipment_repository;
mod tracking_event_command;
mod tracking_event_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, IssuedSession};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_authorizer::MockSessionAuthorizer;
pub use session_authorizer::SessionAuthorizer;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionRepository, SessionRepositoryError};
#[cfg(test)]
pub use shipment_command::MockShipmentCommand;
pub use shipment_command::{
    AdvanceStatusRequest, CreateShipmentRequest, ShipmentCommand, StatusAdvanced,
};
#[cfg(test)]
pub use shipment_query::MockShipmentQuery;
pub use shipment_query::ShipmentQuery;
#[cfg(test)]
pub use shipment_repository::MockShipmentRepository;
pub use shipment_repository::{AdvanceOutcome, ShipmentRepository, ShipmentRepositoryError};
#[cfg(test)]
pub use tracking_event_command::MockTrackingEventCommand;
pub use tracking_event_command::TrackingEventCommand;
#[cfg(test)]
pub use tracking_event_repository::MockTrackingEventRepository;
pub use tracking_event_repository::{
    AmendOutcome, TrackingEventRepository, TrackingEventRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};
