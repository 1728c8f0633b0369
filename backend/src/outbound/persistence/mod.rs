//! PostgreSQL persistence adapters built on Diesel.
//!
//! Repositories are thin translators between row structs (`models.rs`,
//! `schema.rs`) and domain values. Connections come from a `bb8` pool of
//! `diesel-async` connections; every failure is mapped onto the owning
//! port's error type with fixed, SQL-free messages.
//!
//! ```ignore
//! use shipment_backend::outbound::persistence::{DbPool, DieselShipmentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shipments")).await?;
//! let shipments = DieselShipmentRepository::new(pool);
//! ```

mod diesel_session_repository;
mod diesel_shipment_repository;
mod diesel_tracking_event_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_shipment_repository::DieselShipmentRepository;
pub use diesel_tracking_event_repository::DieselTrackingEventRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
