//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel with a bb8 pool.
//! - **memory**: process-local store used when no database is configured.
//! - **security**: Argon2id password hashing.
//!
//! Adapters translate between domain values and infrastructure
//! representations. Business rules stay in the domain.

pub mod memory;
pub mod persistence;
pub mod security;
