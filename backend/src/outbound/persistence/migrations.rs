//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while connecting or applying migrations.
#[derive(Debug, thiserror::Error)]
#[error("migration failed: {message}")]
pub struct MigrationError {
    message: String,
}

/// Apply pending migrations over a blocking connection.
///
/// Call from `spawn_blocking` when running inside the async runtime.
pub fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| MigrationError {
        message: err.to_string(),
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}
