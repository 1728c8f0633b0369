//! PostgreSQL-backed [`SessionRepository`].
//!
//! Only token fingerprints are stored; a leaked table cannot be replayed as
//! cookies.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SessionRepository, SessionRepositoryError};
use crate::domain::{Session, SessionFingerprint, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::SessionRow;
use super::pool::DbPool;
use super::schema::login_sessions;

/// Diesel implementation of the session store port.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> SessionRepositoryError {
    map_diesel_error(
        error,
        SessionRepositoryError::query,
        SessionRepositoryError::connection,
    )
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            fingerprint: SessionFingerprint::from_stored(row.fingerprint),
            user_id: UserId::from_uuid(row.user_id),
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SessionRepositoryError::connection))?;

        let row = SessionRow {
            fingerprint: session.fingerprint.as_ref().to_owned(),
            user_id: *session.user_id.as_uuid(),
            expires_at: session.expires_at,
            created_at: session.created_at,
        };
        diesel::insert_into(login_sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(query_error)
    }

    async fn find(
        &self,
        fingerprint: &SessionFingerprint,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SessionRepositoryError::connection))?;

        let row = login_sessions::table
            .find(fingerprint.as_ref())
            .select(SessionRow::as_select())
            .first::<SessionRow>(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(Session::from))
    }

    async fn delete(&self, fingerprint: &SessionFingerprint) -> Result<(), SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SessionRepositoryError::connection))?;

        diesel::delete(login_sessions::table.find(fingerprint.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(query_error)
    }
}
