//! PostgreSQL-backed [`TrackingEventRepository`].
//!
//! Amendments lock the event row, apply the patch in the domain and write the
//! result back. The parent shipment is never touched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AmendOutcome, TrackingEventRepository, TrackingEventRepositoryError};
use crate::domain::{TrackingEventId, TrackingEventPatch, UserId};

use super::diesel_shipment_repository::row_to_event;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{TrackingEventRow, TrackingEventUpdate};
use super::pool::DbPool;
use super::schema::tracking_events;

/// Diesel implementation of the tracking event repository port.
#[derive(Clone)]
pub struct DieselTrackingEventRepository {
    pool: DbPool,
}

impl DieselTrackingEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> TrackingEventRepositoryError {
    map_diesel_error(
        error,
        TrackingEventRepositoryError::query,
        TrackingEventRepositoryError::connection,
    )
}

enum AmendFailure {
    Diesel(diesel::result::Error),
    Decode(TrackingEventRepositoryError),
}

impl From<diesel::result::Error> for AmendFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl TrackingEventRepository for DieselTrackingEventRepository {
    async fn amend(
        &self,
        id: &TrackingEventId,
        patch: &TrackingEventPatch,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<AmendOutcome, TrackingEventRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TrackingEventRepositoryError::connection))?;

        let outcome = conn
            .transaction::<_, AmendFailure, _>(|conn| {
                async move {
                    let locked = tracking_events::table
                        .find(id.as_uuid())
                        .for_update()
                        .select(TrackingEventRow::as_select())
                        .first::<TrackingEventRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = locked else {
                        return Ok(AmendOutcome::Missing);
                    };
                    let current = row_to_event(row, TrackingEventRepositoryError::query)
                        .map_err(AmendFailure::Decode)?;

                    let amended = match current.amend(patch, actor, now) {
                        Ok(amended) => amended,
                        Err(rejection) => return Ok(AmendOutcome::Rejected(rejection)),
                    };

                    diesel::update(tracking_events::table.find(amended.id.as_uuid()))
                        .set(&TrackingEventUpdate {
                            status: amended.status.as_str(),
                            location: &amended.location,
                            description: &amended.description,
                            updated_by: *amended.updated_by.as_uuid(),
                            updated_at: amended.updated_at,
                        })
                        .execute(conn)
                        .await?;

                    Ok(AmendOutcome::Applied(amended))
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(outcome) => Ok(outcome),
            Err(AmendFailure::Diesel(err)) => Err(query_error(err)),
            Err(AmendFailure::Decode(err)) => Err(err),
        }
    }
}
