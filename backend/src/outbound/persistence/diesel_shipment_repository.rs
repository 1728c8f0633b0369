//! PostgreSQL-backed [`ShipmentRepository`].
//!
//! Status advances lock the shipment row with `SELECT ... FOR UPDATE`, so two
//! concurrent advances of the same shipment are checked one after the other
//! against the committed status. The shipment update and the event insert
//! share one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{AdvanceOutcome, ShipmentRepository, ShipmentRepositoryError};
use crate::domain::{
    PageRequest, Shipment, ShipmentId, ShipmentStatus, StatusAdvance, TrackingEvent,
    TrackingEventId, TrackingNumber, UserId,
};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewShipmentRow, NewTrackingEventRow, ShipmentRow, TrackingEventRow};
use super::pool::DbPool;
use super::schema::{shipments, tracking_events};

/// Diesel implementation of the shipment repository port.
#[derive(Clone)]
pub struct DieselShipmentRepository {
    pool: DbPool,
}

impl DieselShipmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: diesel::result::Error) -> ShipmentRepositoryError {
    map_diesel_error(
        error,
        ShipmentRepositoryError::query,
        ShipmentRepositoryError::connection,
    )
}

/// Parse a stored status, reporting unknown values through `invalid`.
fn decode_status<E>(
    raw: &str,
    invalid: impl FnOnce(String) -> E,
) -> Result<ShipmentStatus, E> {
    raw.parse()
        .map_err(|_| invalid(format!("unknown stored status {raw:?}")))
}

fn row_to_shipment(row: ShipmentRow) -> Result<Shipment, ShipmentRepositoryError> {
    Ok(Shipment {
        status: decode_status(&row.status, ShipmentRepositoryError::query)?,
        id: ShipmentId::from_uuid(row.id),
        tracking_number: TrackingNumber::from_stored(row.tracking_number),
        origin: row.origin,
        destination: row.destination,
        owner: UserId::from_uuid(row.owner_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(super) fn row_to_event<E>(
    row: TrackingEventRow,
    invalid: impl FnOnce(String) -> E,
) -> Result<TrackingEvent, E> {
    Ok(TrackingEvent {
        status: decode_status(&row.status, invalid)?,
        id: TrackingEventId::from_uuid(row.id),
        shipment_id: ShipmentId::from_uuid(row.shipment_id),
        location: row.location,
        description: row.description,
        updated_by: UserId::from_uuid(row.updated_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn new_event_row(event: &TrackingEvent) -> NewTrackingEventRow<'_> {
    NewTrackingEventRow {
        id: *event.id.as_uuid(),
        shipment_id: *event.shipment_id.as_uuid(),
        status: event.status.as_str(),
        location: &event.location,
        description: &event.description,
        updated_by: *event.updated_by.as_uuid(),
        created_at: event.created_at,
        updated_at: event.updated_at,
    }
}

/// Failures raised inside the advance transaction.
enum AdvanceFailure {
    Diesel(diesel::result::Error),
    Decode(ShipmentRepositoryError),
}

impl From<diesel::result::Error> for AdvanceFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl ShipmentRepository for DieselShipmentRepository {
    async fn insert(&self, shipment: &Shipment) -> Result<(), ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        let row = NewShipmentRow {
            id: *shipment.id.as_uuid(),
            tracking_number: shipment.tracking_number.as_ref(),
            origin: &shipment.origin,
            destination: &shipment.destination,
            status: shipment.status.as_str(),
            owner_id: *shipment.owner.as_uuid(),
            created_at: shipment.created_at,
            updated_at: shipment.updated_at,
        };

        diesel::insert_into(shipments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ShipmentRepositoryError::duplicate_tracking_number(
                        shipment.tracking_number.as_ref(),
                    )
                } else {
                    query_error(err)
                }
            })
    }

    async fn find_by_id(
        &self,
        id: &ShipmentId,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        shipments::table
            .find(id.as_uuid())
            .select(ShipmentRow::as_select())
            .first::<ShipmentRow>(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_shipment)
            .transpose()
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> Result<Option<Shipment>, ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        shipments::table
            .filter(shipments::tracking_number.eq(tracking_number.as_ref()))
            .select(ShipmentRow::as_select())
            .first::<ShipmentRow>(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(row_to_shipment)
            .transpose()
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Shipment>, ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        let rows: Vec<ShipmentRow> = shipments::table
            .order((shipments::created_at.desc(), shipments::id.desc()))
            .offset(page.offset())
            .limit(page.limit())
            .select(ShipmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        rows.into_iter().map(row_to_shipment).collect()
    }

    async fn list_events(
        &self,
        id: &ShipmentId,
    ) -> Result<Vec<TrackingEvent>, ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        let rows: Vec<TrackingEventRow> = tracking_events::table
            .filter(tracking_events::shipment_id.eq(id.as_uuid()))
            .order(tracking_events::seq.asc())
            .select(TrackingEventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        rows.into_iter()
            .map(|row| row_to_event(row, ShipmentRepositoryError::query))
            .collect()
    }

    async fn advance_status(
        &self,
        request: &StatusAdvance,
        event_id: TrackingEventId,
        now: DateTime<Utc>,
    ) -> Result<AdvanceOutcome, ShipmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ShipmentRepositoryError::connection))?;

        let outcome = conn
            .transaction::<_, AdvanceFailure, _>(|conn| {
                async move {
                    let locked = shipments::table
                        .find(request.shipment_id.as_uuid())
                        .for_update()
                        .select(ShipmentRow::as_select())
                        .first::<ShipmentRow>(conn)
                        .await
                        .optional()?;
                    let Some(row) = locked else {
                        return Ok(AdvanceOutcome::Missing);
                    };
                    let current = row_to_shipment(row).map_err(AdvanceFailure::Decode)?;

                    let (shipment, event) = match current.advance(request, event_id, now) {
                        Ok(applied) => applied,
                        Err(rejection) => return Ok(AdvanceOutcome::Rejected(rejection)),
                    };

                    diesel::update(shipments::table.find(shipment.id.as_uuid()))
                        .set((
                            shipments::status.eq(shipment.status.as_str()),
                            shipments::updated_at.eq(shipment.updated_at),
                        ))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(tracking_events::table)
                        .values(&new_event_row(&event))
                        .execute(conn)
                        .await?;

                    Ok(AdvanceOutcome::Applied { shipment, event })
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(outcome) => Ok(outcome),
            Err(AdvanceFailure::Diesel(err)) => Err(query_error(err)),
            Err(AdvanceFailure::Decode(err)) => Err(err),
        }
    }
}
