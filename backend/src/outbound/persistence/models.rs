//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them into
//! domain values and report undecodable rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{login_sessions, shipments, tracking_events, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = login_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub fingerprint: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShipmentRow {
    pub id: Uuid,
    pub tracking_number: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shipments)]
pub(crate) struct NewShipmentRow<'a> {
    pub id: Uuid,
    pub tracking_number: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub status: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tracking_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrackingEventRow {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub status: String,
    pub location: String,
    pub description: String,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tracking_events)]
pub(crate) struct NewTrackingEventRow<'a> {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub status: &'a str,
    pub location: &'a str,
    pub description: &'a str,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns an amendment may rewrite.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tracking_events)]
pub(crate) struct TrackingEventUpdate<'a> {
    pub status: &'a str,
    pub location: &'a str,
    pub description: &'a str,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
}
