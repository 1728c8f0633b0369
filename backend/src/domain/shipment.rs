//! Shipment lifecycle model.
//!
//! Owns the status state machine together with the records it governs:
//! shipments and the append-only tracking events produced by each status
//! advance. Every mutation here is pure; ports persist the results.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Error, UserId};

/// Maximum stored length for origin and destination.
pub const PLACE_MAX: usize = 50;
/// Maximum stored length for a tracking event location.
pub const LOCATION_MAX: usize = 100;
/// Maximum stored length for a tracking number.
pub const TRACKING_NUMBER_MAX: usize = 20;

const TRACKING_PREFIX: &str = "TRK-";
const TRACKING_SUFFIX_LEN: usize = 10;

/// Delivery lifecycle state.
///
/// The chain is linear: `Created → PickedUp → InTransit → OutForDelivery →
/// Delivered`. `Delivered` is terminal. There is no "none" variant; the wire
/// value `"None"` is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// Registered, awaiting pickup.
    Created,
    /// Collected from the origin.
    PickedUp,
    /// Moving between hubs.
    InTransit,
    /// With the final courier.
    OutForDelivery,
    /// Handed over at the destination.
    Delivered,
}

/// Raised when a status name is unknown or is the `None` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status")]
pub struct InvalidStatus {
    /// Rejected input.
    pub value: String,
}

impl ShipmentStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::PickedUp,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Symbolic name used in storage and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::PickedUp => "PickedUp",
            Self::InTransit => "InTransit",
            Self::OutForDelivery => "OutForDelivery",
            Self::Delivered => "Delivered",
        }
    }

    /// The single allowed successor, or `None` once delivered.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::InTransit),
            Self::InTransit => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether moving from `self` to `next` is permitted.
    ///
    /// # Examples
    /// ```
    /// use shipment_backend::domain::ShipmentStatus;
    ///
    /// assert!(ShipmentStatus::Created.can_transition(ShipmentStatus::PickedUp));
    /// assert!(!ShipmentStatus::Created.can_transition(ShipmentStatus::InTransit));
    /// assert!(!ShipmentStatus::Delivered.can_transition(ShipmentStatus::Delivered));
    /// ```
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::PickedUp)
                | (Self::PickedUp, Self::InTransit)
                | (Self::InTransit, Self::OutForDelivery)
                | (Self::OutForDelivery, Self::Delivered)
        )
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = InvalidStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidStatus {
                value: value.to_owned(),
            })
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(
    /// Shipment identifier.
    ShipmentId
);
uuid_id!(
    /// Tracking event identifier.
    TrackingEventId
);

/// Public shipment reference of the form `TRK-` plus ten uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Generate a fresh tracking number from a random UUID.
    ///
    /// Collisions are not retried; the store's unique constraint rejects them.
    pub fn generate() -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(TRACKING_SUFFIX_LEN)
            .collect();
        Self(format!("{TRACKING_PREFIX}{}", suffix.to_uppercase()))
    }

    /// Normalise caller input for lookup: trimmed and upper-cased.
    ///
    /// # Examples
    /// ```
    /// use shipment_backend::domain::TrackingNumber;
    ///
    /// let number = TrackingNumber::normalise(" trk-0a1b2c3d4e ");
    /// assert_eq!(number.as_ref(), "TRK-0A1B2C3D4E");
    /// ```
    pub fn normalise(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Wrap a value read from storage.
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A shipment as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    /// Identifier.
    pub id: ShipmentId,
    /// Public reference.
    pub tracking_number: TrackingNumber,
    /// Pickup location.
    pub origin: String,
    /// Delivery location.
    pub destination: String,
    /// Current lifecycle state.
    pub status: ShipmentStatus,
    /// User who registered the shipment.
    pub owner: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// One recorded step of a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingEvent {
    /// Identifier.
    pub id: TrackingEventId,
    /// Owning shipment.
    pub shipment_id: ShipmentId,
    /// Status recorded by this event.
    pub status: ShipmentStatus,
    /// Where the event happened.
    pub location: String,
    /// Free-text note.
    pub description: String,
    /// Last user to write the event.
    pub updated_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last amendment time.
    pub updated_at: DateTime<Utc>,
}

fn check_length(value: &str, max: usize, label: &str) -> Result<(), Error> {
    if value.chars().count() > max {
        return Err(Error::invalid_request(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validated input for creating a shipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    owner: UserId,
    origin: String,
    destination: String,
}

impl NewShipment {
    /// Validate origin and destination.
    ///
    /// # Examples
    /// ```
    /// use shipment_backend::domain::{NewShipment, UserId};
    ///
    /// let err = NewShipment::new(UserId::random(), " ", "LA").expect_err("blank origin");
    /// assert_eq!(err.message(), "Origin is required");
    /// ```
    pub fn new(owner: UserId, origin: &str, destination: &str) -> Result<Self, Error> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() {
            return Err(Error::invalid_request("Origin is required"));
        }
        if destination.is_empty() {
            return Err(Error::invalid_request("Destination is required"));
        }
        check_length(origin, PLACE_MAX, "Origin")?;
        check_length(destination, PLACE_MAX, "Destination")?;
        Ok(Self {
            owner,
            origin: origin.to_owned(),
            destination: destination.to_owned(),
        })
    }

    /// Materialise the shipment in its initial `Created` state.
    pub fn into_shipment(
        self,
        id: ShipmentId,
        tracking_number: TrackingNumber,
        now: DateTime<Utc>,
    ) -> Shipment {
        Shipment {
            id,
            tracking_number,
            origin: self.origin,
            destination: self.destination,
            status: ShipmentStatus::Created,
            owner: self.owner,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller request to move a shipment to its next status.
///
/// `target` stays raw so an unknown or sentinel name is reported as an
/// invalid transition after the shipment has been found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAdvance {
    /// Shipment to advance.
    pub shipment_id: ShipmentId,
    /// Acting user recorded on the new event.
    pub actor: UserId,
    /// Requested status name.
    pub target: String,
    /// Where the change happened.
    pub location: String,
    /// Free-text note; required.
    pub description: Option<String>,
}

impl Shipment {
    /// Apply a status advance, returning the updated shipment and its new
    /// tracking event.
    ///
    /// Checks run in order: transition, location, description. The recorded
    /// time never precedes the shipment's last update, so a caller whose
    /// clock was read before waiting on a concurrent advance cannot move
    /// history backwards.
    pub fn advance(
        &self,
        request: &StatusAdvance,
        event_id: TrackingEventId,
        now: DateTime<Utc>,
    ) -> Result<(Self, TrackingEvent), Error> {
        let target = request.target.trim();
        let next = target
            .parse::<ShipmentStatus>()
            .ok()
            .filter(|next| self.status.can_transition(*next))
            .ok_or_else(|| {
                Error::invalid_request(format!(
                    "Invalid status transition: {} → {target}",
                    self.status
                ))
            })?;

        let location = request.location.trim();
        if location.is_empty() {
            return Err(Error::invalid_request("Location is required"));
        }
        check_length(location, LOCATION_MAX, "Location")?;

        let description = match request.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return Err(Error::invalid_request("Description is required")),
        };

        let at = now.max(self.updated_at);
        let shipment = Self {
            status: next,
            updated_at: at,
            ..self.clone()
        };
        let event = TrackingEvent {
            id: event_id,
            shipment_id: self.id,
            status: next,
            location: location.to_owned(),
            description: description.to_owned(),
            updated_by: request.actor,
            created_at: at,
            updated_at: at,
        };
        Ok((shipment, event))
    }
}

/// Partial update for an existing tracking event.
///
/// Blank strings count as absent. `status` stays raw so the sentinel and
/// unknown names are reported only after the event has been found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingEventPatch {
    /// Replacement status name.
    pub status: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

impl TrackingEvent {
    /// Apply `patch` without consulting the state machine.
    ///
    /// Fails with `"Invalid status"` for an unusable status and with
    /// `"Invalid action"` when no field would change.
    pub fn amend(
        &self,
        patch: &TrackingEventPatch,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let mut amended = self.clone();
        let mut touched = false;

        if let Some(raw) = non_blank(patch.status.as_deref()) {
            amended.status = raw
                .parse()
                .map_err(|err: InvalidStatus| Error::invalid_request(err.to_string()))?;
            touched = true;
        }
        if let Some(location) = non_blank(patch.location.as_deref()) {
            check_length(location, LOCATION_MAX, "Location")?;
            location.clone_into(&mut amended.location);
            touched = true;
        }
        if let Some(description) = non_blank(patch.description.as_deref()) {
            description.clone_into(&mut amended.description);
            touched = true;
        }

        if !touched {
            return Err(Error::invalid_request("Invalid action"));
        }
        amended.updated_by = actor;
        amended.updated_at = now.max(self.updated_at);
        Ok(amended)
    }
}
