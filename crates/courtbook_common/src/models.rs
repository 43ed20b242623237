// --- File: crates/courtbook_common/src/models.rs ---

// Canonical entities shared by every crate. Backend naming variance is resolved
// before values of these types are built, so consumers never see raw field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bookable court. Reference data, read-only for the booking day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: String,
    pub title: String,
}

/// Lifecycle status of a booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Reserved,
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Parses the status vocabulary the backend is known to send, in English or
    /// Spanish and in any case.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "reserved" | "reservado" => Some(Self::Reserved),
            "confirmed" | "confirmado" => Some(Self::Confirmed),
            "pending" | "pendiente" => Some(Self::Pending),
            "cancelled" | "canceled" | "cancelado" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Statuses a user may still cancel.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Reserved | Self::Confirmed)
    }

    /// Whether a booking in this status occupies its court.
    pub fn occupies_slot(self) -> bool {
        self != Self::Cancelled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation of one court over `[start_time, end_time)`.
///
/// `end_time > start_time` holds for every value built by this workspace.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub court_id: String,
    pub title: String,
    pub status: BookingStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Booking {
    /// Half-open interval overlap with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Courts plus bookings of a single day, as the backend reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDay {
    pub courts: Vec<Court>,
    pub bookings: Vec<Booking>,
}

/// Merged, de-duplicated, filtered result consumed by rendering. Never persisted.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub courts: Vec<Court>,
    pub events: Vec<Booking>,
}

/// Create request sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

/// What the backend answered to a create, with field aliases already resolved.
///
/// Only the id is guaranteed; everything else is completed by the caller from
/// the request it sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreatedBooking {
    pub id: String,
    pub court_id: Option<String>,
    pub title: Option<String>,
    pub status: Option<BookingStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Admin range listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub court_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub status: Option<BookingStatus>,
}
