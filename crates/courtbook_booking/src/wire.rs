// --- File: crates/courtbook_booking/src/wire.rs ---
// Raw backend payloads. Field naming and status vocabulary vary between backend
// versions; everything is resolved here, before a canonical model is built.

use chrono::{DateTime, NaiveDateTime, Utc};
use courtbook_common::{ApiError, Booking, BookingStatus, Court, CreatedBooking, NewBooking};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_TITLE: &str = "Reserva";

/// Ids arrive as JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCourt {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
}

impl RawCourt {
    pub fn into_court(self) -> Court {
        let id = self.id.into_string();
        let title = non_blank(self.title)
            .or_else(|| non_blank(self.name))
            .unwrap_or_else(|| id.clone());
        Court { id, title }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBooking {
    pub id: WireId,
    #[serde(default, alias = "court_id", alias = "canchaId", alias = "resourceId")]
    pub court_id: Option<WireId>,
    #[serde(default, alias = "nombre")]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default, alias = "start_time", alias = "start")]
    pub start_time: Option<String>,
    #[serde(default, alias = "end_time", alias = "end")]
    pub end_time: Option<String>,
}

impl RawBooking {
    /// `status` wins over `estado`; unknown words count as missing.
    pub fn status(&self) -> Option<BookingStatus> {
        self.status
            .as_deref()
            .and_then(BookingStatus::parse_loose)
            .or_else(|| self.estado.as_deref().and_then(BookingStatus::parse_loose))
    }

    /// Builds a listed booking. `court_id` is used when the record omits its court.
    pub fn into_booking(self, court_id: &str) -> Result<Booking, ApiError> {
        let status = self.status().unwrap_or(BookingStatus::Reserved);
        let id = self.id.into_string();
        let start_time = self
            .start_time
            .as_deref()
            .and_then(parse_instant)
            .ok_or_else(|| ApiError::Decode(format!("booking {}: missing or invalid start", id)))?;
        let end_time = self
            .end_time
            .as_deref()
            .and_then(parse_instant)
            .ok_or_else(|| ApiError::Decode(format!("booking {}: missing or invalid end", id)))?;
        if end_time <= start_time {
            return Err(ApiError::Decode(format!(
                "booking {}: end is not after start",
                id
            )));
        }
        Ok(Booking {
            court_id: self
                .court_id
                .map(WireId::into_string)
                .unwrap_or_else(|| court_id.to_string()),
            title: non_blank(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            id,
            status,
            start_time,
            end_time,
        })
    }

    /// Create responses keep every field optional except the id.
    pub fn into_created(self) -> CreatedBooking {
        let status = self.status();
        CreatedBooking {
            id: self.id.into_string(),
            court_id: self.court_id.map(WireId::into_string),
            title: non_blank(self.title),
            status,
            start_time: self.start_time.as_deref().and_then(parse_instant),
            end_time: self.end_time.as_deref().and_then(parse_instant),
        }
    }
}

/// Normalizes a listing, dropping records that cannot be used.
pub fn into_bookings(raw: Vec<RawBooking>, court_id: &str) -> Vec<Booking> {
    raw.into_iter()
        .filter_map(|record| match record.into_booking(court_id) {
            Ok(booking) => Some(booking),
            Err(err) => {
                warn!("Dropping backend booking on court {}: {}", court_id, err);
                None
            }
        })
        .collect()
}

/// Range listings come either bare or wrapped in `{items: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RangeBody {
    Wrapped { items: Vec<RawBooking> },
    Bare(Vec<RawBooking>),
}

impl RangeBody {
    pub fn into_items(self) -> Vec<RawBooking> {
        match self {
            RangeBody::Wrapped { items } => items,
            RangeBody::Bare(items) => items,
        }
    }
}

/// Court ids are numeric on the backend; anything else is sent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CourtRef {
    Number(i64),
    Text(String),
}

impl CourtRef {
    pub fn from_id(id: &str) -> Self {
        match id.trim().parse::<i64>() {
            Ok(number) => CourtRef::Number(number),
            Err(_) => CourtRef::Text(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    pub court_id: CourtRef,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&NewBooking> for CreateBody {
    fn from(booking: &NewBooking) -> Self {
        Self {
            court_id: CourtRef::from_id(&booking.court_id),
            start_time: format_instant(booking.start_time),
            end_time: format_instant(booking.end_time),
            title: booking.title.clone(),
            notes: booking.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CancelBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// RFC 3339 in UTC with millisecond precision, the format the backend emits.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Accepts RFC 3339, or a naive timestamp taken as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Picks the human readable message out of an error body.
///
/// Order: JSON `message` (arrays are joined), JSON `error`, then the body text.
pub fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(json) => message_field(&json, "message").or_else(|| message_field(&json, "error")),
        Err(_) => Some(body.to_string()),
    }
}

fn message_field(json: &Value, key: &str) -> Option<String> {
    match json.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(text) => Some(text.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        Value::Object(inner) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
