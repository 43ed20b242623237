// --- File: crates/courtbook_common/src/services.rs ---
//! Service abstractions for the remote booking backend.
//!
//! The [`CourtApi`] trait decouples the booking core from the transport, so the
//! HTTP client, the in-process mock backend and test fakes are interchangeable
//! behind an `Arc<dyn CourtApi>`.

use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::models::{Booking, CalendarDay, Court, CreatedBooking, NewBooking, RangeQuery};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failure of a single backend round trip. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend refused a create because it overlaps an existing booking (HTTP 409).
    #[error("Booking conflict: {0}")]
    Conflict(String),

    /// The target booking no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-2xx answer or a transport failure.
    #[error("Request failed: {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// The backend answered 2xx with a body that cannot be used.
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn request<T: std::fmt::Display>(status: Option<u16>, message: T) -> Self {
        ApiError::Request {
            status,
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Remote booking operations.
///
/// Every call is one network round trip (or a bounded fan-out of them for
/// [`CourtApi::list_bookings`]) and fails fast.
pub trait CourtApi: Send + Sync {
    /// List all courts.
    fn list_courts(&self) -> BoxFuture<'_, Vec<Court>, ApiError>;

    /// List the bookings of `day` for the given courts; an empty slice means all courts.
    fn list_bookings(
        &self,
        day: NaiveDate,
        court_ids: &[String],
    ) -> BoxFuture<'_, Vec<Booking>, ApiError>;

    /// Courts plus the bookings of `day` on those courts, as one logical call.
    fn list_calendar_day(&self, day: NaiveDate) -> BoxFuture<'_, CalendarDay, ApiError>;

    /// Create a booking; overlapping bookings fail with [`ApiError::Conflict`].
    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, CreatedBooking, ApiError>;

    /// Cancel a booking; a missing booking fails with [`ApiError::NotFound`].
    fn cancel_booking(
        &self,
        booking_id: &str,
        reason: Option<String>,
    ) -> BoxFuture<'_, (), ApiError>;

    /// List the bookings of one court over an arbitrary range (admin view).
    fn list_bookings_range(&self, query: RangeQuery) -> BoxFuture<'_, Vec<Booking>, ApiError>;
}
