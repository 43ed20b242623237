// --- File: crates/courtbook_booking/src/error.rs ---
use courtbook_common::{validation_error, ApiError, BookingStatus, CourtbookError, HttpStatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::availability::SlotRejection;

/// Errors of booking actions, before they are mapped to user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The slot was rejected locally; no request was sent.
    #[error("Invalid slot: {0}")]
    Validation(#[from] SlotRejection),

    /// The booking is not in a cancellable status; no request was sent.
    #[error("Booking {id} cannot be cancelled while {status}")]
    NotCancellable { id: String, status: BookingStatus },

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// User-facing error categories.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Request,
}

/// Which lifecycle action produced an error; picks the generic fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Cancel,
}

pub const OVERLAP_MESSAGE: &str = "A booking already overlaps that time slot.";

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) | BookingError::NotCancellable { .. } => {
                ErrorKind::Validation
            }
            BookingError::Api(ApiError::Conflict(_)) => ErrorKind::Conflict,
            BookingError::Api(ApiError::NotFound(_)) => ErrorKind::NotFound,
            BookingError::Api(_) => ErrorKind::Request,
        }
    }

    /// The message shown to the user for this error.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            BookingError::Validation(rejection) => rejection.to_string(),
            BookingError::NotCancellable { .. } => self.to_string(),
            BookingError::Api(ApiError::Conflict(_)) => OVERLAP_MESSAGE.to_string(),
            BookingError::Api(ApiError::NotFound(message)) => {
                format!("Booking not found: {}", message)
            }
            BookingError::Api(ApiError::Request { message, .. }) if !message.trim().is_empty() => {
                message.clone()
            }
            BookingError::Api(_) => match action {
                Action::Create => "Could not create the booking.".to_string(),
                Action::Cancel => "Could not cancel the booking.".to_string(),
            },
        }
    }
}

/// Convert BookingError to CourtbookError
impl From<BookingError> for CourtbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(rejection) => validation_error(rejection),
            err @ BookingError::NotCancellable { .. } => validation_error(err),
            BookingError::Api(api) => api.into(),
        }
    }
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::NotCancellable { .. } => 400,
            BookingError::Api(api) => api.status_code(),
        }
    }
}

/// The last error of an action, as exposed to the rendering layer.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ActionError {
    pub fn from_error(err: &BookingError, action: Action) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(action),
        }
    }
}
