// --- File: crates/courtbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Canonical entities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, not_found, validation_error,
    Context, CourtbookError, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_result};

pub use models::{
    Booking, BookingStatus, CalendarDay, CalendarView, Court, CreatedBooking, NewBooking,
    RangeQuery,
};
pub use services::{ApiError, BoxFuture, CourtApi};
