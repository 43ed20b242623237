// --- File: crates/courtbook_booking/src/routes.rs ---

use crate::calendar::CourtCalendar;
use crate::handlers::{
    cancel_booking_handler, create_booking_handler, day_handler, reservations_handler,
    slots_handler, toggle_court_handler,
};
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use courtbook_common::CourtbookError;
use courtbook_config::AppConfig;
use std::sync::Arc;

/// Routes of the calendar and admin views, relative to `/api`.
pub fn routes(calendar: Arc<CourtCalendar>) -> Router {
    Router::new()
        .route("/calendar/day", get(day_handler))
        .route("/calendar/slots", get(slots_handler))
        .route("/calendar/bookings", post(create_booking_handler))
        .route(
            "/calendar/bookings/{booking_id}/cancel",
            patch(cancel_booking_handler),
        )
        .route("/calendar/selection/{court_id}", put(toggle_court_handler))
        .route("/admin/reservations", get(reservations_handler))
        .with_state(calendar)
}

/// Builds the calendar session from configuration and returns its routes.
pub fn routes_from_config(config: &AppConfig) -> Result<Router, CourtbookError> {
    let calendar = CourtCalendar::from_config(config)?;
    Ok(routes(Arc::new(calendar)))
}
