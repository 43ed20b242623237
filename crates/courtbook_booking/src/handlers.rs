// File: crates/courtbook_booking/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use courtbook_common::{Booking, CourtbookError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::availability::DaySlot;
use crate::calendar::{CalendarSnapshot, CourtCalendar};
use crate::lifecycle::{CreateRequest, Submission};
use crate::range::{RangeMode, StatusFilter};

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// Local day, `YYYY-MM-DD`; today when omitted.
    pub date: Option<NaiveDate>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<NaiveDate>,
    pub court_id: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize)]
pub struct CancelPayload {
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct ReservationsQuery {
    #[serde(default)]
    pub mode: RangeMode,
    pub anchor: Option<NaiveDate>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", param(value_type = Option<String>))]
    pub status: StatusFilter,
    pub court_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected: Vec<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct ReservationsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub items: Vec<Booking>,
}

/// Merged calendar of one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Courts, selection and merged events of the day", body = CalendarSnapshot)
    ),
    tag = "Calendar"
))]
pub async fn day_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Query(query): Query<DayQuery>,
) -> Json<CalendarSnapshot> {
    let date = query.date.unwrap_or_else(|| calendar.today());
    Json(calendar.view(date).await)
}

/// Slot picker of one court.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/slots",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Allowed starts of the day with their verdicts", body = [DaySlot])
    ),
    tag = "Calendar"
))]
pub async fn slots_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Query(query): Query<SlotsQuery>,
) -> Json<Vec<DaySlot>> {
    let date = query.date.unwrap_or_else(|| calendar.today());
    Json(calendar.slots(date, &query.court_id).await)
}

/// Creates a booking; `202` when another create was still running.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar/bookings",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 202, description = "Ignored, a create is already in flight"),
        (status = 400, description = "Slot not bookable"),
        (status = 409, description = "Backend reported an overlapping booking"),
        (status = 502, description = "Backend request failed")
    ),
    tag = "Calendar"
))]
pub async fn create_booking_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Json(request): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Submission<Booking>>), CourtbookError> {
    info!(
        "Create requested on court {} at {}",
        request.court_id, request.start_time
    );
    let outcome = calendar.create(request).await?;
    let status = match outcome {
        Submission::Done(_) => StatusCode::CREATED,
        Submission::Ignored => StatusCode::ACCEPTED,
    };
    Ok((status, Json(outcome)))
}

/// Cancels a booking of the loaded day. The JSON body is optional.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/calendar/bookings/{booking_id}/cancel",
    params(("booking_id" = String, Path, description = "Booking to cancel")),
    request_body = CancelPayload,
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 400, description = "Booking is not cancellable"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Calendar"
))]
pub async fn cancel_booking_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Path(booking_id): Path<String>,
    payload: Option<Json<CancelPayload>>,
) -> Result<Json<Submission<String>>, CourtbookError> {
    info!("Cancel requested for booking {}", booking_id);
    // The body is optional; a bare PATCH cancels without a reason.
    let reason = payload.and_then(|Json(payload)| payload.reason);
    let outcome = calendar.cancel(&booking_id, reason).await?;
    Ok(Json(outcome))
}

/// Shows or hides a court.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/calendar/selection/{court_id}",
    params(("court_id" = String, Path, description = "Court to toggle")),
    responses(
        (status = 200, description = "Selected courts after the toggle", body = SelectionResponse)
    ),
    tag = "Calendar"
))]
pub async fn toggle_court_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Path(court_id): Path<String>,
) -> Json<SelectionResponse> {
    Json(SelectionResponse {
        selected: calendar.toggle_court(&court_id),
    })
}

/// Admin listing of one court over a week or month.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/reservations",
    params(ReservationsQuery),
    responses(
        (status = 200, description = "Reservations sorted by start", body = ReservationsResponse),
        (status = 502, description = "Backend request failed")
    ),
    tag = "Admin"
))]
pub async fn reservations_handler(
    State(calendar): State<Arc<CourtCalendar>>,
    Query(query): Query<ReservationsQuery>,
) -> Result<Json<ReservationsResponse>, CourtbookError> {
    let anchor = query.anchor.unwrap_or_else(|| calendar.today());
    let (from, to) = crate::range::range_days(query.mode, anchor);
    let items = calendar
        .reservations(query.mode, anchor, query.status, query.court_id.as_deref())
        .await?;
    Ok(Json(ReservationsResponse { from, to, items }))
}
