// File: crates/courtbook_booking/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::aggregator::DayState;
use crate::availability::{DaySlot, Slot, SlotRejection};
use crate::calendar::CalendarSnapshot;
use crate::error::{ActionError, ErrorKind};
use crate::handlers::{CancelPayload, ReservationsResponse, SelectionResponse};
use crate::lifecycle::{CancelPhase, CreatePhase, CreateRequest};
use crate::range::RangeMode;
use crate::selection::CourtSelection;
use courtbook_common::{Booking, BookingStatus, CalendarView, Court};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::day_handler,
        crate::handlers::slots_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::cancel_booking_handler,
        crate::handlers::toggle_court_handler,
        crate::handlers::reservations_handler,
    ),
    components(
        schemas(
            Court,
            Booking,
            BookingStatus,
            CalendarView,
            CalendarSnapshot,
            DayState,
            DaySlot,
            Slot,
            SlotRejection,
            CreateRequest,
            CancelPayload,
            CreatePhase,
            CancelPhase,
            ActionError,
            ErrorKind,
            CourtSelection,
            SelectionResponse,
            ReservationsResponse,
            RangeMode,
        )
    ),
    tags(
        (name = "Calendar", description = "Day view, slot picker and booking actions"),
        (name = "Admin", description = "Reservation listings over a week or month")
    )
)]
pub struct CalendarApiDoc;
