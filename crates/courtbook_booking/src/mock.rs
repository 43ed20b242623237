// --- File: crates/courtbook_booking/src/mock.rs ---
//! In-process stand-in for the booking backend.
//!
//! Courts are `c1..cN`. Each day gets a deterministic occupation of four fixed
//! evening blocks, seeded by the date, so every process shows the same calendar.
//! Creates and cancels live in memory for the lifetime of the value.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use courtbook_common::{
    ApiError, Booking, BookingStatus, BoxFuture, CalendarDay, Court, CourtApi, CreatedBooking,
    NewBooking, RangeQuery,
};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::availability::{day_end_in, day_start_in};
use crate::wire::DEFAULT_TITLE;

pub const MAX_MOCK_COURTS: usize = 10;

// (hour, minute, minutes, status)
const BLOCKS: [(u32, u32, i64, BookingStatus); 4] = [
    (17, 0, 60, BookingStatus::Confirmed),
    (18, 0, 90, BookingStatus::Reserved),
    (19, 30, 90, BookingStatus::Reserved),
    (21, 0, 90, BookingStatus::Reserved),
];

const OCCUPIED_ABOVE: f64 = 0.4;

#[derive(Debug, Default)]
struct MockState {
    created: Vec<Booking>,
    cancelled: HashSet<String>,
}

pub struct MockCourtApi {
    courts: Vec<Court>,
    time_zone: Tz,
    state: Mutex<MockState>,
}

impl MockCourtApi {
    /// `court_count` is clamped to `1..=10`.
    pub fn new(court_count: usize, time_zone: Tz) -> Self {
        let count = court_count.clamp(1, MAX_MOCK_COURTS);
        let courts = (1..=count)
            .map(|i| Court {
                id: format!("c{}", i),
                title: format!("Cancha Pádel {}", i),
            })
            .collect();
        Self {
            courts,
            time_zone,
            state: Mutex::new(MockState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The seeded bookings of a local day, ignoring creates and cancels.
    pub fn generated_day(&self, day: NaiveDate) -> Vec<Booking> {
        let seed = seed_from_date(day);
        let mut bookings = Vec::new();
        let mut sequence = 1;

        for (ci, court) in self.courts.iter().enumerate() {
            for (bi, (hour, minute, minutes, status)) in BLOCKS.iter().enumerate() {
                if occupancy(seed, (ci * 100 + bi) as f64) <= OCCUPIED_ABOVE {
                    continue;
                }
                let Some(time) = NaiveTime::from_hms_opt(*hour, *minute, 0) else {
                    continue;
                };
                let Some(start) = self.local(day, time) else {
                    continue;
                };
                bookings.push(Booking {
                    id: format!("{}-{}", day.format("%Y%m%d"), sequence),
                    court_id: court.id.clone(),
                    title: match status {
                        BookingStatus::Confirmed => "Confirmado".to_string(),
                        _ => DEFAULT_TITLE.to_string(),
                    },
                    status: *status,
                    start_time: start,
                    end_time: start + Duration::minutes(*minutes),
                });
                sequence += 1;
            }
        }

        bookings.sort_by_key(|booking| booking.start_time);
        bookings
    }

    fn local(&self, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.time_zone
            .from_local_datetime(&day.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    // Generated plus created bookings touching the local day, with cancels applied.
    fn day_bookings(&self, day: NaiveDate) -> Vec<Booking> {
        let start = day_start_in(self.time_zone, day);
        let end = day_end_in(self.time_zone, day);
        let state = self.state();

        let mut bookings = self.generated_day(day);
        bookings.extend(
            state
                .created
                .iter()
                .filter(|booking| booking.overlaps(start, end))
                .cloned(),
        );
        for booking in bookings.iter_mut() {
            if state.cancelled.contains(&booking.id) {
                booking.status = BookingStatus::Cancelled;
            }
        }
        bookings.sort_by_key(|booking| booking.start_time);
        bookings
    }

    fn exists(&self, booking_id: &str) -> bool {
        if self.state().created.iter().any(|b| b.id == booking_id) {
            return true;
        }
        generated_day_of(booking_id)
            .map(|day| self.generated_day(day).iter().any(|b| b.id == booking_id))
            .unwrap_or(false)
    }
}

impl CourtApi for MockCourtApi {
    fn list_courts(&self) -> BoxFuture<'_, Vec<Court>, ApiError> {
        Box::pin(async move { Ok(self.courts.clone()) })
    }

    fn list_bookings(
        &self,
        day: NaiveDate,
        court_ids: &[String],
    ) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        let court_ids = court_ids.to_vec();
        Box::pin(async move {
            let bookings = self
                .day_bookings(day)
                .into_iter()
                .filter(|b| court_ids.is_empty() || court_ids.contains(&b.court_id))
                .collect();
            Ok(bookings)
        })
    }

    fn list_calendar_day(&self, day: NaiveDate) -> BoxFuture<'_, CalendarDay, ApiError> {
        Box::pin(async move {
            Ok(CalendarDay {
                courts: self.courts.clone(),
                bookings: self.day_bookings(day),
            })
        })
    }

    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, CreatedBooking, ApiError> {
        Box::pin(async move {
            if !self.courts.iter().any(|court| court.id == booking.court_id) {
                return Err(ApiError::request(
                    Some(404),
                    format!("Unknown court {}", booking.court_id),
                ));
            }
            if booking.end_time <= booking.start_time {
                return Err(ApiError::request(Some(400), "endTime must be after startTime"));
            }

            let day = self.time_zone_day(booking.start_time);
            let clash = self.day_bookings(day).into_iter().find(|existing| {
                existing.court_id == booking.court_id
                    && existing.status.occupies_slot()
                    && existing.overlaps(booking.start_time, booking.end_time)
            });
            if let Some(existing) = clash {
                debug!("Mock backend rejects overlap with {}", existing.id);
                return Err(ApiError::Conflict(
                    "The court is already booked for that time".to_string(),
                ));
            }

            let created = Booking {
                id: uuid::Uuid::new_v4().to_string(),
                court_id: booking.court_id,
                title: booking.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                status: BookingStatus::Pending,
                start_time: booking.start_time,
                end_time: booking.end_time,
            };
            info!("Mock backend created booking {}", created.id);
            self.state().created.push(created.clone());

            Ok(CreatedBooking {
                id: created.id,
                court_id: Some(created.court_id),
                title: Some(created.title),
                status: Some(created.status),
                start_time: Some(created.start_time),
                end_time: Some(created.end_time),
            })
        })
    }

    fn cancel_booking(
        &self,
        booking_id: &str,
        _reason: Option<String>,
    ) -> BoxFuture<'_, (), ApiError> {
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            if !self.exists(&booking_id) {
                return Err(ApiError::NotFound(booking_id));
            }
            self.state().cancelled.insert(booking_id.clone());
            info!("Mock backend cancelled booking {}", booking_id);
            Ok(())
        })
    }

    fn list_bookings_range(&self, query: RangeQuery) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        Box::pin(async move {
            let first = self.time_zone_day(query.from);
            let last = self.time_zone_day(query.to);
            let mut seen = HashSet::new();
            let mut bookings = Vec::new();

            for day in first.iter_days().take_while(|day| *day <= last) {
                for booking in self.day_bookings(day) {
                    let wanted = booking.court_id == query.court_id
                        && booking.overlaps(query.from, query.to)
                        && query.status.map_or(true, |status| booking.status == status);
                    if wanted && seen.insert(booking.id.clone()) {
                        bookings.push(booking);
                    }
                }
            }
            Ok(bookings)
        })
    }
}

impl MockCourtApi {
    fn time_zone_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }
}

fn seed_from_date(day: NaiveDate) -> f64 {
    f64::from(day.year() * 10000 + day.month() as i32 * 100 + day.day() as i32)
}

// Fractional part of a scaled sine, in [0, 1).
fn occupancy(seed: f64, k: f64) -> f64 {
    let x = (seed * 1.234 + k * 7.89).sin() * 43758.5453;
    x - x.floor()
}

fn generated_day_of(booking_id: &str) -> Option<NaiveDate> {
    let (date, _) = booking_id.split_once('-')?;
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}
