// Scripted CourtApi for unit tests.
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc};
use courtbook_common::{
    ApiError, Booking, BookingStatus, BoxFuture, CalendarDay, Court, CourtApi, CreatedBooking,
    NewBooking, RangeQuery,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn courts(n: usize) -> Vec<Court> {
    (1..=n)
        .map(|i| Court {
            id: format!("c{}", i),
            title: format!("Court {}", i),
        })
        .collect()
}

/// A booking at local Santiago wall-clock `hour:minute` on `day`.
pub fn booking_at(id: &str, court: &str, day: NaiveDate, hour: u32, minute: u32) -> Booking {
    let local = day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap());
    let start = chrono_tz::America::Santiago
        .from_local_datetime(&local)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);
    Booking {
        id: id.to_string(),
        court_id: court.to_string(),
        title: "Reserva".to_string(),
        status: BookingStatus::Confirmed,
        start_time: start,
        end_time: start + ChronoDuration::minutes(90),
    }
}

#[derive(Default)]
pub struct ScriptedApi {
    pub courts: Vec<Court>,
    pub bookings: Mutex<HashMap<NaiveDate, Vec<Booking>>>,
    pub delays: Mutex<HashMap<NaiveDate, Duration>>,
    pub failing_days: Mutex<Vec<NaiveDate>>,
    pub create_response: Mutex<Option<Result<CreatedBooking, ApiError>>>,
    pub cancel_error: Mutex<Option<ApiError>>,
    pub action_delay: Option<Duration>,
    pub day_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn with_courts(n: usize) -> Self {
        Self {
            courts: courts(n),
            ..Self::default()
        }
    }

    pub fn set_day(&self, day: NaiveDate, bookings: Vec<Booking>) {
        self.bookings.lock().unwrap().insert(day, bookings);
    }

    pub fn delay_day(&self, day: NaiveDate, delay: Duration) {
        self.delays.lock().unwrap().insert(day, delay);
    }

    async fn pause(&self) {
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl CourtApi for ScriptedApi {
    fn list_courts(&self) -> BoxFuture<'_, Vec<Court>, ApiError> {
        Box::pin(async move { Ok(self.courts.clone()) })
    }

    fn list_bookings(
        &self,
        day: NaiveDate,
        _court_ids: &[String],
    ) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        Box::pin(async move {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .get(&day)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn list_calendar_day(&self, day: NaiveDate) -> BoxFuture<'_, CalendarDay, ApiError> {
        Box::pin(async move {
            self.day_calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays.lock().unwrap().get(&day).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing_days.lock().unwrap().contains(&day) {
                return Err(ApiError::request(Some(500), "backend down"));
            }
            let bookings = self.list_bookings(day, &[]).await?;
            Ok(CalendarDay {
                courts: self.courts.clone(),
                bookings,
            })
        })
    }

    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, CreatedBooking, ApiError> {
        Box::pin(async move {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            let scripted = self.create_response.lock().unwrap().clone();
            match scripted {
                Some(result) => result,
                None => Ok(CreatedBooking {
                    id: format!("srv-{}", self.create_calls.load(Ordering::SeqCst)),
                    court_id: Some(booking.court_id),
                    ..CreatedBooking::default()
                }),
            }
        })
    }

    fn cancel_booking(
        &self,
        _booking_id: &str,
        _reason: Option<String>,
    ) -> BoxFuture<'_, (), ApiError> {
        Box::pin(async move {
            self.cancel_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            match self.cancel_error.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn list_bookings_range(&self, query: RangeQuery) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        Box::pin(async move {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .values()
                .flatten()
                .filter(|b| b.court_id == query.court_id && b.overlaps(query.from, query.to))
                .cloned()
                .collect())
        })
    }
}
