// --- File: crates/courtbook_booking/src/aggregator.rs ---
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use courtbook_common::{CalendarDay, CalendarView, CourtApi};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Hard ceiling on courts in one view.
pub const MAX_COURTS: usize = 10;

/// Observable state of the current day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayState {
    pub date: Option<NaiveDate>,
    pub view: CalendarView,
    pub loading: bool,
    pub error: Option<String>,
    /// Token of the load that produced or is producing this state.
    pub generation: u64,
}

/// Loads one day at a time; a newer load always wins over an older one.
pub struct DayAggregator {
    api: Arc<dyn CourtApi>,
    max_courts: usize,
    time_zone: Tz,
    generation: AtomicU64,
    state: Mutex<DayState>,
}

impl DayAggregator {
    /// `max_courts` is clamped to [`MAX_COURTS`].
    pub fn new(api: Arc<dyn CourtApi>, max_courts: usize, time_zone: Tz) -> Self {
        Self {
            api,
            max_courts: max_courts.min(MAX_COURTS),
            time_zone,
            generation: AtomicU64::new(0),
            state: Mutex::new(DayState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> DayState {
        self.lock().clone()
    }

    pub fn max_courts(&self) -> usize {
        self.max_courts
    }

    /// Fetches `date`. Returns the state after this load, or the newer state when
    /// another load started meanwhile. Failures end up in `error`, never as `Err`.
    pub async fn load_day(&self, date: NaiveDate) -> DayState {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.date = Some(date);
            state.loading = true;
            state.error = None;
            state.generation = ticket;
        }
        debug!("Loading {} (generation {})", date, ticket);

        let result = self.api.list_calendar_day(date).await;

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale response for {} (generation {})", date, ticket);
            return state.clone();
        }
        match result {
            Ok(day) => {
                state.view = assemble_view(day, self.max_courts);
                state.error = None;
            }
            Err(err) => {
                warn!("Loading {} failed: {}", date, err);
                state.view = CalendarView::default();
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;
        state.clone()
    }

    /// Loads the local day of `now` unless it is already the requested day.
    pub async fn on_date_change(&self, now: DateTime<Utc>) -> Option<DayState> {
        let date = now.with_timezone(&self.time_zone).date_naive();
        if self.lock().date == Some(date) {
            return None;
        }
        Some(self.load_day(date).await)
    }
}

/// Keeps the first `max_courts` courts and only the bookings on them.
pub fn assemble_view(day: CalendarDay, max_courts: usize) -> CalendarView {
    let courts: Vec<_> = day
        .courts
        .into_iter()
        .take(max_courts.min(MAX_COURTS))
        .collect();
    let kept: HashSet<&str> = courts.iter().map(|c| c.id.as_str()).collect();
    let events = day
        .bookings
        .into_iter()
        .filter(|b| kept.contains(b.court_id.as_str()))
        .collect();
    CalendarView { courts, events }
}
