// --- File: crates/courtbook_booking/src/calendar.rs ---
//! The calendar session a rendering layer talks to.
//!
//! [`CourtCalendar`] wires the day aggregator, the reconciliation store, the
//! court selection and the lifecycle controller around one slot policy.

use chrono::{DateTime, NaiveDate, Utc};
use courtbook_common::{log_result, ApiError, Booking, Court, CourtApi, CourtbookError};
use courtbook_config::{AppConfig, CalendarConfig};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::aggregator::{DayAggregator, DayState};
use crate::availability::{DaySlot, SlotPolicy};
use crate::error::{ActionError, BookingError};
use crate::factory::court_api;
use crate::lifecycle::{
    BookingLifecycleController, CancelPhase, CreatePhase, CreateRequest, Submission,
};
use crate::persistence::JsonFileSnapshots;
use crate::range::{list_reservations, RangeMode, StatusFilter};
use crate::selection::CourtSelection;
use crate::store::ReconciliationStore;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What the calendar shows for one day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarSnapshot {
    pub date: NaiveDate,
    /// Every court of the day, selected or not.
    pub courts: Vec<Court>,
    pub selected: Vec<String>,
    /// Merged events of the selected courts.
    pub events: Vec<Booking>,
    pub loading: bool,
    pub error: Option<String>,
    pub create_phase: CreatePhase,
    pub cancel_phase: CancelPhase,
    pub create_error: Option<ActionError>,
    pub cancel_error: Option<ActionError>,
}

pub struct CourtCalendar {
    api: Arc<dyn CourtApi>,
    policy: Arc<SlotPolicy>,
    aggregator: DayAggregator,
    store: Arc<Mutex<ReconciliationStore>>,
    selection: Mutex<CourtSelection>,
    controller: BookingLifecycleController,
    initial_selected: usize,
    clock: Clock,
}

impl CourtCalendar {
    pub fn new(
        api: Arc<dyn CourtApi>,
        policy: SlotPolicy,
        calendar: &CalendarConfig,
        store: ReconciliationStore,
    ) -> Self {
        let policy = Arc::new(policy);
        let store = Arc::new(Mutex::new(store));
        Self {
            aggregator: DayAggregator::new(api.clone(), calendar.max_courts, policy.time_zone()),
            controller: BookingLifecycleController::new(api.clone(), store.clone(), policy.clone()),
            api,
            policy,
            store,
            selection: Mutex::new(CourtSelection::default()),
            initial_selected: calendar.initial_selected,
            clock: Arc::new(Utc::now),
        }
    }

    /// Builds the session from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, CourtbookError> {
        let policy = SlotPolicy::from_config(&config.schedule)?;
        let api = court_api(config, policy.time_zone())?;
        let store = match &config.store.snapshot_path {
            Some(path) => {
                ReconciliationStore::with_persistence(Box::new(JsonFileSnapshots::new(path)))
            }
            None => ReconciliationStore::in_memory(),
        };
        Ok(Self::new(api, policy, &config.calendar, store))
    }

    /// Replaces the wall clock, for deterministic "today".
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn policy(&self) -> &SlotPolicy {
        &self.policy
    }

    pub fn controller(&self) -> &BookingLifecycleController {
        &self.controller
    }

    /// The current local day.
    pub fn today(&self) -> NaiveDate {
        self.policy.local_date((self.clock)())
    }

    fn store(&self) -> MutexGuard<'_, ReconciliationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn selection(&self) -> MutexGuard<'_, CourtSelection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches `date` and returns the merged view of the selected courts.
    ///
    /// When a newer request superseded this one, the snapshot describes the
    /// newer day and carries its date.
    pub async fn view(&self, date: NaiveDate) -> CalendarSnapshot {
        let state = self.aggregator.load_day(date).await;
        let shown = state.date.unwrap_or(date);
        if shown != date {
            debug!("View of {} superseded by {}", date, shown);
        }
        self.snapshot(shown, state)
    }

    fn snapshot(&self, date: NaiveDate, state: DayState) -> CalendarSnapshot {
        let (start, end) = (self.policy.day_start(date), self.policy.day_end(date));
        let (selected, events) = {
            let mut selection = self.selection();
            if selection.bootstrap(&state.view.courts, self.initial_selected) {
                debug!("Selected the first {} courts", selection.ids().len());
            }
            let mut store = self.store();
            store.reconcile(&state.view.events);
            (
                selection.ids().to_vec(),
                store.merged_view(&state.view.events, &selection, start, end),
            )
        };
        CalendarSnapshot {
            date,
            courts: state.view.courts,
            selected,
            events,
            loading: state.loading,
            error: state.error,
            create_phase: self.controller.create_phase(),
            cancel_phase: self.controller.cancel_phase(),
            create_error: self.controller.create_error(),
            cancel_error: self.controller.cancel_error(),
        }
    }

    // Loaded state for `date`, fetching only when another day is current.
    async fn day_state(&self, date: NaiveDate) -> DayState {
        let state = self.aggregator.state();
        if state.date == Some(date) && !state.loading && state.error.is_none() {
            state
        } else {
            self.aggregator.load_day(date).await
        }
    }

    // Every merged event of `date`, regardless of selection.
    async fn merged_events(&self, date: NaiveDate) -> Vec<Booking> {
        let state = self.day_state(date).await;
        let mut store = self.store();
        store.reconcile(&state.view.events);
        store.merged_day(
            &state.view.events,
            self.policy.day_start(date),
            self.policy.day_end(date),
        )
    }

    /// Slot picker entries of one court.
    pub async fn slots(&self, date: NaiveDate, court_id: &str) -> Vec<DaySlot> {
        let events = self.merged_events(date).await;
        self.policy.day_slots(date, court_id, &events, self.today())
    }

    pub async fn create(
        &self,
        request: CreateRequest,
    ) -> Result<Submission<Booking>, BookingError> {
        let date = self.policy.local_date(request.start_time);
        let events = self.merged_events(date).await;
        self.controller.create(request, &events, self.today()).await
    }

    /// Cancels a booking of the loaded day or one confirmed locally.
    pub async fn cancel(
        &self,
        booking_id: &str,
        reason: Option<String>,
    ) -> Result<Submission<String>, BookingError> {
        let target = self.find_loaded(booking_id);
        match target {
            Some(target) => self.controller.cancel(&target, reason).await,
            None => Err(ApiError::NotFound(booking_id.to_string()).into()),
        }
    }

    fn find_loaded(&self, booking_id: &str) -> Option<Booking> {
        let state = self.aggregator.state();
        self.store()
            .merged_events(&state.view.events)
            .into_iter()
            .find(|b| b.id == booking_id)
    }

    /// Flips a court in the selection and returns the selected ids.
    pub fn toggle_court(&self, court_id: &str) -> Vec<String> {
        let mut selection = self.selection();
        selection.toggle(court_id);
        selection.ids().to_vec()
    }

    pub fn selected_courts(&self) -> Vec<String> {
        self.selection().ids().to_vec()
    }

    /// Admin listing of one court over a week or month.
    pub async fn reservations(
        &self,
        mode: RangeMode,
        anchor: NaiveDate,
        status: StatusFilter,
        court_id: Option<&str>,
    ) -> Result<Vec<Booking>, BookingError> {
        let result =
            list_reservations(self.api.as_ref(), &self.policy, mode, anchor, status, court_id).await;
        log_result(result, "Listed reservations", "Listing reservations failed")
            .map_err(BookingError::from)
    }
}
