// --- File: crates/courtbook_booking/src/lifecycle.rs ---
//! Create and cancel actions.
//!
//! Each action is a small state machine, `idle -> submitting|cancelling -> idle`.
//! A second submission while one is in flight is ignored, not queued.

use chrono::{DateTime, NaiveDate, Utc};
use courtbook_common::{ApiError, Booking, BookingStatus, CourtApi, CreatedBooking, NewBooking};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::availability::SlotPolicy;
use crate::error::{Action, ActionError, BookingError};
use crate::store::ReconciliationStore;
use crate::wire::DEFAULT_TITLE;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePhase {
    Idle,
    Submitting,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPhase {
    Idle,
    Cancelling,
}

/// Result of an action that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Submission<T> {
    Done(T),
    /// Another submission of the same action was still in flight.
    Ignored,
}

/// A create as the user asked for it. The end follows from the slot duration.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub court_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// Resets the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingLifecycleController {
    api: Arc<dyn CourtApi>,
    store: Arc<Mutex<ReconciliationStore>>,
    policy: Arc<SlotPolicy>,
    creating: AtomicBool,
    cancelling: AtomicBool,
    create_error: Mutex<Option<ActionError>>,
    cancel_error: Mutex<Option<ActionError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BookingLifecycleController {
    pub fn new(
        api: Arc<dyn CourtApi>,
        store: Arc<Mutex<ReconciliationStore>>,
        policy: Arc<SlotPolicy>,
    ) -> Self {
        Self {
            api,
            store,
            policy,
            creating: AtomicBool::new(false),
            cancelling: AtomicBool::new(false),
            create_error: Mutex::new(None),
            cancel_error: Mutex::new(None),
        }
    }

    pub fn create_phase(&self) -> CreatePhase {
        if self.creating.load(Ordering::Acquire) {
            CreatePhase::Submitting
        } else {
            CreatePhase::Idle
        }
    }

    pub fn cancel_phase(&self) -> CancelPhase {
        if self.cancelling.load(Ordering::Acquire) {
            CancelPhase::Cancelling
        } else {
            CancelPhase::Idle
        }
    }

    pub fn create_error(&self) -> Option<ActionError> {
        lock(&self.create_error).clone()
    }

    pub fn cancel_error(&self) -> Option<ActionError> {
        lock(&self.cancel_error).clone()
    }

    pub fn reset_error(&self, action: Action) {
        match action {
            Action::Create => *lock(&self.create_error) = None,
            Action::Cancel => *lock(&self.cancel_error) = None,
        }
    }

    fn fail<T>(&self, action: Action, err: BookingError) -> Result<T, BookingError> {
        let shown = ActionError::from_error(&err, action);
        warn!("{:?} failed: {}", action, err);
        match action {
            Action::Create => *lock(&self.create_error) = Some(shown),
            Action::Cancel => *lock(&self.cancel_error) = Some(shown),
        }
        Err(err)
    }

    /// Validates the slot against `existing`, creates it remotely and records the
    /// accepted booking locally before returning.
    pub async fn create(
        &self,
        request: CreateRequest,
        existing: &[Booking],
        today: NaiveDate,
    ) -> Result<Submission<Booking>, BookingError> {
        let Some(_guard) = InFlight::acquire(&self.creating) else {
            info!("Create ignored, another one is in flight");
            return Ok(Submission::Ignored);
        };
        self.reset_error(Action::Create);

        let slot = match self
            .policy
            .check(request.start_time, &request.court_id, existing, today)
        {
            Ok(slot) => slot,
            Err(rejection) => return self.fail(Action::Create, rejection.into()),
        };

        let title = request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let new_booking = NewBooking {
            court_id: slot.court_id,
            start_time: slot.start,
            end_time: slot.end,
            title: Some(title),
            notes: request.notes.filter(|n| !n.trim().is_empty()),
        };

        info!(
            "Creating booking on court {} at {}",
            new_booking.court_id, new_booking.start_time
        );
        let created = match self.api.create_booking(new_booking.clone()).await {
            Ok(created) => created,
            Err(err) => return self.fail(Action::Create, err.into()),
        };
        let booking = match complete_created(created, &new_booking) {
            Ok(booking) => booking,
            Err(err) => return self.fail(Action::Create, err.into()),
        };

        lock(&self.store).push_confirmed(booking.clone());
        info!("Booking {} created", booking.id);
        Ok(Submission::Done(booking))
    }

    /// Cancels remotely, then hides the booking locally before returning.
    pub async fn cancel(
        &self,
        target: &Booking,
        reason: Option<String>,
    ) -> Result<Submission<String>, BookingError> {
        if !target.status.is_cancellable() {
            return self.fail(
                Action::Cancel,
                BookingError::NotCancellable {
                    id: target.id.clone(),
                    status: target.status,
                },
            );
        }
        let Some(_guard) = InFlight::acquire(&self.cancelling) else {
            info!("Cancel ignored, another one is in flight");
            return Ok(Submission::Ignored);
        };
        self.reset_error(Action::Cancel);

        info!("Cancelling booking {}", target.id);
        if let Err(err) = self.api.cancel_booking(&target.id, reason).await {
            return self.fail(Action::Cancel, err.into());
        }

        lock(&self.store).mark_cancelled(&target.id);
        info!("Booking {} cancelled", target.id);
        Ok(Submission::Done(target.id.clone()))
    }
}

/// Fills what the create response left out from the request that was sent.
pub fn complete_created(created: CreatedBooking, sent: &NewBooking) -> Result<Booking, ApiError> {
    let start_time = created.start_time.unwrap_or(sent.start_time);
    let end_time = created.end_time.unwrap_or(sent.end_time);
    if end_time <= start_time {
        return Err(ApiError::request(
            None,
            format!("created booking {} has no valid interval", created.id),
        ));
    }
    Ok(Booking {
        id: created.id,
        court_id: created.court_id.unwrap_or_else(|| sent.court_id.clone()),
        title: created
            .title
            .or_else(|| sent.title.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        status: created.status.unwrap_or(BookingStatus::Confirmed),
        start_time,
        end_time,
    })
}
