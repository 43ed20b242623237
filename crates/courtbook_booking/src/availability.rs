// --- File: crates/courtbook_booking/src/availability.rs ---
//! Slot validation for new bookings.
//!
//! A candidate start is bookable when it is one of the configured start times of
//! its local day, the reservation ends no later than closing, the day is not in
//! the past and no non-cancelled booking of the same court overlaps it.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use courtbook_common::{config_error, Booking, CourtbookError};
use courtbook_config::ScheduleConfig;
use serde::Serialize;
use thiserror::Error;

/// Why a candidate slot cannot be booked.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SlotRejection {
    #[error("{start} is not an allowed start time")]
    NotAllowedStart { start: String },

    #[error("The reservation would end after closing time ({closing})")]
    PastClosing { closing: String },

    #[error("{date} is in the past")]
    PastDay { date: NaiveDate },

    #[error("The slot overlaps booking {booking_id}")]
    Overlap { booking_id: String },
}

/// A validated booking interval.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub court_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One entry of the per-day slot picker.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub selectable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<SlotRejection>,
}

/// Parses a local "HH:MM" clock time.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, CourtbookError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| config_error(format!("invalid clock time '{}': {}", raw, err)))
}

/// First instant of a local day.
pub fn day_start_in(time_zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_forward(time_zone, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of a local day.
pub fn day_end_in(time_zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    let next = match date.succ_opt() {
        Some(next) => day_start_in(time_zone, next),
        None => day_start_in(time_zone, date) + Duration::days(1),
    };
    next - Duration::milliseconds(1)
}

// Wall-clock times inside a gap move forward to the first existing hour.
fn resolve_forward(time_zone: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    (0..=3)
        .find_map(|hours| {
            time_zone
                .from_local_datetime(&(local + Duration::hours(hours)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

/// Allowed start times, fixed duration and closing time of a booking day.
///
/// Closing is a time of the same local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPolicy {
    allowed: Vec<NaiveTime>,
    duration: Duration,
    closing: NaiveTime,
    time_zone: Tz,
}

impl SlotPolicy {
    pub fn new(
        mut allowed: Vec<NaiveTime>,
        duration: Duration,
        closing: NaiveTime,
        time_zone: Tz,
    ) -> Self {
        allowed.sort();
        allowed.dedup();
        Self {
            allowed,
            duration,
            closing,
            time_zone,
        }
    }

    /// Start times every `step_minutes` from `first` through `last`.
    pub fn grid(
        first: NaiveTime,
        last: NaiveTime,
        step_minutes: u32,
        duration: Duration,
        closing: NaiveTime,
        time_zone: Tz,
    ) -> Self {
        let step = Duration::minutes(i64::from(step_minutes.max(1)));
        let mut allowed = Vec::new();
        let mut current = first;
        while current <= last {
            allowed.push(current);
            let (next, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            current = next;
        }
        Self::new(allowed, duration, closing, time_zone)
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self, CourtbookError> {
        let time_zone: Tz = config.time_zone.parse().map_err(|err| {
            config_error(format!("unknown time zone '{}': {}", config.time_zone, err))
        })?;
        if config.reservation_minutes <= 0 {
            return Err(config_error("reservation_minutes must be positive"));
        }
        let duration = Duration::minutes(config.reservation_minutes);
        let closing = parse_clock(&config.closing_time)?;

        let policy = match &config.allowed_slots {
            Some(slots) => {
                let allowed = slots
                    .iter()
                    .map(|slot| parse_clock(slot))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::new(allowed, duration, closing, time_zone)
            }
            None => Self::grid(
                parse_clock(&config.first_slot)?,
                parse_clock(&config.last_slot)?,
                config.slot_step_minutes,
                duration,
                closing,
                time_zone,
            ),
        };

        if policy.allowed.is_empty() {
            return Err(config_error("no allowed start times configured"));
        }
        Ok(policy)
    }

    pub fn allowed(&self) -> &[NaiveTime] {
        &self.allowed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn closing(&self) -> NaiveTime {
        self.closing
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// The instant of a local wall-clock time; `None` inside a DST gap.
    /// Ambiguous times resolve to the earlier instant.
    pub fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.time_zone
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Local calendar day of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.time_zone).date_naive()
    }

    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        day_start_in(self.time_zone, date)
    }

    pub fn day_end(&self, date: NaiveDate) -> DateTime<Utc> {
        day_end_in(self.time_zone, date)
    }

    fn closing_instant(&self, date: NaiveDate) -> DateTime<Utc> {
        resolve_forward(self.time_zone, date.and_time(self.closing))
    }

    /// Validates a candidate start for `court_id`.
    ///
    /// `today` is the current local day; the past-day rule compares days, not instants.
    pub fn check(
        &self,
        start: DateTime<Utc>,
        court_id: &str,
        existing: &[Booking],
        today: NaiveDate,
    ) -> Result<Slot, SlotRejection> {
        let local = start.with_timezone(&self.time_zone);
        let date = local.date_naive();

        let on_grid = self
            .allowed
            .iter()
            .any(|time| self.local_instant(date, *time) == Some(start));
        if !on_grid {
            return Err(SlotRejection::NotAllowedStart {
                start: local.format("%H:%M").to_string(),
            });
        }

        let end = start + self.duration;
        if end > self.closing_instant(date) {
            return Err(SlotRejection::PastClosing {
                closing: self.closing.format("%H:%M").to_string(),
            });
        }

        if date < today {
            return Err(SlotRejection::PastDay { date });
        }

        if let Some(taken) = existing.iter().find(|booking| {
            booking.court_id == court_id
                && booking.status.occupies_slot()
                && booking.overlaps(start, end)
        }) {
            return Err(SlotRejection::Overlap {
                booking_id: taken.id.clone(),
            });
        }

        Ok(Slot {
            court_id: court_id.to_string(),
            start,
            end,
        })
    }

    pub fn is_selectable(
        &self,
        start: DateTime<Utc>,
        court_id: &str,
        existing: &[Booking],
        today: NaiveDate,
    ) -> bool {
        self.check(start, court_id, existing, today).is_ok()
    }

    /// Every allowed start of `date`, in order, with its verdict for `court_id`.
    pub fn day_slots(
        &self,
        date: NaiveDate,
        court_id: &str,
        existing: &[Booking],
        today: NaiveDate,
    ) -> Vec<DaySlot> {
        self.allowed
            .iter()
            .filter_map(|time| {
                let start = self.local_instant(date, *time)?;
                let verdict = self.check(start, court_id, existing, today);
                Some(DaySlot {
                    label: time.format("%H:%M").to_string(),
                    start,
                    end: start + self.duration,
                    selectable: verdict.is_ok(),
                    rejection: verdict.err(),
                })
            })
            .collect()
    }
}
