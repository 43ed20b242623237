// --- File: crates/courtbook_booking/src/range.rs ---
//! Admin reservation listing over a week or a month.

use chrono::{Datelike, Duration, NaiveDate};
use courtbook_common::{ApiError, Booking, BookingStatus, CourtApi, RangeQuery};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::availability::SlotPolicy;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    #[default]
    Week,
    Month,
}

/// `all` or a single status, in any vocabulary the backend uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn status(self) -> Option<BookingStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        BookingStatus::parse_loose(trimmed)
            .map(StatusFilter::Only)
            .ok_or_else(|| format!("unknown status filter '{}'", raw))
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Inclusive first and last local day of the range containing `anchor`.
/// Weeks run Monday to Sunday.
pub fn range_days(mode: RangeMode, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match mode {
        RangeMode::Week => {
            let offset = i64::from(anchor.weekday().num_days_from_monday());
            let first = anchor - Duration::days(offset);
            (first, first + Duration::days(6))
        }
        RangeMode::Month => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            let next_month = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            };
            let last = next_month
                .and_then(|next| next.pred_opt())
                .unwrap_or(first);
            (first, last)
        }
    }
}

/// Lists one court's bookings over the range, sorted by start.
///
/// Without a court id nothing is requested and the list is empty.
pub async fn list_reservations(
    api: &dyn CourtApi,
    policy: &SlotPolicy,
    mode: RangeMode,
    anchor: NaiveDate,
    status: StatusFilter,
    court_id: Option<&str>,
) -> Result<Vec<Booking>, ApiError> {
    let Some(court_id) = court_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(Vec::new());
    };
    let (first, last) = range_days(mode, anchor);
    let query = RangeQuery {
        court_id: court_id.to_string(),
        from: policy.day_start(first),
        to: policy.day_end(last),
        status: status.status(),
    };
    debug!("Listing reservations of {} from {} to {} ({})", court_id, first, last, status);

    let mut bookings: Vec<Booking> = api
        .list_bookings_range(query)
        .await?
        .into_iter()
        .filter(|b| status.status().map_or(true, |wanted| b.status == wanted))
        .collect();
    bookings.sort_by_key(|b| b.start_time);
    Ok(bookings)
}
