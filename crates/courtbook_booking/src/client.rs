//! HTTP booking client module
//!
//! This module provides [`HttpCourtApi`], the [`CourtApi`] implementation that talks
//! to the remote booking backend over its REST interface. Every call is a single
//! round trip without retries; the only fan-out is the per-court listing, which is
//! bounded by [`crate::pool::run_bounded`].
//!
//! All payloads are normalized through [`crate::wire`] before they leave this module.

use chrono::NaiveDate;
use chrono_tz::Tz;
use courtbook_common::{
    create_client, ApiError, Booking, BoxFuture, CalendarDay, Court, CourtApi, CreatedBooking,
    NewBooking, RangeQuery,
};
use courtbook_config::BackendConfig;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, info};

use crate::availability::{day_end_in, day_start_in};
use crate::pool::{run_bounded, DEFAULT_MAX_IN_FLIGHT};
use crate::wire::{
    error_message, format_instant, into_bookings, CancelBody, CreateBody, RangeBody, RawBooking,
    RawCourt,
};

/// Client for the remote booking backend.
///
/// Cloning is cheap; the underlying `reqwest::Client` is shared.
#[derive(Clone)]
pub struct HttpCourtApi {
    /// HTTP client with the configured timeout
    client: Client,

    /// Backend root, e.g. `http://localhost:3002`
    base_url: Url,

    /// Forwarded verbatim as the `Cookie` header
    session_cookie: Option<String>,

    /// Operating timezone; day listings cover the local day
    time_zone: Tz,

    /// Bound on simultaneous per-court requests
    max_in_flight: usize,
}

impl HttpCourtApi {
    /// Creates a client from the backend configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL, session cookie, timeout and fan-out bound
    /// * `time_zone` - Timezone whose local days are listed
    pub fn new(config: &BackendConfig, time_zone: Tz) -> Result<Self, ApiError> {
        let client = create_client(config.timeout_secs, true)?;
        let mut api = Self::with_client(client, &config.base_url, time_zone)?;
        api.session_cookie = config
            .session_cookie
            .clone()
            .filter(|cookie| !cookie.trim().is_empty());
        api.max_in_flight = config.max_in_flight.max(1);
        Ok(api)
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str, time_zone: Tz) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            ApiError::request(None, format!("invalid base url '{}': {}", base_url, err))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::request(
                None,
                format!("base url '{}' cannot carry a path", base_url),
            ));
        }
        Ok(Self {
            client,
            base_url,
            session_cookie: None,
            time_zone,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        })
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    // Appends percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        }
    }

    /// Bookings of one court between the bounds of a local day.
    async fn fetch_court_day(
        &self,
        court_id: String,
        day: NaiveDate,
    ) -> Result<Vec<Booking>, ApiError> {
        let start = day_start_in(self.time_zone, day);
        let end = day_end_in(self.time_zone, day);
        let url = self.url(&["bookings", "court", &court_id, "events"]);
        debug!("Fetching bookings of court {} for {}", court_id, day);

        let response = self
            .authorized(self.client.get(url))
            .query(&[("start", format_instant(start)), ("end", format_instant(end))])
            .send()
            .await?;
        let raw: Vec<RawBooking> = decode(ensure_success(response).await?).await?;
        Ok(into_bookings(raw, &court_id))
    }
}

impl CourtApi for HttpCourtApi {
    fn list_courts(&self) -> BoxFuture<'_, Vec<Court>, ApiError> {
        Box::pin(async move {
            let response = self
                .authorized(self.client.get(self.url(&["courts"])))
                .send()
                .await?;
            let raw: Vec<RawCourt> = decode(ensure_success(response).await?).await?;
            Ok(raw.into_iter().map(RawCourt::into_court).collect())
        })
    }

    fn list_bookings(
        &self,
        day: NaiveDate,
        court_ids: &[String],
    ) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        let court_ids = court_ids.to_vec();
        Box::pin(async move {
            let court_ids = if court_ids.is_empty() {
                self.list_courts()
                    .await?
                    .into_iter()
                    .map(|court| court.id)
                    .collect()
            } else {
                court_ids
            };

            let per_court = run_bounded(&court_ids, self.max_in_flight, |court_id| {
                self.fetch_court_day(court_id.clone(), day)
            })
            .await;

            let mut bookings = Vec::new();
            for result in per_court {
                bookings.extend(result?);
            }
            Ok(bookings)
        })
    }

    fn list_calendar_day(&self, day: NaiveDate) -> BoxFuture<'_, CalendarDay, ApiError> {
        Box::pin(async move {
            let courts = self.list_courts().await?;
            if courts.is_empty() {
                return Ok(CalendarDay::default());
            }
            let court_ids: Vec<String> = courts.iter().map(|court| court.id.clone()).collect();
            let bookings = self.list_bookings(day, &court_ids).await?;
            Ok(CalendarDay { courts, bookings })
        })
    }

    fn create_booking(&self, booking: NewBooking) -> BoxFuture<'_, CreatedBooking, ApiError> {
        Box::pin(async move {
            let response = self
                .authorized(self.client.post(self.url(&["bookings"])))
                .json(&CreateBody::from(&booking))
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::CONFLICT {
                let message = failure_message(response).await;
                info!("Backend refused overlapping booking on court {}", booking.court_id);
                return Err(ApiError::Conflict(message));
            }
            let raw: RawBooking = decode(ensure_success(response).await?)
                .await
                .map_err(|err| ApiError::request(Some(status.as_u16()), err))?;
            Ok(raw.into_created())
        })
    }

    fn cancel_booking(
        &self,
        booking_id: &str,
        reason: Option<String>,
    ) -> BoxFuture<'_, (), ApiError> {
        let booking_id = booking_id.to_string();
        Box::pin(async move {
            let response = self
                .authorized(self.client.patch(self.url(&["bookings", &booking_id, "cancel"])))
                .json(&CancelBody { reason })
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                let message = error_message(&response.text().await.unwrap_or_default())
                    .unwrap_or_else(|| booking_id.clone());
                return Err(ApiError::NotFound(message));
            }
            ensure_success(response).await?;
            Ok(())
        })
    }

    fn list_bookings_range(&self, query: RangeQuery) -> BoxFuture<'_, Vec<Booking>, ApiError> {
        Box::pin(async move {
            let mut params = vec![
                ("from", format_instant(query.from)),
                ("to", format_instant(query.to)),
            ];
            if let Some(status) = query.status {
                params.push(("status", status.as_str().to_string()));
            }
            let response = self
                .authorized(self.client.get(self.url(&["bookings", "court", &query.court_id])))
                .query(&params)
                .send()
                .await?;
            let body: RangeBody = decode(ensure_success(response).await?).await?;
            Ok(into_bookings(body.into_items(), &query.court_id))
        })
    }
}

/// Passes 2xx responses through and turns everything else into [`ApiError::Request`].
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = failure_message(response).await;
    Err(ApiError::request(Some(status.as_u16()), message))
}

/// Backend message of a failed response, or `HTTP <code>`.
async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_message(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}
