// --- File: crates/courtbook_booking/src/factory.rs ---
use chrono_tz::Tz;
use courtbook_common::{CourtApi, CourtbookError};
use courtbook_config::{AppConfig, DataSource};
use std::sync::Arc;
use tracing::info;

use crate::client::HttpCourtApi;
use crate::mock::MockCourtApi;

/// Picks the backend named by `data_source`.
pub fn court_api(config: &AppConfig, time_zone: Tz) -> Result<Arc<dyn CourtApi>, CourtbookError> {
    match config.data_source {
        DataSource::Mock => {
            info!("Using the in-process mock backend ({} courts)", config.mock.court_count);
            Ok(Arc::new(MockCourtApi::new(config.mock.court_count, time_zone)))
        }
        DataSource::Api => {
            info!("Using the booking backend at {}", config.backend.base_url);
            let api = HttpCourtApi::new(&config.backend, time_zone)?;
            Ok(Arc::new(api))
        }
    }
}
