// --- File: crates/courtbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where court and booking data comes from.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// In-process deterministic stand-in backend.
    #[default]
    Mock,
    /// The remote booking service described by [`BackendConfig`].
    Api,
}

// --- Booking backend Config ---
// The session cookie is a secret: set it to "secret_from_env" and export BACKEND_SESSION_COOKIE.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub session_cookie: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on simultaneous per-court requests.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            timeout_secs: default_timeout_secs(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

// --- Schedule Config ---
// Times are local wall-clock "HH:MM" in `time_zone`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_reservation_minutes")]
    pub reservation_minutes: i64,
    #[serde(default = "default_closing_time")]
    pub closing_time: String,
    #[serde(default = "default_first_slot")]
    pub first_slot: String,
    #[serde(default = "default_last_slot")]
    pub last_slot: String,
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: u32,
    /// Explicit start times; when present it replaces the first/last/step grid.
    #[serde(default)]
    pub allowed_slots: Option<Vec<String>>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            reservation_minutes: default_reservation_minutes(),
            closing_time: default_closing_time(),
            first_slot: default_first_slot(),
            last_slot: default_last_slot(),
            slot_step_minutes: default_slot_step_minutes(),
            allowed_slots: None,
        }
    }
}

// --- Calendar view Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    #[serde(default = "default_max_courts")]
    pub max_courts: usize,
    /// How many courts are shown the first time a court list arrives.
    #[serde(default = "default_initial_selected")]
    pub initial_selected: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_courts: default_max_courts(),
            initial_selected: default_initial_selected(),
        }
    }
}

// --- Local store Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON snapshot file; in-memory only when unset.
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

// --- Mock backend Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MockConfig {
    #[serde(default = "default_max_courts")]
    pub court_count: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            court_count: default_max_courts(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub data_source: DataSource,

    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

fn default_base_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_in_flight() -> usize {
    6
}

fn default_time_zone() -> String {
    "America/Santiago".to_string()
}

fn default_reservation_minutes() -> i64 {
    90
}

fn default_closing_time() -> String {
    "23:00".to_string()
}

fn default_first_slot() -> String {
    "07:00".to_string()
}

fn default_last_slot() -> String {
    "22:30".to_string()
}

fn default_slot_step_minutes() -> u32 {
    30
}

fn default_max_courts() -> usize {
    10
}

fn default_initial_selected() -> usize {
    3
}
