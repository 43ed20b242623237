// --- File: crates/courtbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

use crate::services::ApiError;

/// Workspace-wide error, rendered as the JSON error body of the HTTP facade.
///
/// Crate-specific errors convert into it with `From`.
#[derive(Error, Debug)]
pub enum CourtbookError {
    /// Transport failure talking to the booking backend
    #[error("Backend request failed: {0}")]
    HttpError(String),

    /// A payload that could not be (de)serialized
    #[error("Malformed payload: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A request the booking rules refuse
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The booking backend answered with an error
    #[error("{service_name} failed: {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Overlapping booking reported by the backend
    #[error("Booking conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// HTTP status an error is served with.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CourtbookError {
    fn status_code(&self) -> u16 {
        match self {
            CourtbookError::ParseError(_) | CourtbookError::ValidationError(_) => 400,
            CourtbookError::NotFoundError(_) => 404,
            CourtbookError::ConflictError(_) => 409,
            CourtbookError::HttpError(_) | CourtbookError::ExternalServiceError { .. } => 502,
            CourtbookError::ConfigError(_) | CourtbookError::InternalError(_) => 500,
        }
    }
}

impl HttpStatusCode for ApiError {
    fn status_code(&self) -> u16 {
        match self {
            ApiError::Conflict(_) => 409,
            ApiError::NotFound(_) => 404,
            ApiError::Request { .. } | ApiError::Decode(_) => 502,
        }
    }
}

/// Attaches a description of the failed step, turning any error into
/// [`CourtbookError::InternalError`].
pub trait Context<T, E> {
    fn context<C>(self, context: C) -> Result<T, CourtbookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Like [`Context::context`], building the description only on failure.
    fn with_context<C, F>(self, f: F) -> Result<T, CourtbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CourtbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CourtbookError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CourtbookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CourtbookError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<ApiError> for CourtbookError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Conflict(message) => conflict(message),
            ApiError::NotFound(message) => not_found(message),
            ApiError::Request { status, message } => external_service_error(
                "booking backend",
                match status {
                    Some(code) => format!("HTTP {}: {}", code, message),
                    None => message,
                },
            ),
            ApiError::Decode(message) => external_service_error("booking backend", message),
        }
    }
}

impl From<reqwest::Error> for CourtbookError {
    fn from(err: reqwest::Error) -> Self {
        CourtbookError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for CourtbookError {
    fn from(err: serde_json::Error) -> Self {
        CourtbookError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for CourtbookError {
    fn from(err: std::io::Error) -> Self {
        CourtbookError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CourtbookError {
    CourtbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> CourtbookError {
    CourtbookError::InternalError(message.to_string())
}
