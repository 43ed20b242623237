// --- File: crates/courtbook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{CourtbookError, HttpStatusCode};

pub mod client;

/// `{"error": {"message", "code"}}`, the body of every failed facade call.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    code: u16,
}

/// Renders an error as a facade response.
pub trait IntoHttpResponse {
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for CourtbookError {
    fn into_http_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                message: self.to_string(),
                code: status.as_u16(),
            },
        };
        (status, Json(envelope)).into_response()
    }
}

impl IntoResponse for CourtbookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_carries_message_and_code() {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                message: "Not found: b-1".to_string(),
                code: 404,
            },
        };
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            serde_json::json!({"error": {"message": "Not found: b-1", "code": 404}})
        );
    }

    #[test]
    fn status_follows_the_error() {
        let response = crate::error::conflict("overlap").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
