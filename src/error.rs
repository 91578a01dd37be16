// Error handling module for the Hotel Booking API
// Provides the shared error taxonomy and the JSON error body every domain error renders to

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Classification shared by every domain error.
///
/// Each variant maps to a fixed HTTP status and decides whether the caller
/// may retry the same request against fresh state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Maps to HTTP 400
    Validation,

    /// Referenced entity does not exist. Maps to HTTP 404
    NotFound,

    /// Write-time race or uniqueness clash. Maps to HTTP 409
    Conflict,

    /// Request is well-formed but breaks a business rule. Maps to HTTP 422
    BusinessRule,

    /// Storage or other infrastructure failure. Maps to HTTP 500
    Infrastructure,
}

impl ErrorKind {
    /// Get the HTTP status code for this kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BusinessRule => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry once it has refreshed its view of the world
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Conflict | ErrorKind::Infrastructure)
    }
}

/// Consistent error response structure
///
/// Provides both machine-readable (error_code) and human-readable (message)
/// information. Fields follow snake_case naming convention.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "NO_ROOM_AVAILABLE", "INVALID_COUPON")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// True when the same request may succeed after the caller refreshes state
    pub retryable: bool,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

/// Build the HTTP response for a classified error
///
/// Logs at a level matching the severity:
/// - error!: infrastructure failures (details stay in the log)
/// - warn!: conflicts and business rule rejections
/// - debug!: validation and not-found errors
pub fn render_error(kind: ErrorKind, error_code: &str, message: String) -> Response {
    let client_message = match kind {
        ErrorKind::Infrastructure => {
            error!("Infrastructure error [{}]: {}", error_code, message);
            "An internal server error occurred".to_string()
        }
        ErrorKind::Conflict | ErrorKind::BusinessRule => {
            warn!("Request rejected [{}]: {}", error_code, message);
            message
        }
        ErrorKind::Validation | ErrorKind::NotFound => {
            debug!("Request rejected [{}]: {}", error_code, message);
            message
        }
    };

    let body = ErrorResponse {
        error_code: error_code.to_string(),
        message: client_message,
        retryable: kind.is_retryable(),
        timestamp: Utc::now().to_rfc3339(),
    };

    (kind.status_code(), Json(body)).into_response()
}
