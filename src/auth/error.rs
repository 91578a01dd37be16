// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use tracing::warn;

use crate::error::ErrorResponse;

/// Errors raised while identifying the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!("Authentication failed: {}", self);

        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.to_string(),
            retryable: false,
            timestamp: Utc::now().to_rfc3339(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
