use axum::response::{IntoResponse, Response};

use crate::error::{render_error, ErrorKind};
use crate::store::StoreError;

/// Error types for availability search
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Check-out must be at least one night after check-in")]
    InvalidDateRange,

    #[error("Hotel {0} not found")]
    HotelNotFound(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AvailabilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AvailabilityError::Validation(_) | AvailabilityError::InvalidDateRange => {
                ErrorKind::Validation
            }
            AvailabilityError::HotelNotFound(_) => ErrorKind::NotFound,
            AvailabilityError::Store(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AvailabilityError::Validation(_) => "VALIDATION_ERROR",
            AvailabilityError::InvalidDateRange => "INVALID_DATE_RANGE",
            AvailabilityError::HotelNotFound(_) => "HOTEL_NOT_FOUND",
            AvailabilityError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AvailabilityError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AvailabilityError::Validation(errors.to_string())
    }
}

impl IntoResponse for AvailabilityError {
    fn into_response(self) -> Response {
        render_error(self.kind(), self.error_code(), self.to_string())
    }
}
