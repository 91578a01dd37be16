use axum::response::{IntoResponse, Response};

use crate::error::{render_error, ErrorKind};
use crate::pricing::PricingError;
use crate::store::StoreError;

/// Error types for booking lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Booking {0} not found")]
    NotFound(i32),

    #[error("No room of type {room_type_id} is free for the requested dates")]
    NoRoomAvailable { room_type_id: i32 },

    #[error("Room {room_id} was taken by a concurrent booking; retry with fresh availability")]
    AvailabilityConflict { room_id: i32 },

    #[error("{0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::Pricing(inner) => inner.kind(),
            BookingError::NotFound(_) => ErrorKind::NotFound,
            BookingError::NoRoomAvailable { .. } | BookingError::InvalidTransition(_) => {
                ErrorKind::BusinessRule
            }
            BookingError::AvailabilityConflict { .. } => ErrorKind::Conflict,
            BookingError::Store(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => "VALIDATION_ERROR",
            BookingError::Pricing(inner) => inner.error_code(),
            BookingError::NotFound(_) => "BOOKING_NOT_FOUND",
            BookingError::NoRoomAvailable { .. } => "NO_ROOM_AVAILABLE",
            BookingError::AvailabilityConflict { .. } => "AVAILABILITY_CONFLICT",
            BookingError::InvalidTransition(_) => "INVALID_TRANSITION",
            BookingError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BookingError::Validation(errors.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        render_error(self.kind(), self.error_code(), self.to_string())
    }
}
