use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;

use crate::error::{render_error, ErrorKind};
use crate::store::StoreError;

/// Error types for payment and refund operations
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking {0} not found")]
    BookingNotFound(i32),

    #[error("Payment {0} not found")]
    PaymentNotFound(i32),

    #[error("Booking {0} is cancelled and cannot take payments")]
    BookingCancelled(i32),

    #[error("Payment {0} is not completed and cannot be refunded")]
    PaymentNotSettled(i32),

    #[error("Refund of {requested} exceeds the refundable balance of {available}")]
    RefundExceedsBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::Validation(_) => ErrorKind::Validation,
            PaymentError::BookingNotFound(_) | PaymentError::PaymentNotFound(_) => {
                ErrorKind::NotFound
            }
            PaymentError::BookingCancelled(_)
            | PaymentError::PaymentNotSettled(_)
            | PaymentError::RefundExceedsBalance { .. } => ErrorKind::BusinessRule,
            PaymentError::Store(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PaymentError::Validation(_) => "VALIDATION_ERROR",
            PaymentError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            PaymentError::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            PaymentError::BookingCancelled(_) => "BOOKING_CANCELLED",
            PaymentError::PaymentNotSettled(_) => "PAYMENT_NOT_SETTLED",
            PaymentError::RefundExceedsBalance { .. } => "REFUND_EXCEEDS_BALANCE",
            PaymentError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for PaymentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PaymentError::Validation(errors.to_string())
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        render_error(self.kind(), self.error_code(), self.to_string())
    }
}
