use axum::response::{IntoResponse, Response};

use crate::error::{render_error, ErrorKind};
use crate::models::AddonKind;
use crate::store::StoreError;

/// Why a coupon could not be applied to a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CouponRejection {
    #[error("coupon does not exist")]
    Unknown,

    #[error("coupon is inactive")]
    Inactive,

    #[error("coupon is not valid at this time")]
    OutsideValidity,

    #[error("coupon usage limit has been reached")]
    UsageExhausted,

    #[error("minimum spend for this coupon has not been met")]
    MinimumSpendNotMet,
}

/// Error types for pricing and pricing administration
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Check-out must be at least one night after check-in")]
    InvalidDateRange,

    #[error("Hotel {0} not found")]
    HotelNotFound(i32),

    #[error("Room type {0} not found")]
    RoomTypeNotFound(i32),

    #[error("Room type {0} is not available for booking")]
    RoomTypeUnavailable(i32),

    #[error("Room type {room_type_id} allows at most {max_adults} adults and {max_children} children")]
    CapacityExceeded {
        room_type_id: i32,
        max_adults: i32,
        max_children: i32,
    },

    #[error("{kind:?} addon {id} not found")]
    AddonNotFound { kind: AddonKind, id: i32 },

    #[error("Invalid coupon: {0}")]
    InvalidCoupon(CouponRejection),

    #[error("An active pricing rule already covers part of this date range")]
    OverlappingRule,

    #[error("Coupon code '{0}' already exists")]
    DuplicateCoupon(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PricingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::Validation(_) | PricingError::InvalidDateRange => ErrorKind::Validation,
            PricingError::HotelNotFound(_)
            | PricingError::RoomTypeNotFound(_)
            | PricingError::AddonNotFound { .. } => ErrorKind::NotFound,
            PricingError::RoomTypeUnavailable(_)
            | PricingError::CapacityExceeded { .. }
            | PricingError::InvalidCoupon(_) => ErrorKind::BusinessRule,
            PricingError::OverlappingRule | PricingError::DuplicateCoupon(_) => ErrorKind::Conflict,
            PricingError::Store(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::Validation(_) => "VALIDATION_ERROR",
            PricingError::InvalidDateRange => "INVALID_DATE_RANGE",
            PricingError::HotelNotFound(_) => "HOTEL_NOT_FOUND",
            PricingError::RoomTypeNotFound(_) => "ROOM_TYPE_NOT_FOUND",
            PricingError::RoomTypeUnavailable(_) => "ROOM_TYPE_UNAVAILABLE",
            PricingError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            PricingError::AddonNotFound { .. } => "ADDON_NOT_FOUND",
            PricingError::InvalidCoupon(_) => "INVALID_COUPON",
            PricingError::OverlappingRule => "OVERLAPPING_PRICING_RULE",
            PricingError::DuplicateCoupon(_) => "DUPLICATE_COUPON",
            PricingError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for PricingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PricingError::Validation(errors.to_string())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        render_error(self.kind(), self.error_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_coupon_rejections_are_business_rules() {
        for rejection in [
            CouponRejection::Unknown,
            CouponRejection::Inactive,
            CouponRejection::OutsideValidity,
            CouponRejection::UsageExhausted,
            CouponRejection::MinimumSpendNotMet,
        ] {
            let err = PricingError::InvalidCoupon(rejection);
            assert_eq!(err.kind(), ErrorKind::BusinessRule);
            assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(PricingError::InvalidDateRange.kind(), ErrorKind::Validation);
        assert_eq!(PricingError::RoomTypeNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(PricingError::OverlappingRule.kind(), ErrorKind::Conflict);
        assert_eq!(
            PricingError::DuplicateCoupon("SAVE10".into()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
