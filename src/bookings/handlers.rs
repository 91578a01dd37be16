// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::Principal;
use crate::bookings::{
    Booking, BookingDetails, BookingError, CancelBookingRequest, CancellationOutcome,
    CreateBookingRequest,
};
use crate::AppState;

/// Handler for POST /api/v1/bookings
/// Prices the stay, allocates a room and creates a pending booking
pub async fn create_booking_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    let booking = state.bookings.create(request, principal.user_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/v1/bookings/:id
pub async fn get_booking_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> Result<Json<BookingDetails>, BookingError> {
    let details = state.bookings.get(booking_id).await?;
    Ok(Json(details))
}

/// Handler for POST /api/v1/bookings/:id/cancel
/// The body is optional; an empty request cancels without a reason
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(booking_id): Path<i32>,
    request: Option<Json<CancelBookingRequest>>,
) -> Result<Json<CancellationOutcome>, BookingError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let outcome = state
        .bookings
        .cancel(booking_id, request, principal.user_id)
        .await?;
    Ok(Json(outcome))
}

/// Handler for POST /api/v1/bookings/:id/complete
pub async fn complete_booking_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(booking_id): Path<i32>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state.bookings.complete(booking_id, principal.user_id).await?;
    Ok(Json(booking))
}
