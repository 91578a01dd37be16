// HTTP handlers for payment endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::Principal;
use crate::payments::{Payment, PaymentError, RecordPaymentRequest, RecordRefundRequest, Refund};
use crate::AppState;

/// Query parameters for listing payments
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub booking_id: Option<i32>,
}

/// Handler for POST /api/v1/payments
pub async fn record_payment_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), PaymentError> {
    let payment = state.payments.record_payment(request, principal.user_id).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Handler for GET /api/v1/payments
pub async fn list_payments_handler(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<Payment>>, PaymentError> {
    let payments = state.payments.list_payments(query.booking_id).await?;
    Ok(Json(payments))
}

/// Handler for POST /api/v1/payments/refunds
pub async fn record_refund_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<RecordRefundRequest>,
) -> Result<(StatusCode, Json<Refund>), PaymentError> {
    let refund = state.payments.record_refund(request, principal.user_id).await?;
    Ok((StatusCode::CREATED, Json(refund)))
}
