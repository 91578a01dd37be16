// Hotel booking API
//
// Pricing, availability, the booking lifecycle and payments over PostgreSQL,
// exposed through axum.

pub mod auth;
pub mod availability;
pub mod bookings;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod payments;
pub mod pricing;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::auth::TokenService;
use crate::availability::AvailabilityService;
use crate::bookings::BookingService;
use crate::config::AppConfig;
use crate::events::EventPublisher;
use crate::payments::PaymentService;
use crate::pricing::{PricingRulesService, PricingService};
use crate::store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub pricing: Arc<PricingService>,
    pub pricing_rules: Arc<PricingRulesService>,
    pub availability: Arc<AvailabilityService>,
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    /// Wire every service to one store handle and one event publisher
    pub fn new(config: AppConfig, store: Arc<dyn Store>, events: EventPublisher) -> Self {
        let currency = config.default_currency.clone();
        let pricing = Arc::new(PricingService::new(store.clone(), currency.clone()));

        Self {
            tokens: TokenService::new(config.jwt_secret.as_str()),
            pricing_rules: Arc::new(PricingRulesService::new(store.clone())),
            availability: Arc::new(AvailabilityService::new(store.clone())),
            bookings: Arc::new(BookingService::new(
                store.clone(),
                pricing.clone(),
                events.clone(),
                currency.clone(),
            )),
            payments: Arc::new(PaymentService::new(store, events, currency)),
            pricing,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Handler for GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Creates the application router
/// Maps all API endpoints to their handlers; layers are added by the caller
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Pricing
        .route("/api/v1/pricing/quote", post(pricing::quote_handler))
        .route(
            "/api/v1/pricing/dynamic-pricing",
            post(pricing::create_dynamic_pricing_handler).get(pricing::list_dynamic_pricing_handler),
        )
        .route(
            "/api/v1/pricing/tax-rules",
            post(pricing::create_tax_rule_handler).get(pricing::list_tax_rules_handler),
        )
        .route(
            "/api/v1/pricing/coupons",
            post(pricing::create_coupon_handler).get(pricing::list_coupons_handler),
        )
        .route(
            "/api/v1/pricing/cancellation-policies",
            post(pricing::create_cancellation_policy_handler)
                .get(pricing::list_cancellation_policies_handler),
        )
        // Availability
        .route(
            "/api/v1/availability",
            get(availability::search_availability_handler),
        )
        // Bookings
        .route("/api/v1/bookings", post(bookings::create_booking_handler))
        .route("/api/v1/bookings/:id", get(bookings::get_booking_handler))
        .route(
            "/api/v1/bookings/:id/cancel",
            post(bookings::cancel_booking_handler),
        )
        .route(
            "/api/v1/bookings/:id/complete",
            post(bookings::complete_booking_handler),
        )
        // Payments
        .route(
            "/api/v1/payments",
            post(payments::record_payment_handler).get(payments::list_payments_handler),
        )
        .route(
            "/api/v1/payments/refunds",
            post(payments::record_refund_handler),
        )
        .with_state(state)
}
