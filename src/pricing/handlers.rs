// HTTP handlers for pricing endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::Principal;
use crate::pricing::{
    CancellationPolicy, Coupon, CreateCancellationPolicyRequest, CreateCouponRequest,
    CreateDynamicPricingRequest, CreateTaxRuleRequest, DynamicPricingRule, PricedQuote,
    PricingEntityType, PricingError, QuoteRequest, TaxRule,
};
use crate::AppState;

/// Query parameters for listing dynamic pricing rules
#[derive(Debug, Deserialize)]
pub struct DynamicPricingQuery {
    pub entity_type: Option<PricingEntityType>,
    pub entity_id: Option<i32>,
}

/// Query parameters for lists scoped to a hotel
#[derive(Debug, Deserialize)]
pub struct HotelScopeQuery {
    pub hotel_id: Option<i32>,
}

/// Handler for POST /api/v1/pricing/quote
/// Prices a stay without reserving anything
pub async fn quote_handler(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<PricedQuote>, PricingError> {
    let quote = state.pricing.quote(&request).await?;
    Ok(Json(quote))
}

/// Handler for POST /api/v1/pricing/dynamic-pricing
pub async fn create_dynamic_pricing_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateDynamicPricingRequest>,
) -> Result<(StatusCode, Json<DynamicPricingRule>), PricingError> {
    let rule = state.pricing_rules.create_dynamic_rule(request).await?;
    info!("User {} created dynamic pricing rule {}", principal.user_id, rule.id);
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Handler for GET /api/v1/pricing/dynamic-pricing
pub async fn list_dynamic_pricing_handler(
    State(state): State<AppState>,
    Query(query): Query<DynamicPricingQuery>,
) -> Result<Json<Vec<DynamicPricingRule>>, PricingError> {
    let rules = state
        .pricing_rules
        .list_dynamic_rules(query.entity_type, query.entity_id)
        .await?;
    Ok(Json(rules))
}

/// Handler for POST /api/v1/pricing/tax-rules
pub async fn create_tax_rule_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateTaxRuleRequest>,
) -> Result<(StatusCode, Json<TaxRule>), PricingError> {
    let rule = state.pricing_rules.create_tax_rule(request).await?;
    info!("User {} created tax rule {}", principal.user_id, rule.id);
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Handler for GET /api/v1/pricing/tax-rules
pub async fn list_tax_rules_handler(
    State(state): State<AppState>,
    Query(query): Query<HotelScopeQuery>,
) -> Result<Json<Vec<TaxRule>>, PricingError> {
    let rules = state.pricing_rules.list_tax_rules(query.hotel_id).await?;
    Ok(Json(rules))
}

/// Handler for POST /api/v1/pricing/coupons
pub async fn create_coupon_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>), PricingError> {
    let coupon = state.pricing_rules.create_coupon(request).await?;
    info!("User {} created coupon {}", principal.user_id, coupon.code);
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Handler for GET /api/v1/pricing/coupons
pub async fn list_coupons_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Coupon>>, PricingError> {
    let coupons = state.pricing_rules.list_coupons().await?;
    Ok(Json(coupons))
}

/// Handler for POST /api/v1/pricing/cancellation-policies
pub async fn create_cancellation_policy_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(request): Json<CreateCancellationPolicyRequest>,
) -> Result<(StatusCode, Json<CancellationPolicy>), PricingError> {
    let policy = state.pricing_rules.create_cancellation_policy(request).await?;
    info!(
        "User {} created cancellation policy {}",
        principal.user_id, policy.id
    );
    Ok((StatusCode::CREATED, Json(policy)))
}

/// Handler for GET /api/v1/pricing/cancellation-policies
pub async fn list_cancellation_policies_handler(
    State(state): State<AppState>,
    Query(query): Query<HotelScopeQuery>,
) -> Result<Json<Vec<CancellationPolicy>>, PricingError> {
    let policies = state
        .pricing_rules
        .list_cancellation_policies(query.hotel_id)
        .await?;
    Ok(Json(policies))
}
