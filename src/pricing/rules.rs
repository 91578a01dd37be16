// Administration of dynamic pricing rules, tax rules, coupons and cancellation policies

use std::sync::Arc;

use validator::Validate;

use crate::models::AddonKind;
use crate::pricing::error::PricingError;
use crate::pricing::models::{
    AdjustmentType, CancellationPolicy, Coupon, CreateCancellationPolicyRequest,
    CreateCouponRequest, CreateDynamicPricingRequest, CreateTaxRuleRequest, DynamicPricingRule,
    PricingEntityType, TaxRule, UNLIMITED_USAGE,
};
use crate::store::{Store, StoreError};
use crate::validation::{
    normalize_coupon_code, validate_non_negative_amount, validate_percentage,
};

#[derive(Clone)]
pub struct PricingRulesService {
    store: Arc<dyn Store>,
}

impl PricingRulesService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a date-ranged price override
    ///
    /// Active rules for the same entity may not overlap; the check and the
    /// insert run in one unit of work.
    pub async fn create_dynamic_rule(
        &self,
        request: CreateDynamicPricingRequest,
    ) -> Result<DynamicPricingRule, PricingError> {
        request.validate()?;
        if request.start_date >= request.end_date {
            return Err(PricingError::InvalidDateRange);
        }
        validate_non_negative_amount("price", request.price).map_err(PricingError::Validation)?;

        let mut tx = self.store.begin().await?;

        match request.entity_type {
            PricingEntityType::RoomType => {
                tx.room_type(request.entity_id)
                    .await?
                    .ok_or(PricingError::RoomTypeNotFound(request.entity_id))?;
            }
            PricingEntityType::HotelAddOn | PricingEntityType::ActivityAddOn => {
                let kind = if request.entity_type == PricingEntityType::HotelAddOn {
                    AddonKind::Hotel
                } else {
                    AddonKind::Activity
                };
                if tx.addons(kind, &[request.entity_id]).await?.is_empty() {
                    return Err(PricingError::AddonNotFound {
                        kind,
                        id: request.entity_id,
                    });
                }
            }
        }

        if request.is_active
            && tx
                .overlapping_rule_exists(
                    request.entity_type,
                    request.entity_id,
                    request.start_date,
                    request.end_date,
                )
                .await?
        {
            tracing::warn!(
                "Rejected overlapping pricing rule for {} {} ({} to {})",
                request.entity_type,
                request.entity_id,
                request.start_date,
                request.end_date
            );
            return Err(PricingError::OverlappingRule);
        }

        let rule = tx.insert_dynamic_rule(&request).await?;
        tx.commit().await?;

        tracing::info!(
            "Created pricing rule {} for {} {}",
            rule.id,
            rule.entity_type,
            rule.entity_id
        );
        Ok(rule)
    }

    pub async fn list_dynamic_rules(
        &self,
        entity_type: Option<PricingEntityType>,
        entity_id: Option<i32>,
    ) -> Result<Vec<DynamicPricingRule>, PricingError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_dynamic_rules(entity_type, entity_id).await?)
    }

    pub async fn create_tax_rule(&self, request: CreateTaxRuleRequest) -> Result<TaxRule, PricingError> {
        request.validate()?;
        validate_non_negative_amount("tax_value", request.tax_value)
            .map_err(PricingError::Validation)?;
        if request.tax_type == AdjustmentType::Percentage {
            validate_percentage("tax_value", request.tax_value).map_err(PricingError::Validation)?;
        }
        if let Some(end) = request.end_date {
            if end < request.start_date {
                return Err(PricingError::InvalidDateRange);
            }
        }

        let mut tx = self.store.begin().await?;
        tx.hotel(request.hotel_id)
            .await?
            .ok_or(PricingError::HotelNotFound(request.hotel_id))?;
        let rule = tx.insert_tax_rule(&request).await?;
        tx.commit().await?;

        tracing::info!("Created tax rule {} for hotel {}", rule.id, rule.hotel_id);
        Ok(rule)
    }

    pub async fn list_tax_rules(&self, hotel_id: Option<i32>) -> Result<Vec<TaxRule>, PricingError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_tax_rules(hotel_id).await?)
    }

    pub async fn create_coupon(&self, mut request: CreateCouponRequest) -> Result<Coupon, PricingError> {
        request.validate()?;
        request.code = normalize_coupon_code(&request.code).map_err(PricingError::Validation)?;

        validate_non_negative_amount("discount_value", request.discount_value)
            .map_err(PricingError::Validation)?;
        if request.discount_type == AdjustmentType::Percentage {
            validate_percentage("discount_value", request.discount_value)
                .map_err(PricingError::Validation)?;
        }
        if let Some(cap) = request.max_discount_amount {
            validate_non_negative_amount("max_discount_amount", cap)
                .map_err(PricingError::Validation)?;
        }
        if let Some(minimum) = request.minimum_spend {
            validate_non_negative_amount("minimum_spend", minimum)
                .map_err(PricingError::Validation)?;
        }
        if request.usage_limit == 0 {
            return Err(PricingError::Validation(format!(
                "usage_limit must be {} (unlimited) or at least 1",
                UNLIMITED_USAGE
            )));
        }
        if request.end_date <= request.start_date {
            return Err(PricingError::InvalidDateRange);
        }

        let mut tx = self.store.begin().await?;
        if tx.coupon_by_code(&request.code).await?.is_some() {
            return Err(PricingError::DuplicateCoupon(request.code));
        }
        let coupon = tx
            .insert_coupon(&request)
            .await
            .map_err(|e| duplicate_or_store(e, &request.code))?;
        tx.commit().await?;

        tracing::info!("Created coupon {} ({})", coupon.id, coupon.code);
        Ok(coupon)
    }

    pub async fn list_coupons(&self) -> Result<Vec<Coupon>, PricingError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_coupons().await?)
    }

    pub async fn create_cancellation_policy(
        &self,
        request: CreateCancellationPolicyRequest,
    ) -> Result<CancellationPolicy, PricingError> {
        request.validate()?;
        validate_percentage("refund_percentage", request.refund_percentage)
            .map_err(PricingError::Validation)?;

        let mut tx = self.store.begin().await?;
        tx.hotel(request.hotel_id)
            .await?
            .ok_or(PricingError::HotelNotFound(request.hotel_id))?;
        let policy = tx.insert_cancellation_policy(&request).await?;
        tx.commit().await?;

        tracing::info!(
            "Created cancellation policy {} for hotel {} ({}% at {}h)",
            policy.id,
            policy.hotel_id,
            policy.refund_percentage,
            policy.hours_before_check_in
        );
        Ok(policy)
    }

    pub async fn list_cancellation_policies(
        &self,
        hotel_id: Option<i32>,
    ) -> Result<Vec<CancellationPolicy>, PricingError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_cancellation_policies(hotel_id).await?)
    }
}

/// A concurrent insert of the same code surfaces as a unique violation
fn duplicate_or_store(err: StoreError, code: &str) -> PricingError {
    match &err {
        StoreError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            PricingError::DuplicateCoupon(code.to_string())
        }
        _ => PricingError::Store(err),
    }
}
