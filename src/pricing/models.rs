use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::Stay;

/// Sentinel `usage_limit` meaning a coupon may be redeemed any number of times
pub const UNLIMITED_USAGE: i32 = -1;

/// Entity a dynamic pricing rule overrides the price of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum PricingEntityType {
    RoomType,
    HotelAddOn,
    ActivityAddOn,
}

impl PricingEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingEntityType::RoomType => "RoomType",
            PricingEntityType::HotelAddOn => "HotelAddOn",
            PricingEntityType::ActivityAddOn => "ActivityAddOn",
        }
    }
}

impl std::fmt::Display for PricingEntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a tax or discount value is a percentage or a flat amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum AdjustmentType {
    Percentage,
    Fixed,
}

/// Part of the price a tax rule is levied on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum TaxApplicability {
    Room,
    HotelAddOn,
    ActivityAddOn,
    Total,
}

/// Date-ranged price override for a room type or addon
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DynamicPricingRule {
    pub id: i32,
    pub entity_type: PricingEntityType,
    pub entity_id: i32,
    /// Inclusive
    pub start_date: NaiveDate,
    /// Exclusive
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub priority: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DynamicPricingRule {
    /// Whether the rule's `[start, end)` window contains the night
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }

    /// Whether the rule's window intersects `[start, end)`
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date < end && start < self.end_date
    }

    /// Label shown against nights priced by this rule
    pub fn label(&self) -> String {
        match self.notes.as_deref() {
            Some(notes) if !notes.trim().is_empty() => notes.to_string(),
            _ => "Dynamic Price".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaxRule {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub tax_type: AdjustmentType,
    pub tax_value: Decimal,
    pub applicable_on: TaxApplicability,
    pub start_date: NaiveDate,
    /// `None` means open-ended
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl TaxRule {
    /// Whether the rule is in force for any part of the stay
    pub fn applies_to(&self, stay: &Stay) -> bool {
        self.is_active
            && self.start_date <= stay.check_out
            && self.end_date.map_or(true, |end| end >= stay.check_in)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub discount_type: AdjustmentType,
    pub discount_value: Decimal,
    pub max_discount_amount: Option<Decimal>,
    pub minimum_spend: Option<Decimal>,
    pub usage_limit: i32,
    pub usage_count: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Coupon {
    pub fn is_unlimited(&self) -> bool {
        self.usage_limit == UNLIMITED_USAGE
    }

    /// Whether another redemption fits within the usage limit
    pub fn has_remaining_uses(&self) -> bool {
        self.is_unlimited() || self.usage_count < self.usage_limit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CancellationPolicy {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    /// Minimum hours between cancellation and check-in for this policy to apply
    pub hours_before_check_in: i32,
    pub refund_percentage: Decimal,
    pub priority: i32,
    pub is_active: bool,
}

/// Price resolved for a single night of a stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub price: Decimal,
    /// Label of the overriding rule, `None` when the base price applied
    pub applied_rule: Option<String>,
    pub rule_id: Option<i32>,
}

/// One addon charge line, also persisted against the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonLine {
    pub addon_id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax_rule_id: i32,
    pub name: String,
    pub applicable_on: TaxApplicability,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub coupon_id: i32,
    pub code: String,
    pub discount: Decimal,
}

/// Structured trace of how a quote was priced, stored with the booking
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub nightly: Vec<NightlyRate>,
    pub hotel_addons: Vec<AddonLine>,
    pub activity_addons: Vec<AddonLine>,
    pub coupon: Option<AppliedCoupon>,
    pub taxes: Vec<TaxLine>,
}

/// Fully priced stay, returned for dry quotes and reused by booking creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedQuote {
    pub hotel_id: i32,
    pub room_type_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub num_adults: i32,
    pub num_children: i32,
    pub currency: String,
    pub base_price: Decimal,
    pub room_price_total: Decimal,
    pub hotel_addons_total: Decimal,
    pub activity_addons_total: Decimal,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub price_after_discount: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
    pub breakdown: PriceBreakdown,
}

impl PricedQuote {
    pub fn stay(&self) -> Stay {
        Stay {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }

    pub fn coupon_id(&self) -> Option<i32> {
        self.breakdown.coupon.as_ref().map(|c| c.coupon_id)
    }
}

/// Request DTO for pricing a stay
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteRequest {
    pub hotel_id: i32,
    pub room_type_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "At least one adult is required"))]
    pub num_adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Children count cannot be negative"))]
    pub num_children: i32,
    #[serde(default)]
    pub hotel_addon_ids: Vec<i32>,
    #[serde(default)]
    pub activity_addon_ids: Vec<i32>,
    #[validate(length(min = 1, max = 32))]
    pub coupon_code: Option<String>,
}

/// Request DTO for creating a dynamic pricing rule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDynamicPricingRequest {
    pub entity_type: PricingEntityType,
    pub entity_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaxRuleRequest {
    pub hotel_id: i32,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub tax_type: AdjustmentType,
    pub tax_value: Decimal,
    pub applicable_on: TaxApplicability,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_type: AdjustmentType,
    pub discount_value: Decimal,
    pub max_discount_amount: Option<Decimal>,
    pub minimum_spend: Option<Decimal>,
    #[serde(default = "default_usage_limit")]
    #[validate(range(min = -1, message = "Usage limit must be -1 (unlimited) or positive"))]
    pub usage_limit: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCancellationPolicyRequest {
    pub hotel_id: i32,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 0, message = "Hours before check-in cannot be negative"))]
    pub hours_before_check_in: i32,
    pub refund_percentage: Decimal,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_usage_limit() -> i32 {
    UNLIMITED_USAGE
}
