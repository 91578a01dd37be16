use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::models::{Addon, AddonKind, RoomType, Stay, MAX_STAY_NIGHTS};
use crate::pricing::error::{CouponRejection, PricingError};
use crate::pricing::models::{
    AppliedCoupon, Coupon, DynamicPricingRule, PriceBreakdown, PricedQuote, PricingEntityType,
    QuoteRequest, TaxRule,
};
use crate::pricing::rate_engine::RateEngine;
use crate::pricing::surcharge::{SurchargeEngine, TaxBasis};
use crate::store::{Store, StoreTx};

/// Everything needed to price a stay, already loaded from the store
#[derive(Debug, Clone)]
pub struct QuoteInputs<'a> {
    pub hotel_id: i32,
    pub currency: String,
    pub room_type: &'a RoomType,
    pub stay: Stay,
    pub num_adults: i32,
    pub num_children: i32,
    pub rules: &'a [DynamicPricingRule],
    pub hotel_addons: &'a [Addon],
    pub activity_addons: &'a [Addon],
    pub coupon: Option<&'a Coupon>,
    pub tax_rules: &'a [TaxRule],
}

/// Produces priced quotes; used standalone and by booking creation
#[derive(Clone)]
pub struct PricingService {
    store: Arc<dyn Store>,
    default_currency: String,
}

impl PricingService {
    pub fn new(store: Arc<dyn Store>, default_currency: impl Into<String>) -> Self {
        Self {
            store,
            default_currency: default_currency.into(),
        }
    }

    /// Price a stay as of now
    pub async fn quote(&self, request: &QuoteRequest) -> Result<PricedQuote, PricingError> {
        self.quote_at(request, Utc::now()).await
    }

    /// Price a stay as of `now`; reads only, nothing is written
    pub async fn quote_at(
        &self,
        request: &QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<PricedQuote, PricingError> {
        let mut tx = self.store.begin().await?;
        let quote = self.quote_in(tx.as_mut(), request, now).await?;
        tracing::debug!(
            "Quoted room type {} for {} nights: total {}",
            quote.room_type_id,
            quote.nights,
            quote.total
        );
        Ok(quote)
    }

    /// Price a stay using an already open unit of work
    pub async fn quote_in(
        &self,
        tx: &mut dyn StoreTx,
        request: &QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<PricedQuote, PricingError> {
        request.validate()?;
        let stay = Stay::new(request.check_in, request.check_out)
            .ok_or(PricingError::InvalidDateRange)?;
        if stay.nights() > MAX_STAY_NIGHTS {
            return Err(PricingError::Validation(format!(
                "Stay cannot exceed {} nights",
                MAX_STAY_NIGHTS
            )));
        }

        let hotel = tx
            .hotel(request.hotel_id)
            .await?
            .ok_or(PricingError::HotelNotFound(request.hotel_id))?;

        let room_type = tx
            .room_type(request.room_type_id)
            .await?
            .filter(|rt| rt.hotel_id == hotel.id)
            .ok_or(PricingError::RoomTypeNotFound(request.room_type_id))?;

        if !room_type.is_active {
            return Err(PricingError::RoomTypeUnavailable(room_type.id));
        }
        if request.num_adults > room_type.max_adults || request.num_children > room_type.max_children {
            return Err(PricingError::CapacityExceeded {
                room_type_id: room_type.id,
                max_adults: room_type.max_adults,
                max_children: room_type.max_children,
            });
        }

        let rules = tx
            .dynamic_rules(PricingEntityType::RoomType, room_type.id, &stay)
            .await?;
        let hotel_addons =
            load_addons(tx, AddonKind::Hotel, &request.hotel_addon_ids, hotel.id).await?;
        let activity_addons =
            load_addons(tx, AddonKind::Activity, &request.activity_addon_ids, hotel.id).await?;

        let coupon = match request.coupon_code.as_deref() {
            Some(code) => Some(
                tx.coupon_by_code(&code.trim().to_uppercase())
                    .await?
                    .ok_or(PricingError::InvalidCoupon(CouponRejection::Unknown))?,
            ),
            None => None,
        };

        let tax_rules = tx.tax_rules(hotel.id, &stay).await?;

        let inputs = QuoteInputs {
            hotel_id: hotel.id,
            currency: hotel
                .currency
                .clone()
                .unwrap_or_else(|| self.default_currency.clone()),
            room_type: &room_type,
            stay,
            num_adults: request.num_adults,
            num_children: request.num_children,
            rules: &rules,
            hotel_addons: &hotel_addons,
            activity_addons: &activity_addons,
            coupon: coupon.as_ref(),
            tax_rules: &tax_rules,
        };

        compute_quote(&inputs, now)
    }
}

/// Load requested addons, rejecting ids that are unknown, inactive or belong to another hotel.
/// Activity addons without a hotel are global and allowed everywhere.
async fn load_addons(
    tx: &mut dyn StoreTx,
    kind: AddonKind,
    ids: &[i32],
    hotel_id: i32,
) -> Result<Vec<Addon>, PricingError> {
    let mut wanted: Vec<i32> = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let found = tx.addons(kind, &wanted).await?;
    let mut addons = Vec::with_capacity(wanted.len());
    for id in wanted {
        let addon = found
            .iter()
            .find(|a| a.id == id)
            .filter(|a| a.is_active)
            .filter(|a| match (kind, a.hotel_id) {
                (AddonKind::Activity, None) => true,
                (_, owner) => owner == Some(hotel_id),
            })
            .ok_or(PricingError::AddonNotFound { kind, id })?;
        addons.push(addon.clone());
    }
    Ok(addons)
}

/// Price a stay from loaded inputs
///
/// Order is fixed: nightly rates, addons, coupon on the subtotal, then taxes
/// on their chosen basis. `total = subtotal - discount + tax_total` holds exactly.
pub fn compute_quote(inputs: &QuoteInputs<'_>, now: DateTime<Utc>) -> Result<PricedQuote, PricingError> {
    let nightly = RateEngine::price_stay(inputs.room_type.base_price, inputs.rules, &inputs.stay);
    let room_price_total = RateEngine::room_total(&nightly);

    let guests = inputs.num_adults + inputs.num_children;
    let hotel_lines: Vec<_> = inputs
        .hotel_addons
        .iter()
        .map(|addon| SurchargeEngine::addon_line(addon, guests))
        .collect();
    let activity_lines: Vec<_> = inputs
        .activity_addons
        .iter()
        .map(|addon| SurchargeEngine::addon_line(addon, guests))
        .collect();
    let hotel_addons_total = SurchargeEngine::lines_total(&hotel_lines);
    let activity_addons_total = SurchargeEngine::lines_total(&activity_lines);

    let subtotal = room_price_total + hotel_addons_total + activity_addons_total;

    let applied_coupon = match inputs.coupon {
        Some(coupon) => {
            let discount = SurchargeEngine::evaluate_coupon(coupon, subtotal, now)
                .map_err(PricingError::InvalidCoupon)?;
            Some(AppliedCoupon {
                coupon_id: coupon.id,
                code: coupon.code.clone(),
                discount,
            })
        }
        None => None,
    };
    let discount = applied_coupon
        .as_ref()
        .map_or(Decimal::ZERO, |applied| applied.discount);
    let price_after_discount = subtotal - discount;

    let basis = TaxBasis {
        room: room_price_total,
        hotel_addons: hotel_addons_total,
        activity_addons: activity_addons_total,
        after_discount: price_after_discount,
    };
    let taxes = SurchargeEngine::apply_taxes(inputs.tax_rules, &basis);
    let tax_total = SurchargeEngine::tax_total(&taxes);

    Ok(PricedQuote {
        hotel_id: inputs.hotel_id,
        room_type_id: inputs.room_type.id,
        check_in: inputs.stay.check_in,
        check_out: inputs.stay.check_out,
        nights: inputs.stay.nights(),
        num_adults: inputs.num_adults,
        num_children: inputs.num_children,
        currency: inputs.currency.clone(),
        base_price: inputs.room_type.base_price,
        room_price_total,
        hotel_addons_total,
        activity_addons_total,
        subtotal,
        discount,
        price_after_discount,
        tax_total,
        total: price_after_discount + tax_total,
        breakdown: PriceBreakdown {
            nightly,
            hotel_addons: hotel_lines,
            activity_addons: activity_lines,
            coupon: applied_coupon,
            taxes,
        },
    })
}
