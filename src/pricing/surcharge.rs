use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Addon;
use crate::pricing::error::CouponRejection;
use crate::pricing::models::{AddonLine, AdjustmentType, Coupon, TaxApplicability, TaxLine, TaxRule};

/// Round a derived money amount to cents
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    round_money(amount * percentage / Decimal::ONE_HUNDRED)
}

/// Amounts each tax rule can be levied on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBasis {
    pub room: Decimal,
    pub hotel_addons: Decimal,
    pub activity_addons: Decimal,
    pub after_discount: Decimal,
}

impl TaxBasis {
    pub fn amount_for(&self, applicable_on: TaxApplicability) -> Decimal {
        match applicable_on {
            TaxApplicability::Room => self.room,
            TaxApplicability::HotelAddOn => self.hotel_addons,
            TaxApplicability::ActivityAddOn => self.activity_addons,
            TaxApplicability::Total => self.after_discount,
        }
    }
}

/// Applies addon charges, coupon discounts and taxes on top of the room total
pub struct SurchargeEngine;

impl SurchargeEngine {
    /// Charge line for an addon; per-guest addons are multiplied by the party size.
    /// Addons are charged once for the whole stay.
    pub fn addon_line(addon: &Addon, guests: i32) -> AddonLine {
        let quantity = if addon.per_guest { guests.max(1) } else { 1 };
        AddonLine {
            addon_id: addon.id,
            name: addon.name.clone(),
            quantity,
            unit_price: addon.base_price,
            total: addon.base_price * Decimal::from(quantity),
        }
    }

    pub fn lines_total(lines: &[AddonLine]) -> Decimal {
        lines.iter().map(|line| line.total).sum()
    }

    /// Check a coupon against the subtotal and return the discount it grants
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// active flag, validity window, usage limit, minimum spend.
    pub fn evaluate_coupon(
        coupon: &Coupon,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, CouponRejection> {
        if !coupon.is_active {
            return Err(CouponRejection::Inactive);
        }
        if now < coupon.start_date || now >= coupon.end_date {
            return Err(CouponRejection::OutsideValidity);
        }
        if !coupon.has_remaining_uses() {
            return Err(CouponRejection::UsageExhausted);
        }
        if let Some(minimum) = coupon.minimum_spend {
            if subtotal < minimum {
                return Err(CouponRejection::MinimumSpendNotMet);
            }
        }

        let discount = match coupon.discount_type {
            AdjustmentType::Percentage => {
                let raw = percent_of(subtotal, coupon.discount_value);
                // A zero cap means uncapped
                match coupon.max_discount_amount {
                    Some(cap) if cap > Decimal::ZERO => raw.min(cap),
                    _ => raw,
                }
            }
            AdjustmentType::Fixed => coupon.discount_value,
        };

        Ok(discount.min(subtotal).max(Decimal::ZERO))
    }

    /// Tax lines for every rule whose basis is positive, in rule order
    pub fn apply_taxes(rules: &[TaxRule], basis: &TaxBasis) -> Vec<TaxLine> {
        rules
            .iter()
            .filter_map(|rule| {
                let base = basis.amount_for(rule.applicable_on);
                if base <= Decimal::ZERO {
                    return None;
                }
                let amount = match rule.tax_type {
                    AdjustmentType::Percentage => percent_of(base, rule.tax_value),
                    AdjustmentType::Fixed => rule.tax_value,
                };
                Some(TaxLine {
                    tax_rule_id: rule.id,
                    name: rule.name.clone(),
                    applicable_on: rule.applicable_on,
                    amount,
                })
            })
            .collect()
    }

    pub fn tax_total(lines: &[TaxLine]) -> Decimal {
        lines.iter().map(|line| line.amount).sum()
    }
}
