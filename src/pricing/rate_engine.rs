use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::Stay;
use crate::pricing::models::{DynamicPricingRule, NightlyRate};

/// Resolves the price of each night of a stay from a base price and override rules
pub struct RateEngine;

impl RateEngine {
    /// Resolve the price of a single night
    ///
    /// Among active rules whose window contains the night, the highest
    /// priority wins; equal priorities fall back to the lowest rule id.
    /// With no matching rule the base price applies.
    pub fn resolve_night(
        base_price: Decimal,
        rules: &[DynamicPricingRule],
        date: NaiveDate,
    ) -> NightlyRate {
        let winner = rules
            .iter()
            .filter(|rule| rule.is_active && rule.covers(date))
            .min_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

        match winner {
            Some(rule) => NightlyRate {
                date,
                price: rule.price,
                applied_rule: Some(rule.label()),
                rule_id: Some(rule.id),
            },
            None => NightlyRate {
                date,
                price: base_price,
                applied_rule: None,
                rule_id: None,
            },
        }
    }

    /// Price every night of the stay, in date order
    pub fn price_stay(
        base_price: Decimal,
        rules: &[DynamicPricingRule],
        stay: &Stay,
    ) -> Vec<NightlyRate> {
        stay.dates()
            .map(|date| Self::resolve_night(base_price, rules, date))
            .collect()
    }

    /// Sum of the nightly prices
    pub fn room_total(nights: &[NightlyRate]) -> Decimal {
        nights.iter().map(|night| night.price).sum()
    }
}
