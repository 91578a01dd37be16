// Validation utilities module
// Provides checks for money amounts and codes that the validator derive cannot express

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Largest number of decimal places a stored money amount may carry
pub const MONEY_SCALE: u32 = 2;

fn coupon_code_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9_-]{3,32}$").ok())
        .as_ref()
}

/// Upper-case and check a coupon code, returning the stored form
pub fn normalize_coupon_code(code: &str) -> Result<String, String> {
    let normalized = code.trim().to_uppercase();
    if coupon_code_regex().is_some_and(|re| re.is_match(&normalized)) {
        Ok(normalized)
    } else {
        Err(format!(
            "Coupon code '{}' must be 3-32 characters of A-Z, 0-9, '_' or '-'",
            code
        ))
    }
}

/// Validates that a money amount is strictly positive with at most two decimals
pub fn validate_positive_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err(format!("{} must be greater than zero", field));
    }
    validate_scale(field, amount)
}

/// Validates that a money amount is zero or positive with at most two decimals
pub fn validate_non_negative_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} must not be negative", field));
    }
    validate_scale(field, amount)
}

/// Validates that a percentage lies within 0..=100
pub fn validate_percentage(field: &str, value: Decimal) -> Result<(), String> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        Err(format!("{} must be between 0 and 100", field))
    } else {
        Ok(())
    }
}

fn validate_scale(field: &str, amount: Decimal) -> Result<(), String> {
    if amount.normalize().scale() > MONEY_SCALE {
        Err(format!("{} must have at most {} decimal places", field, MONEY_SCALE))
    } else {
        Ok(())
    }
}
