use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::pricing::models::CancellationPolicy;
use crate::pricing::surcharge::round_money;

/// Hours between `now` and check-in, negative once check-in has passed
///
/// Check-in is taken as midnight UTC at the start of the arrival date.
pub fn hours_before_check_in(check_in: NaiveDate, now: DateTime<Utc>) -> f64 {
    let arrival = Utc.from_utc_datetime(&check_in.and_time(NaiveTime::MIN));
    (arrival - now).num_seconds() as f64 / 3600.0
}

/// The most generous active policy whose window has been reached
///
/// Policies are ranked by threshold (largest first), then priority, then id;
/// the first one with a threshold at or below `hours_before` applies.
pub fn select_policy(policies: &[CancellationPolicy], hours_before: f64) -> Option<&CancellationPolicy> {
    let mut ranked: Vec<&CancellationPolicy> = policies.iter().filter(|p| p.is_active).collect();
    ranked.sort_by(|a, b| {
        b.hours_before_check_in
            .cmp(&a.hours_before_check_in)
            .then(b.priority.cmp(&a.priority))
            .then(a.id.cmp(&b.id))
    });
    ranked
        .into_iter()
        .find(|p| f64::from(p.hours_before_check_in) <= hours_before)
}

/// Refund owed under a policy, never more than what is still refundable
pub fn refund_amount(total_paid: Decimal, refund_percentage: Decimal, refundable: Decimal) -> Decimal {
    let owed = round_money(total_paid * refund_percentage / Decimal::ONE_HUNDRED);
    owed.min(refundable).max(Decimal::ZERO)
}

/// Reason recorded on refunds created by a cancellation
pub fn policy_reason(refund_percentage: Decimal, hours_before: f64) -> String {
    format!(
        "Policy: {}% refund ({:.1}h before check-in)",
        refund_percentage.normalize(),
        hours_before
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy(id: i32, hours: i32, pct: Decimal, priority: i32) -> CancellationPolicy {
        CancellationPolicy {
            id,
            hotel_id: 1,
            name: format!("{}h", hours),
            hours_before_check_in: hours,
            refund_percentage: pct,
            priority,
            is_active: true,
        }
    }

    #[test]
    fn test_hours_measured_to_midnight_of_check_in_date() {
        let check_in = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();

        assert_eq!(hours_before_check_in(check_in, now), 120.0);

        let later = Utc.with_ymd_and_hms(2025, 5, 10, 6, 0, 0).unwrap();
        assert_eq!(hours_before_check_in(check_in, later), -6.0);
    }

    #[test]
    fn test_afternoon_check_in_time_does_not_extend_window() {
        // 42h before midnight of the 10th, though 56h before a 14:00 arrival
        let check_in = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 7, 8, 6, 0, 0).unwrap();
        let hours = hours_before_check_in(check_in, now);

        assert_eq!(hours, 42.0);
        let policies = vec![policy(1, 48, dec!(100), 0)];
        assert!(select_policy(&policies, hours).is_none());
    }

    #[test]
    fn test_selects_most_generous_reached_window() {
        let policies = vec![
            policy(1, 0, dec!(0), 0),
            policy(2, 48, dec!(100), 0),
            policy(3, 24, dec!(50), 0),
        ];

        assert_eq!(select_policy(&policies, 120.0).map(|p| p.id), Some(2));
        assert_eq!(select_policy(&policies, 30.0).map(|p| p.id), Some(3));
        assert_eq!(select_policy(&policies, 48.0).map(|p| p.id), Some(2));
        assert_eq!(select_policy(&policies, 2.5).map(|p| p.id), Some(1));
    }

    #[test]
    fn test_no_policy_when_window_not_reached() {
        let policies = vec![policy(1, 24, dec!(50), 0)];
        assert!(select_policy(&policies, 10.0).is_none());
        assert!(select_policy(&policies, -3.0).is_none());
        assert!(select_policy(&[], 500.0).is_none());
    }

    #[test]
    fn test_inactive_policies_are_ignored() {
        let mut generous = policy(1, 48, dec!(100), 0);
        generous.is_active = false;
        let policies = vec![generous, policy(2, 24, dec!(25), 0)];
        assert_eq!(select_policy(&policies, 100.0).map(|p| p.id), Some(2));
    }

    #[test]
    fn test_ties_break_on_priority_then_id() {
        let policies = vec![
            policy(5, 48, dec!(80), 1),
            policy(4, 48, dec!(90), 1),
            policy(3, 48, dec!(70), 0),
        ];
        assert_eq!(select_policy(&policies, 72.0).map(|p| p.id), Some(4));
    }

    #[test]
    fn test_refund_amount_is_rounded_and_capped() {
        assert_eq!(refund_amount(dec!(200), dec!(100), dec!(200)), dec!(200));
        assert_eq!(refund_amount(dec!(99.99), dec!(50), dec!(99.99)), dec!(50.00));
        assert_eq!(refund_amount(dec!(200), dec!(100), dec!(120)), dec!(120));
        assert_eq!(refund_amount(dec!(200), dec!(0), dec!(200)), Decimal::ZERO);
    }

    #[test]
    fn test_policy_reason_format() {
        assert_eq!(
            policy_reason(dec!(100.00), 120.0),
            "Policy: 100% refund (120.0h before check-in)"
        );
        assert_eq!(
            policy_reason(dec!(12.5), 30.26),
            "Policy: 12.5% refund (30.3h before check-in)"
        );
    }
}
