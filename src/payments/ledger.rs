use rust_decimal::Decimal;

use crate::bookings::PaymentStatus;
use crate::models::Hotel;
use crate::payments::models::{Payment, Refund};

/// One slice of a refund, bounded by what is left on a single payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundAllocation {
    pub payment_id: i32,
    pub amount: Decimal,
}

/// Money arithmetic over a booking's payments and refunds
///
/// Only `Completed` payments and refunds count towards any figure here.
pub struct Ledger;

impl Ledger {
    /// Sum of completed payments
    pub fn total_paid(payments: &[Payment]) -> Decimal {
        payments
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.amount)
            .sum()
    }

    /// Sum of completed refunds
    pub fn total_refunded(refunds: &[Refund]) -> Decimal {
        refunds
            .iter()
            .filter(|r| r.is_completed())
            .map(|r| r.amount)
            .sum()
    }

    /// Completed payments minus completed refunds
    pub fn net_paid(payments: &[Payment], refunds: &[Refund]) -> Decimal {
        Self::total_paid(payments) - Self::total_refunded(refunds)
    }

    /// Payment status implied by what has been paid against `total_due`
    ///
    /// # Returns
    /// - `Pending` when nothing has ever been paid
    /// - `FullyPaid` once net paid covers the total
    /// - `PartiallyPaid` while some money is held
    /// - `Refunded` when everything paid has been returned
    pub fn derive_payment_status(
        payments: &[Payment],
        refunds: &[Refund],
        total_due: Decimal,
    ) -> PaymentStatus {
        if !payments.iter().any(|p| p.is_completed()) {
            return PaymentStatus::Pending;
        }

        let net = Self::net_paid(payments, refunds);
        if net >= total_due {
            PaymentStatus::FullyPaid
        } else if net > Decimal::ZERO {
            PaymentStatus::PartiallyPaid
        } else {
            PaymentStatus::Refunded
        }
    }

    /// What can still be refunded against one payment
    pub fn refundable_balance(payment: &Payment, refunds: &[Refund]) -> Decimal {
        if !payment.is_completed() {
            return Decimal::ZERO;
        }
        let refunded: Decimal = refunds
            .iter()
            .filter(|r| r.payment_id == payment.id && r.is_completed())
            .map(|r| r.amount)
            .sum();
        (payment.amount - refunded).max(Decimal::ZERO)
    }

    /// Spread a refund over completed payments, oldest first
    ///
    /// Each slice is bounded by that payment's remaining balance. If the
    /// balances cannot cover `amount`, the slices cover as much as they can.
    pub fn allocate_refund(
        amount: Decimal,
        payments: &[Payment],
        refunds: &[Refund],
    ) -> Vec<RefundAllocation> {
        let mut ordered: Vec<&Payment> = payments.iter().filter(|p| p.is_completed()).collect();
        ordered.sort_by(|a, b| a.paid_at.cmp(&b.paid_at).then(a.id.cmp(&b.id)));

        let mut remaining = amount;
        let mut allocations = Vec::new();
        for payment in ordered {
            if remaining <= Decimal::ZERO {
                break;
            }
            let balance = Self::refundable_balance(payment, refunds);
            if balance <= Decimal::ZERO {
                continue;
            }
            let slice = remaining.min(balance);
            allocations.push(RefundAllocation {
                payment_id: payment.id,
                amount: slice,
            });
            remaining -= slice;
        }
        allocations
    }

    /// Currency written on ledger rows: the hotel's, else the configured default
    pub fn currency_for(hotel: Option<&Hotel>, fallback: &str) -> String {
        hotel
            .and_then(|h| h.currency.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}
