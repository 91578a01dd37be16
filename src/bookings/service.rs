use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use validator::Validate;

use crate::availability::allocate;
use crate::bookings::cancellation::{hours_before_check_in, policy_reason, refund_amount, select_policy};
use crate::bookings::{
    Booking, BookingDetails, BookingError, BookingStatus, CancelBookingRequest,
    CancellationOutcome, CreateBookingRequest, NewBooking, StatusMachine,
};
use crate::events::{DomainEvent, EventPublisher};
use crate::models::AddonKind;
use crate::payments::{Ledger, NewLedgerEntry, NewRefund, SettlementStatus};
use crate::pricing::{CouponRejection, PricingError, PricingService};
use crate::store::Store;

/// Recorded on the booking when the caller gives no reason
pub const DEFAULT_CANCELLATION_REASON: &str = "User requested cancellation";

/// Drives a booking from creation to cancellation or completion
pub struct BookingService {
    store: Arc<dyn Store>,
    pricing: Arc<PricingService>,
    events: EventPublisher,
    default_currency: String,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn Store>,
        pricing: Arc<PricingService>,
        events: EventPublisher,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pricing,
            events,
            default_currency: default_currency.into(),
        }
    }

    pub async fn create(&self, request: CreateBookingRequest, actor: i32) -> Result<Booking, BookingError> {
        self.create_at(request, actor, Utc::now()).await
    }

    /// Price, allocate and persist a booking in one unit of work
    ///
    /// The quote is computed first so that pricing problems fail before any
    /// inventory is touched. Allocation, the booking row, coupon usage, addon
    /// lines and night links then commit together or not at all.
    pub async fn create_at(
        &self,
        request: CreateBookingRequest,
        actor: i32,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        request.validate()?;
        let quote = self.pricing.quote_at(&request.stay, now).await?;
        let stay = quote.stay();

        let mut tx = self.store.begin().await?;
        let room = allocate(tx.as_mut(), quote.hotel_id, quote.room_type_id, &stay).await?;

        let new_booking = NewBooking::from_quote(&quote, room.id, &request, actor);
        let booking = tx.insert_booking(&new_booking).await?;

        if let Some(coupon) = &quote.breakdown.coupon {
            // Conditional increment; losing the last use to another booking aborts this one
            if !tx.increment_coupon_usage(coupon.coupon_id).await? {
                return Err(PricingError::InvalidCoupon(CouponRejection::UsageExhausted).into());
            }
            tx.insert_booking_coupon(booking.id, coupon.coupon_id, coupon.discount)
                .await?;
        }

        if !quote.breakdown.hotel_addons.is_empty() {
            tx.insert_booking_addons(AddonKind::Hotel, booking.id, &quote.breakdown.hotel_addons)
                .await?;
        }
        if !quote.breakdown.activity_addons.is_empty() {
            tx.insert_booking_addons(
                AddonKind::Activity,
                booking.id,
                &quote.breakdown.activity_addons,
            )
            .await?;
        }

        let linked = tx.link_availability(room.id, &stay, booking.id).await?;
        tx.commit().await?;

        info!(
            "Created booking {} in room {} for {} to {} ({} nights linked, total {})",
            booking.id, room.room_number, stay.check_in, stay.check_out, linked, booking.total_price
        );
        self.events.publish(DomainEvent::BookingCreated {
            booking: booking.clone(),
            actor,
        });
        Ok(booking)
    }

    /// Booking with its payments, refunds and ledger rows
    pub async fn get(&self, id: i32) -> Result<BookingDetails, BookingError> {
        let mut tx = self.store.begin().await?;
        let booking = tx.booking(id).await?.ok_or(BookingError::NotFound(id))?;
        let payments = tx.payments_for_booking(id).await?;
        let refunds = tx.refunds_for_booking(id).await?;
        let ledger = tx.ledger_for_booking(id).await?;

        Ok(BookingDetails {
            booking,
            payments,
            refunds,
            ledger,
        })
    }

    pub async fn cancel(
        &self,
        id: i32,
        request: CancelBookingRequest,
        actor: i32,
    ) -> Result<CancellationOutcome, BookingError> {
        self.cancel_at(id, request, actor, Utc::now()).await
    }

    /// Cancel a booking, release its nights and refund per policy
    ///
    /// The refund is a percentage of everything paid, chosen by how far ahead
    /// of check-in the cancellation happens. It is spread over the booking's
    /// payments oldest first.
    pub async fn cancel_at(
        &self,
        id: i32,
        request: CancelBookingRequest,
        actor: i32,
        now: DateTime<Utc>,
    ) -> Result<CancellationOutcome, BookingError> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let before = tx.lock_booking(id).await?.ok_or(BookingError::NotFound(id))?;
        StatusMachine::transition(before.status, BookingStatus::Cancelled)
            .map_err(BookingError::InvalidTransition)?;

        let payments = tx.payments_for_booking(id).await?;
        let prior_refunds = tx.refunds_for_booking(id).await?;
        let total_paid = Ledger::total_paid(&payments);
        let hotel = tx.hotel(before.hotel_id).await?;

        let mut refund_total = Decimal::ZERO;
        let mut policy_id = None;
        let mut reason = None;
        if total_paid > Decimal::ZERO {
            let hours = hours_before_check_in(before.check_in, now);
            let policies = tx.cancellation_policies(before.hotel_id).await?;

            match select_policy(&policies, hours) {
                Some(policy) => {
                    let refundable = Ledger::net_paid(&payments, &prior_refunds);
                    refund_total = refund_amount(total_paid, policy.refund_percentage, refundable);
                    policy_id = Some(policy.id);
                    reason = Some(policy_reason(policy.refund_percentage, hours));
                }
                None => debug!(
                    "No cancellation policy reached for booking {} at {:.1}h before check-in",
                    id, hours
                ),
            }
        }

        let status_reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_CANCELLATION_REASON);
        let mut after = tx
            .update_booking_status(id, BookingStatus::Cancelled, Some(status_reason), now)
            .await?;
        let released = tx.release_availability(id).await?;

        let mut refunds = Vec::new();
        if refund_total > Decimal::ZERO {
            let currency = Ledger::currency_for(hotel.as_ref(), &self.default_currency);
            let reason = reason.unwrap_or_default();

            for allocation in Ledger::allocate_refund(refund_total, &payments, &prior_refunds) {
                let refund = tx
                    .insert_refund(&NewRefund {
                        payment_id: allocation.payment_id,
                        booking_id: id,
                        amount: allocation.amount,
                        status: SettlementStatus::Completed,
                        reason: reason.clone(),
                        recorded_by: actor,
                    })
                    .await?;
                tx.insert_ledger_entry(&NewLedgerEntry::for_refund(&refund, before.hotel_id, &currency))
                    .await?;
                refunds.push(refund);
            }

            let all_refunds: Vec<_> = prior_refunds.iter().chain(refunds.iter()).cloned().collect();
            let payment_status = Ledger::derive_payment_status(&payments, &all_refunds, before.total_price);
            after = tx.update_booking_payment_status(id, payment_status).await?;
        }

        tx.commit().await?;

        info!(
            "Cancelled booking {} ({} nights released, refund {})",
            id, released, refund_total
        );
        self.events.publish(DomainEvent::BookingCancelled {
            before,
            after: after.clone(),
            refund_amount: refund_total,
            actor,
        });

        Ok(CancellationOutcome {
            booking: after,
            refund_amount: refund_total,
            refunds,
            policy_id,
        })
    }

    pub async fn complete(&self, id: i32, actor: i32) -> Result<Booking, BookingError> {
        self.complete_at(id, actor, Utc::now()).await
    }

    /// Mark a confirmed stay as completed
    pub async fn complete_at(&self, id: i32, actor: i32, now: DateTime<Utc>) -> Result<Booking, BookingError> {
        let mut tx = self.store.begin().await?;
        let before = tx.lock_booking(id).await?.ok_or(BookingError::NotFound(id))?;
        let status = StatusMachine::transition(before.status, BookingStatus::Completed)
            .map_err(BookingError::InvalidTransition)?;

        let after = tx.update_booking_status(id, status, None, now).await?;
        tx.commit().await?;

        info!("Completed booking {}", id);
        self.events.publish(DomainEvent::BookingCompleted {
            before,
            after: after.clone(),
            actor,
        });
        Ok(after)
    }
}
