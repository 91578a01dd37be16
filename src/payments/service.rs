use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::bookings::{Booking, BookingStatus, PaymentStatus, StatusMachine};
use crate::events::{DomainEvent, EventPublisher};
use crate::payments::{
    Ledger, NewLedgerEntry, NewPayment, NewRefund, Payment, PaymentError, RecordPaymentRequest,
    RecordRefundRequest, Refund, SettlementStatus,
};
use crate::store::{Store, StoreTx};
use crate::validation::validate_positive_amount;

/// Records money movements against bookings and keeps payment status in step
pub struct PaymentService {
    store: Arc<dyn Store>,
    events: EventPublisher,
    default_currency: String,
}

impl PaymentService {
    pub fn new(store: Arc<dyn Store>, events: EventPublisher, default_currency: impl Into<String>) -> Self {
        Self {
            store,
            events,
            default_currency: default_currency.into(),
        }
    }

    /// Record a settled payment and its ledger row
    ///
    /// A payment that covers the total confirms a pending booking.
    pub async fn record_payment(
        &self,
        request: RecordPaymentRequest,
        actor: i32,
    ) -> Result<Payment, PaymentError> {
        request.validate()?;
        validate_positive_amount("amount", request.amount).map_err(PaymentError::Validation)?;

        let mut tx = self.store.begin().await?;
        let booking = tx
            .lock_booking(request.booking_id)
            .await?
            .ok_or(PaymentError::BookingNotFound(request.booking_id))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(PaymentError::BookingCancelled(booking.id));
        }

        let payment = tx
            .insert_payment(&NewPayment {
                booking_id: booking.id,
                amount: request.amount,
                payment_mode: request.payment_mode,
                status: SettlementStatus::Completed,
                reference: request.reference.clone(),
                recorded_by: actor,
            })
            .await?;

        let currency = self.ledger_currency(tx.as_mut(), booking.hotel_id).await?;
        tx.insert_ledger_entry(&NewLedgerEntry::for_payment(&payment, booking.hotel_id, &currency))
            .await?;

        let booking = self.reconcile(tx.as_mut(), booking).await?;
        tx.commit().await?;

        info!(
            "Recorded payment {} of {} {} for booking {} (now {})",
            payment.id, payment.amount, currency, booking.id, booking.payment_status
        );
        self.events.publish(DomainEvent::PaymentRecorded {
            payment: payment.clone(),
            actor,
        });
        Ok(payment)
    }

    /// Refund part or all of one payment
    ///
    /// The amount may not exceed what is left on that payment after earlier
    /// refunds. The balance is read after the booking row is locked.
    pub async fn record_refund(
        &self,
        request: RecordRefundRequest,
        actor: i32,
    ) -> Result<Refund, PaymentError> {
        request.validate()?;
        validate_positive_amount("amount", request.amount).map_err(PaymentError::Validation)?;

        let mut tx = self.store.begin().await?;
        let payment = tx
            .payment(request.payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound(request.payment_id))?;
        if !payment.is_completed() {
            return Err(PaymentError::PaymentNotSettled(payment.id));
        }

        let booking = tx
            .lock_booking(payment.booking_id)
            .await?
            .ok_or(PaymentError::BookingNotFound(payment.booking_id))?;

        let refunds = tx.refunds_for_booking(booking.id).await?;
        let available = Ledger::refundable_balance(&payment, &refunds);
        if request.amount > available {
            return Err(PaymentError::RefundExceedsBalance {
                requested: request.amount,
                available,
            });
        }

        let refund = tx
            .insert_refund(&NewRefund {
                payment_id: payment.id,
                booking_id: booking.id,
                amount: request.amount,
                status: SettlementStatus::Completed,
                reason: request.reason.trim().to_string(),
                recorded_by: actor,
            })
            .await?;

        let currency = self.ledger_currency(tx.as_mut(), booking.hotel_id).await?;
        tx.insert_ledger_entry(&NewLedgerEntry::for_refund(&refund, booking.hotel_id, &currency))
            .await?;

        let booking = self.reconcile(tx.as_mut(), booking).await?;
        tx.commit().await?;

        info!(
            "Recorded refund {} of {} against payment {} (booking {} now {})",
            refund.id, refund.amount, payment.id, booking.id, booking.payment_status
        );
        self.events.publish(DomainEvent::RefundRecorded {
            refund: refund.clone(),
            actor,
        });
        Ok(refund)
    }

    /// Payments newest first, optionally for one booking
    pub async fn list_payments(&self, booking_id: Option<i32>) -> Result<Vec<Payment>, PaymentError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_payments(booking_id).await?)
    }

    async fn ledger_currency(&self, tx: &mut dyn StoreTx, hotel_id: i32) -> Result<String, PaymentError> {
        let hotel = tx.hotel(hotel_id).await?;
        Ok(Ledger::currency_for(hotel.as_ref(), &self.default_currency))
    }

    /// Recompute payment status from the ledger and confirm once fully paid
    async fn reconcile(&self, tx: &mut dyn StoreTx, booking: Booking) -> Result<Booking, PaymentError> {
        let payments = tx.payments_for_booking(booking.id).await?;
        let refunds = tx.refunds_for_booking(booking.id).await?;
        let status = Ledger::derive_payment_status(&payments, &refunds, booking.total_price);

        let mut booking = booking;
        if status != booking.payment_status {
            booking = tx.update_booking_payment_status(booking.id, status).await?;
        }

        if status == PaymentStatus::FullyPaid {
            if let Ok(confirmed) = StatusMachine::transition(booking.status, BookingStatus::Confirmed) {
                booking = tx
                    .update_booking_status(booking.id, confirmed, Some("Fully paid"), Utc::now())
                    .await?;
                info!("Booking {} confirmed on full payment", booking.id);
            }
        }
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stay;
    use crate::payments::PaymentMode;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: PaymentService,
        booking_id: i32,
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    /// One pending booking of 200 in a hotel without its own currency
    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let booking_id = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                let room = s.add_room(hotel, rt);
                let stay = Stay::new(date(10), date(12)).unwrap();
                s.add_booking(hotel, rt, room, stay, dec!(200))
            })
            .await;

        let (publisher, _rx) = EventPublisher::channel();
        Fixture {
            service: PaymentService::new(store.clone(), publisher, "USD"),
            store,
            booking_id,
        }
    }

    fn pay(booking_id: i32, amount: Decimal) -> RecordPaymentRequest {
        RecordPaymentRequest {
            booking_id,
            amount,
            payment_mode: PaymentMode::Card,
            reference: None,
        }
    }

    fn refund(payment_id: i32, amount: Decimal) -> RecordRefundRequest {
        RecordRefundRequest {
            payment_id,
            amount,
            reason: "Guest complaint".to_string(),
        }
    }

    #[tokio::test]
    async fn test_payment_writes_positive_ledger_row_in_default_currency() {
        let f = fixture().await;
        let payment = f.service.record_payment(pay(f.booking_id, dec!(50)), 3).await.unwrap();

        let state = f.store.snapshot().await;
        assert_eq!(state.ledger.len(), 1);
        assert_eq!(state.ledger[0].amount, dec!(50));
        assert_eq!(state.ledger[0].reference_id, payment.id);
        assert_eq!(state.ledger[0].currency, "USD");
        assert_eq!(state.bookings[0].payment_status, PaymentStatus::PartiallyPaid);
        assert_eq!(state.bookings[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_non_positive_amounts_rejected() {
        let f = fixture().await;
        for amount in [dec!(0), dec!(-5)] {
            let err = f.service.record_payment(pay(f.booking_id, amount), 1).await.unwrap_err();
            assert!(matches!(err, PaymentError::Validation(_)));
        }
        assert!(f.store.snapshot().await.payments.is_empty());
    }

    #[tokio::test]
    async fn test_payment_on_unknown_or_cancelled_booking() {
        let f = fixture().await;
        let err = f.service.record_payment(pay(999, dec!(10)), 1).await.unwrap_err();
        assert!(matches!(err, PaymentError::BookingNotFound(999)));

        let id = f.booking_id;
        f.store
            .seed(|s| {
                if let Some(b) = s.bookings.iter_mut().find(|b| b.id == id) {
                    b.status = BookingStatus::Cancelled;
                }
            })
            .await;
        let err = f.service.record_payment(pay(id, dec!(10)), 1).await.unwrap_err();
        assert!(matches!(err, PaymentError::BookingCancelled(_)));
    }

    #[tokio::test]
    async fn test_refund_updates_status_and_ledger() {
        let f = fixture().await;
        let payment = f.service.record_payment(pay(f.booking_id, dec!(200)), 1).await.unwrap();

        let refund = f.service.record_refund(refund(payment.id, dec!(80)), 1).await.unwrap();
        assert_eq!(refund.amount, dec!(80));

        let state = f.store.snapshot().await;
        let amounts: Vec<Decimal> = state.ledger.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(200), dec!(-80)]);
        assert_eq!(state.bookings[0].payment_status, PaymentStatus::PartiallyPaid);
        // Confirmation is not undone by a refund
        assert_eq!(state.bookings[0].status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_refunds_accumulate_against_the_balance() {
        let f = fixture().await;
        let payment = f.service.record_payment(pay(f.booking_id, dec!(100)), 1).await.unwrap();

        f.service.record_refund(refund(payment.id, dec!(60)), 1).await.unwrap();
        let err = f
            .service
            .record_refund(refund(payment.id, dec!(40.01)), 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::RefundExceedsBalance { available, .. } if available == dec!(40)
        ));

        f.service.record_refund(refund(payment.id, dec!(40)), 1).await.unwrap();
        let state = f.store.snapshot().await;
        assert_eq!(state.bookings[0].payment_status, PaymentStatus::Refunded);
    }

    #[tokio::test]
    async fn test_refund_of_unknown_or_unsettled_payment() {
        let f = fixture().await;
        let err = f.service.record_refund(refund(77, dec!(1)), 1).await.unwrap_err();
        assert!(matches!(err, PaymentError::PaymentNotFound(77)));

        let payment = f.service.record_payment(pay(f.booking_id, dec!(20)), 1).await.unwrap();
        f.store
            .seed(|s| {
                if let Some(p) = s.payments.iter_mut().find(|p| p.id == payment.id) {
                    p.status = SettlementStatus::Failed;
                }
            })
            .await;
        let err = f.service.record_refund(refund(payment.id, dec!(1)), 1).await.unwrap_err();
        assert!(matches!(err, PaymentError::PaymentNotSettled(_)));
    }

    #[tokio::test]
    async fn test_list_payments_filters_by_booking() {
        let f = fixture().await;
        f.service.record_payment(pay(f.booking_id, dec!(10)), 1).await.unwrap();
        f.service.record_payment(pay(f.booking_id, dec!(20)), 1).await.unwrap();

        let all = f.service.list_payments(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].amount, dec!(20));

        assert!(f.service.list_payments(Some(999)).await.unwrap().is_empty());
    }
}
