// In-memory store for tests
//
// A unit of work holds the store lock for its whole lifetime and edits a
// private copy of the state; `commit` swaps the copy in, dropping discards it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::bookings::{BookedBy, Booking, BookingStatus, NewBooking, PaymentStatus};
use crate::models::{Addon, AddonKind, Hotel, Room, RoomNight, RoomStatus, RoomType, Stay};
use crate::payments::{LedgerEntry, NewLedgerEntry, NewPayment, NewRefund, Payment, Refund};
use crate::pricing::models::{
    AddonLine, CancellationPolicy, Coupon, CreateCancellationPolicyRequest,
    CreateCouponRequest, CreateDynamicPricingRequest, CreateTaxRuleRequest, DynamicPricingRule,
    PricingEntityType, TaxRule,
};
use crate::store::{Store, StoreError, StoreTx};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    next_id: i32,
    pub hotels: Vec<Hotel>,
    pub room_types: Vec<RoomType>,
    pub rooms: Vec<Room>,
    pub addons: HashMap<AddonKind, Vec<Addon>>,
    pub room_nights: Vec<RoomNight>,
    pub rules: Vec<DynamicPricingRule>,
    pub tax_rules: Vec<TaxRule>,
    pub coupons: Vec<Coupon>,
    pub booking_coupons: Vec<(i32, i32, Decimal)>,
    pub booking_addons: Vec<(AddonKind, i32, AddonLine)>,
    pub policies: Vec<CancellationPolicy>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
    pub refunds: Vec<Refund>,
    pub ledger: Vec<LedgerEntry>,
}

impl MemoryState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_hotel(&mut self, currency: Option<&str>) -> i32 {
        let id = self.next_id();
        self.hotels.push(Hotel {
            id,
            name: format!("Hotel {}", id),
            currency: currency.map(str::to_string),
            timezone: "UTC".to_string(),
            check_in_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            check_out_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        });
        id
    }

    pub fn add_room_type(&mut self, hotel_id: i32, base_price: Decimal, max_adults: i32, max_children: i32) -> i32 {
        let id = self.next_id();
        self.room_types.push(RoomType {
            id,
            hotel_id,
            name: format!("Room type {}", id),
            max_adults,
            max_children,
            base_price,
            is_active: true,
        });
        id
    }

    pub fn add_room(&mut self, hotel_id: i32, room_type_id: i32) -> i32 {
        let id = self.next_id();
        self.rooms.push(Room {
            id,
            hotel_id,
            room_type_id,
            room_number: format!("{}", 100 + id),
            status: RoomStatus::Available,
            is_active: true,
        });
        id
    }

    pub fn add_addon(&mut self, kind: AddonKind, hotel_id: Option<i32>, base_price: Decimal, per_guest: bool) -> i32 {
        let id = self.next_id();
        self.addons.entry(kind).or_default().push(Addon {
            id,
            hotel_id,
            name: format!("Addon {}", id),
            base_price,
            per_guest,
            is_active: true,
        });
        id
    }

    pub fn add_rule(&mut self, room_type_id: i32, start: NaiveDate, end: NaiveDate, price: Decimal, priority: i32) -> i32 {
        let id = self.next_id();
        self.rules.push(DynamicPricingRule {
            id,
            entity_type: PricingEntityType::RoomType,
            entity_id: room_type_id,
            start_date: start,
            end_date: end,
            price,
            priority,
            is_active: true,
            notes: None,
            created_at: Utc::now(),
        });
        id
    }

    pub fn add_coupon(&mut self, mut coupon: Coupon) -> i32 {
        let id = self.next_id();
        coupon.id = id;
        self.coupons.push(coupon);
        id
    }

    pub fn add_tax_rule(&mut self, mut rule: TaxRule) -> i32 {
        let id = self.next_id();
        rule.id = id;
        self.tax_rules.push(rule);
        id
    }

    pub fn add_policy(&mut self, hotel_id: i32, hours_before_check_in: i32, refund_percentage: Decimal) -> i32 {
        let id = self.next_id();
        self.policies.push(CancellationPolicy {
            id,
            hotel_id,
            name: format!("{}h policy", hours_before_check_in),
            hours_before_check_in,
            refund_percentage,
            priority: 0,
            is_active: true,
        });
        id
    }

    /// A pending booking with a flat price; no nights are claimed
    pub fn add_booking(
        &mut self,
        hotel_id: i32,
        room_type_id: i32,
        room_id: i32,
        stay: Stay,
        total_price: Decimal,
    ) -> i32 {
        let id = self.next_id();
        let now = Utc::now();
        self.bookings.push(Booking {
            id,
            hotel_id,
            room_type_id,
            room_id,
            check_in: stay.check_in,
            check_out: stay.check_out,
            num_adults: 1,
            num_children: 0,
            guest_name: "Seeded Guest".to_string(),
            guest_email: "guest@example.com".to_string(),
            guest_phone: None,
            booked_by: BookedBy::Receptionist,
            created_by: 1,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            base_price: total_price,
            room_price_total: total_price,
            hotel_addons_total: Decimal::ZERO,
            activity_addons_total: Decimal::ZERO,
            subtotal: total_price,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_price,
            price_breakdown: sqlx::types::Json(Default::default()),
            status_reason: None,
            status_changed_at: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    fn booking_mut(&mut self, id: i32) -> Result<&mut Booking, StoreError> {
        self.bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }
}

/// Store holding all state behind a single async mutex
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply seed data directly, outside any unit of work
    pub async fn seed<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut MemoryState) -> T,
    {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryStoreTx { guard, working }))
    }
}

pub struct MemoryStoreTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

fn sorted_by_id<T: Clone, F: Fn(&T) -> i32>(items: impl Iterator<Item = T>, key: F) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl StoreTx for MemoryStoreTx {
    async fn hotel(&mut self, id: i32) -> Result<Option<Hotel>, StoreError> {
        Ok(self.working.hotels.iter().find(|h| h.id == id).cloned())
    }

    async fn room_type(&mut self, id: i32) -> Result<Option<RoomType>, StoreError> {
        Ok(self.working.room_types.iter().find(|rt| rt.id == id).cloned())
    }

    async fn room_types_for_hotel(&mut self, hotel_id: i32) -> Result<Vec<RoomType>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .room_types
                .iter()
                .filter(|rt| rt.hotel_id == hotel_id && rt.is_active)
                .cloned(),
            |rt| rt.id,
        ))
    }

    async fn sellable_rooms(
        &mut self,
        hotel_id: i32,
        room_type_id: Option<i32>,
    ) -> Result<Vec<Room>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .rooms
                .iter()
                .filter(|r| r.hotel_id == hotel_id && r.is_sellable())
                .filter(|r| room_type_id.map_or(true, |id| r.room_type_id == id))
                .cloned(),
            |r| r.id,
        ))
    }

    async fn addons(&mut self, kind: AddonKind, ids: &[i32]) -> Result<Vec<Addon>, StoreError> {
        let catalogue = self.working.addons.get(&kind).cloned().unwrap_or_default();
        Ok(sorted_by_id(
            catalogue.into_iter().filter(|a| ids.contains(&a.id)),
            |a| a.id,
        ))
    }

    async fn booked_room_ids(
        &mut self,
        room_ids: &[i32],
        stay: &Stay,
    ) -> Result<Vec<i32>, StoreError> {
        let mut ids: Vec<i32> = self
            .working
            .room_nights
            .iter()
            .filter(|n| n.is_booked && room_ids.contains(&n.room_id) && stay.contains(n.date))
            .map(|n| n.room_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn room_nights(&mut self, room_id: i32, stay: &Stay) -> Result<Vec<RoomNight>, StoreError> {
        let mut nights: Vec<RoomNight> = self
            .working
            .room_nights
            .iter()
            .filter(|n| n.room_id == room_id && stay.contains(n.date))
            .cloned()
            .collect();
        nights.sort_by_key(|n| n.date);
        Ok(nights)
    }

    async fn claim_night(&mut self, room_id: i32, date: NaiveDate) -> Result<bool, StoreError> {
        if let Some(night) = self
            .working
            .room_nights
            .iter_mut()
            .find(|n| n.room_id == room_id && n.date == date)
        {
            if night.is_booked {
                return Ok(false);
            }
            night.is_booked = true;
            return Ok(true);
        }
        let id = self.working.next_id();
        self.working.room_nights.push(RoomNight {
            id,
            room_id,
            date,
            is_booked: true,
            booking_id: None,
        });
        Ok(true)
    }

    async fn link_availability(
        &mut self,
        room_id: i32,
        stay: &Stay,
        booking_id: i32,
    ) -> Result<u64, StoreError> {
        let mut linked = 0;
        for night in self
            .working
            .room_nights
            .iter_mut()
            .filter(|n| n.room_id == room_id && n.is_booked && stay.contains(n.date))
        {
            night.booking_id = Some(booking_id);
            linked += 1;
        }
        Ok(linked)
    }

    async fn release_availability(&mut self, booking_id: i32) -> Result<u64, StoreError> {
        let mut released = 0;
        for night in self
            .working
            .room_nights
            .iter_mut()
            .filter(|n| n.booking_id == Some(booking_id))
        {
            night.is_booked = false;
            night.booking_id = None;
            released += 1;
        }
        Ok(released)
    }

    async fn dynamic_rules(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        stay: &Stay,
    ) -> Result<Vec<DynamicPricingRule>, StoreError> {
        let mut rules: Vec<DynamicPricingRule> = self
            .working
            .rules
            .iter()
            .filter(|r| r.entity_type == entity_type && r.entity_id == entity_id && r.is_active)
            .filter(|r| r.overlaps(stay.check_in, stay.check_out))
            .cloned()
            .collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        Ok(rules)
    }

    async fn overlapping_rule_exists(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, StoreError> {
        Ok(self.working.rules.iter().any(|r| {
            r.entity_type == entity_type
                && r.entity_id == entity_id
                && r.is_active
                && r.overlaps(start, end)
        }))
    }

    async fn list_dynamic_rules(
        &mut self,
        entity_type: Option<PricingEntityType>,
        entity_id: Option<i32>,
    ) -> Result<Vec<DynamicPricingRule>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .rules
                .iter()
                .filter(|r| entity_type.map_or(true, |t| r.entity_type == t))
                .filter(|r| entity_id.map_or(true, |id| r.entity_id == id))
                .cloned(),
            |r| r.id,
        ))
    }

    async fn insert_dynamic_rule(
        &mut self,
        rule: &CreateDynamicPricingRequest,
    ) -> Result<DynamicPricingRule, StoreError> {
        let inserted = DynamicPricingRule {
            id: self.working.next_id(),
            entity_type: rule.entity_type,
            entity_id: rule.entity_id,
            start_date: rule.start_date,
            end_date: rule.end_date,
            price: rule.price,
            priority: rule.priority,
            is_active: rule.is_active,
            notes: rule.notes.clone(),
            created_at: Utc::now(),
        };
        self.working.rules.push(inserted.clone());
        Ok(inserted)
    }

    async fn tax_rules(&mut self, hotel_id: i32, stay: &Stay) -> Result<Vec<TaxRule>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .tax_rules
                .iter()
                .filter(|t| t.hotel_id == hotel_id && t.applies_to(stay))
                .cloned(),
            |t| t.id,
        ))
    }

    async fn list_tax_rules(&mut self, hotel_id: Option<i32>) -> Result<Vec<TaxRule>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .tax_rules
                .iter()
                .filter(|t| hotel_id.map_or(true, |id| t.hotel_id == id))
                .cloned(),
            |t| t.id,
        ))
    }

    async fn insert_tax_rule(&mut self, rule: &CreateTaxRuleRequest) -> Result<TaxRule, StoreError> {
        let inserted = TaxRule {
            id: self.working.next_id(),
            hotel_id: rule.hotel_id,
            name: rule.name.clone(),
            tax_type: rule.tax_type,
            tax_value: rule.tax_value,
            applicable_on: rule.applicable_on,
            start_date: rule.start_date,
            end_date: rule.end_date,
            is_active: rule.is_active,
        };
        self.working.tax_rules.push(inserted.clone());
        Ok(inserted)
    }

    async fn coupon_by_code(&mut self, code: &str) -> Result<Option<Coupon>, StoreError> {
        Ok(self.working.coupons.iter().find(|c| c.code == code).cloned())
    }

    async fn list_coupons(&mut self) -> Result<Vec<Coupon>, StoreError> {
        Ok(sorted_by_id(self.working.coupons.iter().cloned(), |c| c.id))
    }

    async fn insert_coupon(&mut self, coupon: &CreateCouponRequest) -> Result<Coupon, StoreError> {
        let inserted = Coupon {
            id: self.working.next_id(),
            code: coupon.code.clone(),
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            max_discount_amount: coupon.max_discount_amount,
            minimum_spend: coupon.minimum_spend,
            usage_limit: coupon.usage_limit,
            usage_count: 0,
            start_date: coupon.start_date,
            end_date: coupon.end_date,
            is_active: coupon.is_active,
        };
        self.working.coupons.push(inserted.clone());
        Ok(inserted)
    }

    async fn increment_coupon_usage(&mut self, coupon_id: i32) -> Result<bool, StoreError> {
        match self.working.coupons.iter_mut().find(|c| c.id == coupon_id) {
            Some(coupon) if coupon.has_remaining_uses() => {
                coupon.usage_count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cancellation_policies(
        &mut self,
        hotel_id: i32,
    ) -> Result<Vec<CancellationPolicy>, StoreError> {
        let mut policies: Vec<CancellationPolicy> = self
            .working
            .policies
            .iter()
            .filter(|p| p.hotel_id == hotel_id && p.is_active)
            .cloned()
            .collect();
        policies.sort_by(|a, b| {
            b.hours_before_check_in
                .cmp(&a.hours_before_check_in)
                .then(b.priority.cmp(&a.priority))
                .then(a.id.cmp(&b.id))
        });
        Ok(policies)
    }

    async fn list_cancellation_policies(
        &mut self,
        hotel_id: Option<i32>,
    ) -> Result<Vec<CancellationPolicy>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .policies
                .iter()
                .filter(|p| hotel_id.map_or(true, |id| p.hotel_id == id))
                .cloned(),
            |p| p.id,
        ))
    }

    async fn insert_cancellation_policy(
        &mut self,
        policy: &CreateCancellationPolicyRequest,
    ) -> Result<CancellationPolicy, StoreError> {
        let inserted = CancellationPolicy {
            id: self.working.next_id(),
            hotel_id: policy.hotel_id,
            name: policy.name.clone(),
            hours_before_check_in: policy.hours_before_check_in,
            refund_percentage: policy.refund_percentage,
            priority: policy.priority,
            is_active: policy.is_active,
        };
        self.working.policies.push(inserted.clone());
        Ok(inserted)
    }

    async fn booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError> {
        Ok(self.working.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn lock_booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError> {
        self.booking(id).await
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let now = Utc::now();
        let inserted = Booking {
            id: self.working.next_id(),
            hotel_id: booking.hotel_id,
            room_type_id: booking.room_type_id,
            room_id: booking.room_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            num_adults: booking.num_adults,
            num_children: booking.num_children,
            guest_name: booking.guest_name.clone(),
            guest_email: booking.guest_email.clone(),
            guest_phone: booking.guest_phone.clone(),
            booked_by: booking.booked_by,
            created_by: booking.created_by,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            base_price: booking.base_price,
            room_price_total: booking.room_price_total,
            hotel_addons_total: booking.hotel_addons_total,
            activity_addons_total: booking.activity_addons_total,
            subtotal: booking.subtotal,
            discount_amount: booking.discount_amount,
            tax_amount: booking.tax_amount,
            total_price: booking.total_price,
            price_breakdown: sqlx::types::Json(booking.price_breakdown.clone()),
            status_reason: None,
            status_changed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.working.bookings.push(inserted.clone());
        Ok(inserted)
    }

    async fn insert_booking_coupon(
        &mut self,
        booking_id: i32,
        coupon_id: i32,
        discount: Decimal,
    ) -> Result<(), StoreError> {
        self.working.booking_coupons.push((booking_id, coupon_id, discount));
        Ok(())
    }

    async fn insert_booking_addons(
        &mut self,
        kind: AddonKind,
        booking_id: i32,
        lines: &[AddonLine],
    ) -> Result<(), StoreError> {
        self.working
            .booking_addons
            .extend(lines.iter().cloned().map(|line| (kind, booking_id, line)));
        Ok(())
    }

    async fn update_booking_status(
        &mut self,
        id: i32,
        status: BookingStatus,
        reason: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let booking = self.working.booking_mut(id)?;
        booking.status = status;
        booking.status_reason = reason.map(str::to_string);
        booking.status_changed_at = Some(changed_at);
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn update_booking_payment_status(
        &mut self,
        id: i32,
        payment_status: PaymentStatus,
    ) -> Result<Booking, StoreError> {
        let booking = self.working.booking_mut(id)?;
        booking.payment_status = payment_status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn payment(&mut self, id: i32) -> Result<Option<Payment>, StoreError> {
        Ok(self.working.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn payments_for_booking(&mut self, booking_id: i32) -> Result<Vec<Payment>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .payments
                .iter()
                .filter(|p| p.booking_id == booking_id)
                .cloned(),
            |p| p.id,
        ))
    }

    async fn list_payments(&mut self, booking_id: Option<i32>) -> Result<Vec<Payment>, StoreError> {
        let mut payments = sorted_by_id(
            self.working
                .payments
                .iter()
                .filter(|p| booking_id.map_or(true, |id| p.booking_id == id))
                .cloned(),
            |p| p.id,
        );
        payments.reverse();
        Ok(payments)
    }

    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError> {
        let inserted = Payment {
            id: self.working.next_id(),
            booking_id: payment.booking_id,
            amount: payment.amount,
            payment_mode: payment.payment_mode,
            status: payment.status,
            reference: payment.reference.clone(),
            recorded_by: payment.recorded_by,
            paid_at: Utc::now(),
        };
        self.working.payments.push(inserted.clone());
        Ok(inserted)
    }

    async fn refunds_for_booking(&mut self, booking_id: i32) -> Result<Vec<Refund>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .refunds
                .iter()
                .filter(|r| r.booking_id == booking_id)
                .cloned(),
            |r| r.id,
        ))
    }

    async fn insert_refund(&mut self, refund: &NewRefund) -> Result<Refund, StoreError> {
        let inserted = Refund {
            id: self.working.next_id(),
            payment_id: refund.payment_id,
            booking_id: refund.booking_id,
            amount: refund.amount,
            status: refund.status,
            reason: refund.reason.clone(),
            recorded_by: refund.recorded_by,
            refunded_at: Utc::now(),
        };
        self.working.refunds.push(inserted.clone());
        Ok(inserted)
    }

    async fn ledger_for_booking(&mut self, booking_id: i32) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(sorted_by_id(
            self.working
                .ledger
                .iter()
                .filter(|e| e.booking_id == booking_id)
                .cloned(),
            |e| e.id,
        ))
    }

    async fn insert_ledger_entry(
        &mut self,
        entry: &NewLedgerEntry,
    ) -> Result<LedgerEntry, StoreError> {
        let inserted = LedgerEntry {
            id: self.working.next_id(),
            booking_id: entry.booking_id,
            hotel_id: entry.hotel_id,
            transaction_type: entry.transaction_type,
            amount: entry.amount,
            currency: entry.currency.clone(),
            reference_id: entry.reference_id,
            notes: entry.notes.clone(),
            created_by: entry.created_by,
            created_at: Utc::now(),
        };
        self.working.ledger.push(inserted.clone());
        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryStoreTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();
        let room_id = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                s.add_room(hotel, rt)
            })
            .await;

        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.claim_night(room_id, date(1)).await.unwrap());
        }
        assert!(store.snapshot().await.room_nights.is_empty());

        let mut tx = store.begin().await.unwrap();
        assert!(tx.claim_night(room_id, date(1)).await.unwrap());
        tx.commit().await.unwrap();
        assert_eq!(store.snapshot().await.room_nights.len(), 1);
    }

    #[tokio::test]
    async fn test_claim_night_is_conditional() {
        let store = MemoryStore::new();
        let room_id = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                s.add_room(hotel, rt)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.claim_night(room_id, date(1)).await.unwrap());
        assert!(!tx.claim_night(room_id, date(1)).await.unwrap());
        assert!(tx.claim_night(room_id, date(2)).await.unwrap());
    }
}
