// Storage layer
//
// Every component receives a `Store` handle at construction and runs each
// operation inside one `StoreTx` unit of work. Dropping a `StoreTx` without
// calling `commit` discards everything it wrote.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use axum::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::bookings::{Booking, BookingStatus, NewBooking, PaymentStatus};
use crate::models::{Addon, AddonKind, Hotel, Room, RoomNight, RoomType, Stay};
use crate::payments::{LedgerEntry, NewLedgerEntry, NewPayment, NewRefund, Payment, Refund};
use crate::pricing::models::{
    AddonLine, CancellationPolicy, Coupon, CreateCancellationPolicyRequest,
    CreateCouponRequest, CreateDynamicPricingRequest, CreateTaxRuleRequest, DynamicPricingRule,
    PricingEntityType, TaxRule,
};

pub use postgres::PgStore;

/// Errors raised by the storage layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handle to the backing store
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a new unit of work
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError>;
}

/// A single all-or-nothing unit of work against the store
#[async_trait]
pub trait StoreTx: Send {
    // Catalogue

    async fn hotel(&mut self, id: i32) -> Result<Option<Hotel>, StoreError>;

    async fn room_type(&mut self, id: i32) -> Result<Option<RoomType>, StoreError>;

    /// Active room types of a hotel, ordered by id
    async fn room_types_for_hotel(&mut self, hotel_id: i32) -> Result<Vec<RoomType>, StoreError>;

    /// Active rooms with status Available, ordered by id; all types when `room_type_id` is `None`
    async fn sellable_rooms(
        &mut self,
        hotel_id: i32,
        room_type_id: Option<i32>,
    ) -> Result<Vec<Room>, StoreError>;

    /// Addons of the given kind with the given ids; missing ids are simply absent
    async fn addons(&mut self, kind: AddonKind, ids: &[i32]) -> Result<Vec<Addon>, StoreError>;

    // Inventory

    /// Distinct rooms among `room_ids` with a booked night inside the stay
    async fn booked_room_ids(&mut self, room_ids: &[i32], stay: &Stay)
        -> Result<Vec<i32>, StoreError>;

    /// Inventory rows for a room within the stay, ordered by date
    async fn room_nights(&mut self, room_id: i32, stay: &Stay) -> Result<Vec<RoomNight>, StoreError>;

    /// Mark a room booked for one night. Returns `false` when the night is
    /// already booked, leaving the row untouched.
    async fn claim_night(&mut self, room_id: i32, date: NaiveDate) -> Result<bool, StoreError>;

    /// Point the claimed nights of a stay at their booking
    async fn link_availability(
        &mut self,
        room_id: i32,
        stay: &Stay,
        booking_id: i32,
    ) -> Result<u64, StoreError>;

    /// Free every night held by a booking
    async fn release_availability(&mut self, booking_id: i32) -> Result<u64, StoreError>;

    // Pricing configuration

    /// Active rules for an entity whose window intersects the stay
    async fn dynamic_rules(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        stay: &Stay,
    ) -> Result<Vec<DynamicPricingRule>, StoreError>;

    async fn overlapping_rule_exists(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, StoreError>;

    async fn list_dynamic_rules(
        &mut self,
        entity_type: Option<PricingEntityType>,
        entity_id: Option<i32>,
    ) -> Result<Vec<DynamicPricingRule>, StoreError>;

    async fn insert_dynamic_rule(
        &mut self,
        rule: &CreateDynamicPricingRequest,
    ) -> Result<DynamicPricingRule, StoreError>;

    /// Tax rules of a hotel in force for any part of the stay, ordered by id
    async fn tax_rules(&mut self, hotel_id: i32, stay: &Stay) -> Result<Vec<TaxRule>, StoreError>;

    async fn list_tax_rules(&mut self, hotel_id: Option<i32>) -> Result<Vec<TaxRule>, StoreError>;

    async fn insert_tax_rule(&mut self, rule: &CreateTaxRuleRequest) -> Result<TaxRule, StoreError>;

    async fn coupon_by_code(&mut self, code: &str) -> Result<Option<Coupon>, StoreError>;

    async fn list_coupons(&mut self) -> Result<Vec<Coupon>, StoreError>;

    /// Insert a coupon whose code has already been normalized
    async fn insert_coupon(&mut self, coupon: &CreateCouponRequest) -> Result<Coupon, StoreError>;

    /// Count one redemption. Returns `false` when the usage limit is already reached.
    async fn increment_coupon_usage(&mut self, coupon_id: i32) -> Result<bool, StoreError>;

    /// Active cancellation policies of a hotel
    async fn cancellation_policies(
        &mut self,
        hotel_id: i32,
    ) -> Result<Vec<CancellationPolicy>, StoreError>;

    async fn list_cancellation_policies(
        &mut self,
        hotel_id: Option<i32>,
    ) -> Result<Vec<CancellationPolicy>, StoreError>;

    async fn insert_cancellation_policy(
        &mut self,
        policy: &CreateCancellationPolicyRequest,
    ) -> Result<CancellationPolicy, StoreError>;

    // Bookings

    async fn booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError>;

    /// Load a booking and hold it against concurrent writers until the unit of work ends
    async fn lock_booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError>;

    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError>;

    async fn insert_booking_coupon(
        &mut self,
        booking_id: i32,
        coupon_id: i32,
        discount: Decimal,
    ) -> Result<(), StoreError>;

    async fn insert_booking_addons(
        &mut self,
        kind: AddonKind,
        booking_id: i32,
        lines: &[AddonLine],
    ) -> Result<(), StoreError>;

    async fn update_booking_status(
        &mut self,
        id: i32,
        status: BookingStatus,
        reason: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Result<Booking, StoreError>;

    async fn update_booking_payment_status(
        &mut self,
        id: i32,
        payment_status: PaymentStatus,
    ) -> Result<Booking, StoreError>;

    // Money movement

    async fn payment(&mut self, id: i32) -> Result<Option<Payment>, StoreError>;

    /// Payments of a booking, oldest first
    async fn payments_for_booking(&mut self, booking_id: i32) -> Result<Vec<Payment>, StoreError>;

    async fn list_payments(&mut self, booking_id: Option<i32>) -> Result<Vec<Payment>, StoreError>;

    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError>;

    /// Refunds of a booking, oldest first
    async fn refunds_for_booking(&mut self, booking_id: i32) -> Result<Vec<Refund>, StoreError>;

    async fn insert_refund(&mut self, refund: &NewRefund) -> Result<Refund, StoreError>;

    /// Ledger rows of a booking, oldest first
    async fn ledger_for_booking(&mut self, booking_id: i32) -> Result<Vec<LedgerEntry>, StoreError>;

    async fn insert_ledger_entry(&mut self, entry: &NewLedgerEntry)
        -> Result<LedgerEntry, StoreError>;

    /// Make every write of this unit of work durable
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
