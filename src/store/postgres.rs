// PostgreSQL implementation of the storage layer

use axum::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool, Postgres, Transaction};

use crate::bookings::{Booking, BookingStatus, NewBooking, PaymentStatus};
use crate::models::{Addon, AddonKind, Hotel, Room, RoomNight, RoomType, Stay};
use crate::payments::{LedgerEntry, NewLedgerEntry, NewPayment, NewRefund, Payment, Refund};
use crate::pricing::models::{
    AddonLine, CancellationPolicy, Coupon, CreateCancellationPolicyRequest,
    CreateCouponRequest, CreateDynamicPricingRequest, CreateTaxRuleRequest, DynamicPricingRule,
    PricingEntityType, TaxRule,
};
use crate::store::{Store, StoreError, StoreTx};

const BOOKING_COLUMNS: &str = "id, hotel_id, room_type_id, room_id, check_in, check_out, \
    num_adults, num_children, guest_name, guest_email, guest_phone, booked_by, created_by, \
    status, payment_status, base_price, room_price_total, hotel_addons_total, \
    activity_addons_total, subtotal, discount_amount, tax_amount, total_price, \
    price_breakdown, status_reason, status_changed_at, created_at, updated_at";

const RULE_COLUMNS: &str =
    "id, entity_type, entity_id, start_date, end_date, price, priority, is_active, notes, created_at";

const TAX_COLUMNS: &str =
    "id, hotel_id, name, tax_type, tax_value, applicable_on, start_date, end_date, is_active";

const COUPON_COLUMNS: &str = "id, code, discount_type, discount_value, max_discount_amount, \
    minimum_spend, usage_limit, usage_count, start_date, end_date, is_active";

const POLICY_COLUMNS: &str =
    "id, hotel_id, name, hours_before_check_in, refund_percentage, priority, is_active";

const PAYMENT_COLUMNS: &str =
    "id, booking_id, amount, payment_mode, status, reference, recorded_by, paid_at";

const REFUND_COLUMNS: &str =
    "id, payment_id, booking_id, amount, status, reason, recorded_by, refunded_at";

const LEDGER_COLUMNS: &str = "id, booking_id, hotel_id, transaction_type, amount, currency, \
    reference_id, notes, created_by, created_at";

const ROOM_COLUMNS: &str = "id, hotel_id, room_type_id, room_number, status, is_active";

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTx { tx }))
    }
}

/// One database transaction; rolled back by sqlx when dropped uncommitted
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn hotel(&mut self, id: i32) -> Result<Option<Hotel>, StoreError> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "SELECT id, name, currency, timezone, check_in_time, check_out_time FROM hotels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(hotel)
    }

    async fn room_type(&mut self, id: i32) -> Result<Option<RoomType>, StoreError> {
        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT id, hotel_id, name, max_adults, max_children, base_price, is_active
            FROM room_types
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(room_type)
    }

    async fn room_types_for_hotel(&mut self, hotel_id: i32) -> Result<Vec<RoomType>, StoreError> {
        let room_types = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT id, hotel_id, name, max_adults, max_children, base_price, is_active
            FROM room_types
            WHERE hotel_id = $1 AND is_active
            ORDER BY id
            "#,
        )
        .bind(hotel_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(room_types)
    }

    async fn sellable_rooms(
        &mut self,
        hotel_id: i32,
        room_type_id: Option<i32>,
    ) -> Result<Vec<Room>, StoreError> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            r#"
            SELECT {ROOM_COLUMNS}
            FROM rooms
            WHERE hotel_id = $1
              AND ($2::INTEGER IS NULL OR room_type_id = $2)
              AND is_active
              AND status = 'Available'
            ORDER BY id
            "#
        ))
        .bind(hotel_id)
        .bind(room_type_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rooms)
    }

    async fn addons(&mut self, kind: AddonKind, ids: &[i32]) -> Result<Vec<Addon>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let addons = sqlx::query_as::<_, Addon>(&format!(
            "SELECT id, hotel_id, name, base_price, per_guest, is_active FROM {} WHERE id = ANY($1) ORDER BY id",
            kind.table()
        ))
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(addons)
    }

    async fn booked_room_ids(
        &mut self,
        room_ids: &[i32],
        stay: &Stay,
    ) -> Result<Vec<i32>, StoreError> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT room_id
            FROM room_availability
            WHERE room_id = ANY($1) AND date >= $2 AND date < $3 AND is_booked
            "#,
        )
        .bind(room_ids)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(ids)
    }

    async fn room_nights(&mut self, room_id: i32, stay: &Stay) -> Result<Vec<RoomNight>, StoreError> {
        let nights = sqlx::query_as::<_, RoomNight>(
            r#"
            SELECT id, room_id, date, is_booked, booking_id
            FROM room_availability
            WHERE room_id = $1 AND date >= $2 AND date < $3
            ORDER BY date
            "#,
        )
        .bind(room_id)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(nights)
    }

    async fn claim_night(&mut self, room_id: i32, date: NaiveDate) -> Result<bool, StoreError> {
        // The conditional DO UPDATE turns a concurrent claim into "no row returned"
        // instead of a silent overwrite.
        let claimed = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO room_availability (room_id, date, is_booked)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (room_id, date) DO UPDATE
                SET is_booked = TRUE
                WHERE room_availability.is_booked = FALSE
            RETURNING id
            "#,
        )
        .bind(room_id)
        .bind(date)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(claimed.is_some())
    }

    async fn link_availability(
        &mut self,
        room_id: i32,
        stay: &Stay,
        booking_id: i32,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE room_availability
            SET booking_id = $1
            WHERE room_id = $2 AND date >= $3 AND date < $4 AND is_booked
            "#,
        )
        .bind(booking_id)
        .bind(room_id)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn release_availability(&mut self, booking_id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE room_availability SET is_booked = FALSE, booking_id = NULL WHERE booking_id = $1",
        )
        .bind(booking_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn dynamic_rules(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        stay: &Stay,
    ) -> Result<Vec<DynamicPricingRule>, StoreError> {
        let rules = sqlx::query_as::<_, DynamicPricingRule>(&format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM dynamic_pricing
            WHERE entity_type = $1 AND entity_id = $2 AND is_active
              AND start_date < $4 AND end_date > $3
            ORDER BY priority DESC, id ASC
            "#
        ))
        .bind(entity_type)
        .bind(entity_id)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rules)
    }

    async fn overlapping_rule_exists(
        &mut self,
        entity_type: PricingEntityType,
        entity_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM dynamic_pricing
                WHERE entity_type = $1 AND entity_id = $2 AND is_active
                  AND start_date < $4 AND end_date > $3
            )
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(start)
        .bind(end)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(exists)
    }

    async fn list_dynamic_rules(
        &mut self,
        entity_type: Option<PricingEntityType>,
        entity_id: Option<i32>,
    ) -> Result<Vec<DynamicPricingRule>, StoreError> {
        let rules = sqlx::query_as::<_, DynamicPricingRule>(&format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM dynamic_pricing
            WHERE ($1::TEXT IS NULL OR entity_type = $1)
              AND ($2::INTEGER IS NULL OR entity_id = $2)
            ORDER BY entity_type, entity_id, start_date, id
            "#
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rules)
    }

    async fn insert_dynamic_rule(
        &mut self,
        rule: &CreateDynamicPricingRequest,
    ) -> Result<DynamicPricingRule, StoreError> {
        let inserted = sqlx::query_as::<_, DynamicPricingRule>(&format!(
            r#"
            INSERT INTO dynamic_pricing
                (entity_type, entity_id, start_date, end_date, price, priority, is_active, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RULE_COLUMNS}
            "#
        ))
        .bind(rule.entity_type)
        .bind(rule.entity_id)
        .bind(rule.start_date)
        .bind(rule.end_date)
        .bind(rule.price)
        .bind(rule.priority)
        .bind(rule.is_active)
        .bind(&rule.notes)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn tax_rules(&mut self, hotel_id: i32, stay: &Stay) -> Result<Vec<TaxRule>, StoreError> {
        let rules = sqlx::query_as::<_, TaxRule>(&format!(
            r#"
            SELECT {TAX_COLUMNS}
            FROM tax_rules
            WHERE hotel_id = $1 AND is_active
              AND start_date <= $3
              AND (end_date IS NULL OR end_date >= $2)
            ORDER BY id
            "#
        ))
        .bind(hotel_id)
        .bind(stay.check_in)
        .bind(stay.check_out)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rules)
    }

    async fn list_tax_rules(&mut self, hotel_id: Option<i32>) -> Result<Vec<TaxRule>, StoreError> {
        let rules = sqlx::query_as::<_, TaxRule>(&format!(
            "SELECT {TAX_COLUMNS} FROM tax_rules WHERE ($1::INTEGER IS NULL OR hotel_id = $1) ORDER BY id"
        ))
        .bind(hotel_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rules)
    }

    async fn insert_tax_rule(&mut self, rule: &CreateTaxRuleRequest) -> Result<TaxRule, StoreError> {
        let inserted = sqlx::query_as::<_, TaxRule>(&format!(
            r#"
            INSERT INTO tax_rules
                (hotel_id, name, tax_type, tax_value, applicable_on, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TAX_COLUMNS}
            "#
        ))
        .bind(rule.hotel_id)
        .bind(&rule.name)
        .bind(rule.tax_type)
        .bind(rule.tax_value)
        .bind(rule.applicable_on)
        .bind(rule.start_date)
        .bind(rule.end_date)
        .bind(rule.is_active)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn coupon_by_code(&mut self, code: &str) -> Result<Option<Coupon>, StoreError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(coupon)
    }

    async fn list_coupons(&mut self) -> Result<Vec<Coupon>, StoreError> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons ORDER BY id"
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(coupons)
    }

    async fn insert_coupon(&mut self, coupon: &CreateCouponRequest) -> Result<Coupon, StoreError> {
        let inserted = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            INSERT INTO coupons
                (code, discount_type, discount_value, max_discount_amount, minimum_spend,
                 usage_limit, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COUPON_COLUMNS}
            "#
        ))
        .bind(&coupon.code)
        .bind(coupon.discount_type)
        .bind(coupon.discount_value)
        .bind(coupon.max_discount_amount)
        .bind(coupon.minimum_spend)
        .bind(coupon.usage_limit)
        .bind(coupon.start_date)
        .bind(coupon.end_date)
        .bind(coupon.is_active)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn increment_coupon_usage(&mut self, coupon_id: i32) -> Result<bool, StoreError> {
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE coupons
            SET usage_count = usage_count + 1
            WHERE id = $1 AND (usage_limit = -1 OR usage_count < usage_limit)
            RETURNING id
            "#,
        )
        .bind(coupon_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(updated.is_some())
    }

    async fn cancellation_policies(
        &mut self,
        hotel_id: i32,
    ) -> Result<Vec<CancellationPolicy>, StoreError> {
        let policies = sqlx::query_as::<_, CancellationPolicy>(&format!(
            r#"
            SELECT {POLICY_COLUMNS}
            FROM cancellation_policies
            WHERE hotel_id = $1 AND is_active
            ORDER BY hours_before_check_in DESC, priority DESC, id ASC
            "#
        ))
        .bind(hotel_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(policies)
    }

    async fn list_cancellation_policies(
        &mut self,
        hotel_id: Option<i32>,
    ) -> Result<Vec<CancellationPolicy>, StoreError> {
        let policies = sqlx::query_as::<_, CancellationPolicy>(&format!(
            r#"
            SELECT {POLICY_COLUMNS}
            FROM cancellation_policies
            WHERE ($1::INTEGER IS NULL OR hotel_id = $1)
            ORDER BY hotel_id, hours_before_check_in DESC, id
            "#
        ))
        .bind(hotel_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(policies)
    }

    async fn insert_cancellation_policy(
        &mut self,
        policy: &CreateCancellationPolicyRequest,
    ) -> Result<CancellationPolicy, StoreError> {
        let inserted = sqlx::query_as::<_, CancellationPolicy>(&format!(
            r#"
            INSERT INTO cancellation_policies
                (hotel_id, name, hours_before_check_in, refund_percentage, priority, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POLICY_COLUMNS}
            "#
        ))
        .bind(policy.hotel_id)
        .bind(&policy.name)
        .bind(policy.hours_before_check_in)
        .bind(policy.refund_percentage)
        .bind(policy.priority)
        .bind(policy.is_active)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(booking)
    }

    async fn lock_booking(&mut self, id: i32) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(booking)
    }

    async fn insert_booking(&mut self, booking: &NewBooking) -> Result<Booking, StoreError> {
        let inserted = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings
                (hotel_id, room_type_id, room_id, check_in, check_out, num_adults, num_children,
                 guest_name, guest_email, guest_phone, booked_by, created_by, status, payment_status,
                 base_price, room_price_total, hotel_addons_total, activity_addons_total, subtotal,
                 discount_amount, tax_amount, total_price, price_breakdown)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.hotel_id)
        .bind(booking.room_type_id)
        .bind(booking.room_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.num_adults)
        .bind(booking.num_children)
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(&booking.guest_phone)
        .bind(booking.booked_by)
        .bind(booking.created_by)
        .bind(BookingStatus::Pending)
        .bind(PaymentStatus::Pending)
        .bind(booking.base_price)
        .bind(booking.room_price_total)
        .bind(booking.hotel_addons_total)
        .bind(booking.activity_addons_total)
        .bind(booking.subtotal)
        .bind(booking.discount_amount)
        .bind(booking.tax_amount)
        .bind(booking.total_price)
        .bind(Json(&booking.price_breakdown))
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn insert_booking_coupon(
        &mut self,
        booking_id: i32,
        coupon_id: i32,
        discount: Decimal,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO booking_coupons (booking_id, coupon_id, discount_amount) VALUES ($1, $2, $3)",
        )
        .bind(booking_id)
        .bind(coupon_id)
        .bind(discount)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_booking_addons(
        &mut self,
        kind: AddonKind,
        booking_id: i32,
        lines: &[AddonLine],
    ) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (booking_id, addon_id, quantity, unit_price, total_price) VALUES ($1, $2, $3, $4, $5)",
            kind.booking_table()
        );
        for line in lines {
            sqlx::query(&sql)
                .bind(booking_id)
                .bind(line.addon_id)
                .bind(line.quantity)
                .bind(line.unit_price)
                .bind(line.total)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }

    async fn update_booking_status(
        &mut self,
        id: i32,
        status: BookingStatus,
        reason: Option<&str>,
        changed_at: DateTime<Utc>,
    ) -> Result<Booking, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $2, status_reason = $3, status_changed_at = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(reason)
        .bind(changed_at)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(booking)
    }

    async fn update_booking_payment_status(
        &mut self,
        id: i32,
        payment_status: PaymentStatus,
    ) -> Result<Booking, StoreError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET payment_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payment_status)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(booking)
    }

    async fn payment(&mut self, id: i32) -> Result<Option<Payment>, StoreError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(payment)
    }

    async fn payments_for_booking(&mut self, booking_id: i32) -> Result<Vec<Payment>, StoreError> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1 ORDER BY paid_at, id"
        ))
        .bind(booking_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(payments)
    }

    async fn list_payments(&mut self, booking_id: Option<i32>) -> Result<Vec<Payment>, StoreError> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments
            WHERE ($1::INTEGER IS NULL OR booking_id = $1)
            ORDER BY paid_at DESC, id DESC
            "#
        ))
        .bind(booking_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(payments)
    }

    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, StoreError> {
        let inserted = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (booking_id, amount, payment_mode, status, reference, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.booking_id)
        .bind(payment.amount)
        .bind(payment.payment_mode)
        .bind(payment.status)
        .bind(&payment.reference)
        .bind(payment.recorded_by)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn refunds_for_booking(&mut self, booking_id: i32) -> Result<Vec<Refund>, StoreError> {
        let refunds = sqlx::query_as::<_, Refund>(&format!(
            "SELECT {REFUND_COLUMNS} FROM refunds WHERE booking_id = $1 ORDER BY refunded_at, id"
        ))
        .bind(booking_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(refunds)
    }

    async fn insert_refund(&mut self, refund: &NewRefund) -> Result<Refund, StoreError> {
        let inserted = sqlx::query_as::<_, Refund>(&format!(
            r#"
            INSERT INTO refunds (payment_id, booking_id, amount, status, reason, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REFUND_COLUMNS}
            "#
        ))
        .bind(refund.payment_id)
        .bind(refund.booking_id)
        .bind(refund.amount)
        .bind(refund.status)
        .bind(&refund.reason)
        .bind(refund.recorded_by)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn ledger_for_booking(&mut self, booking_id: i32) -> Result<Vec<LedgerEntry>, StoreError> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM ledger_transactions WHERE booking_id = $1 ORDER BY created_at, id"
        ))
        .bind(booking_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(entries)
    }

    async fn insert_ledger_entry(
        &mut self,
        entry: &NewLedgerEntry,
    ) -> Result<LedgerEntry, StoreError> {
        let inserted = sqlx::query_as::<_, LedgerEntry>(&format!(
            r#"
            INSERT INTO ledger_transactions
                (booking_id, hotel_id, transaction_type, amount, currency, reference_id, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEDGER_COLUMNS}
            "#
        ))
        .bind(entry.booking_id)
        .bind(entry.hotel_id)
        .bind(entry.transaction_type)
        .bind(entry.amount)
        .bind(&entry.currency)
        .bind(entry.reference_id)
        .bind(&entry.notes)
        .bind(entry.created_by)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
