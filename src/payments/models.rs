use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum PaymentMode {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    #[sqlx(rename = "UPI")]
    Upi,
    Wallet,
    BankTransfer,
    Other,
}

/// Settlement state of a payment or refund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum SettlementStatus {
    Pending,
    Completed,
    Failed,
}

impl Default for SettlementStatus {
    fn default() -> Self {
        SettlementStatus::Completed
    }
}

/// Direction of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum TransactionType {
    Payment,
    Refund,
}

/// Money received against a booking. Never mutated once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub status: SettlementStatus,
    pub reference: Option<String>,
    pub recorded_by: i32,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_completed(&self) -> bool {
        self.status == SettlementStatus::Completed
    }
}

/// Money returned against a specific payment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Refund {
    pub id: i32,
    pub payment_id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub status: SettlementStatus,
    pub reason: String,
    pub recorded_by: i32,
    pub refunded_at: DateTime<Utc>,
}

impl Refund {
    pub fn is_completed(&self) -> bool {
        self.status == SettlementStatus::Completed
    }
}

/// Signed, append-only record of money movement for a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerEntry {
    pub id: i32,
    pub booking_id: i32,
    pub hotel_id: i32,
    pub transaction_type: TransactionType,
    /// Positive for payments, negative for refunds
    pub amount: Decimal,
    pub currency: String,
    /// Id of the payment or refund this row records
    pub reference_id: i32,
    pub notes: Option<String>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub status: SettlementStatus,
    pub reference: Option<String>,
    pub recorded_by: i32,
}

#[derive(Debug, Clone)]
pub struct NewRefund {
    pub payment_id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub status: SettlementStatus,
    pub reason: String,
    pub recorded_by: i32,
}

#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub booking_id: i32,
    pub hotel_id: i32,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub reference_id: i32,
    pub notes: Option<String>,
    pub created_by: i32,
}

impl NewLedgerEntry {
    /// Positive ledger row for a recorded payment
    pub fn for_payment(payment: &Payment, hotel_id: i32, currency: &str) -> Self {
        Self {
            booking_id: payment.booking_id,
            hotel_id,
            transaction_type: TransactionType::Payment,
            amount: payment.amount,
            currency: currency.to_string(),
            reference_id: payment.id,
            notes: payment.reference.clone(),
            created_by: payment.recorded_by,
        }
    }

    /// Negative ledger row for a recorded refund
    pub fn for_refund(refund: &Refund, hotel_id: i32, currency: &str) -> Self {
        Self {
            booking_id: refund.booking_id,
            hotel_id,
            transaction_type: TransactionType::Refund,
            amount: -refund.amount,
            currency: currency.to_string(),
            reference_id: refund.id,
            notes: Some(refund.reason.clone()),
            created_by: refund.recorded_by,
        }
    }
}

/// Request DTO for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    #[validate(length(min = 1, max = 100, message = "Reference must be 1-100 characters"))]
    pub reference: Option<String>,
}

/// Request DTO for refunding part or all of a payment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordRefundRequest {
    pub payment_id: i32,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}
