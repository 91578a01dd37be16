use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use validator::Validate;

use crate::models::Stay;
use crate::payments::{LedgerEntry, Payment, Refund};
use crate::pricing::models::{PriceBreakdown, PricedQuote, QuoteRequest};

/// Booking status enum representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }

    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status enum derived from net paid against the booking total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum PaymentStatus {
    Pending,
    PartiallyPaid,
    FullyPaid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::PartiallyPaid => "PartiallyPaid",
            PaymentStatus::FullyPaid => "FullyPaid",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who placed the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum BookedBy {
    Guest,
    Receptionist,
}

impl Default for BookedBy {
    fn default() -> Self {
        BookedBy::Guest
    }
}

/// Domain model representing a booking in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub hotel_id: i32,
    pub room_type_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_adults: i32,
    pub num_children: i32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub booked_by: BookedBy,
    pub created_by: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub base_price: Decimal,
    pub room_price_total: Decimal,
    pub hotel_addons_total: Decimal,
    pub activity_addons_total: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
    pub price_breakdown: Json<PriceBreakdown>,
    pub status_reason: Option<String>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> Stay {
        Stay {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

/// Row to insert for a freshly allocated booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: i32,
    pub room_type_id: i32,
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_adults: i32,
    pub num_children: i32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub booked_by: BookedBy,
    pub created_by: i32,
    pub base_price: Decimal,
    pub room_price_total: Decimal,
    pub hotel_addons_total: Decimal,
    pub activity_addons_total: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
    pub price_breakdown: PriceBreakdown,
}

impl NewBooking {
    /// Build the booking row from a priced quote and the allocated room
    pub fn from_quote(
        quote: &PricedQuote,
        room_id: i32,
        request: &CreateBookingRequest,
        created_by: i32,
    ) -> Self {
        Self {
            hotel_id: quote.hotel_id,
            room_type_id: quote.room_type_id,
            room_id,
            check_in: quote.check_in,
            check_out: quote.check_out,
            num_adults: quote.num_adults,
            num_children: quote.num_children,
            guest_name: request.guest_name.trim().to_string(),
            guest_email: request.guest_email.trim().to_lowercase(),
            guest_phone: request.guest_phone.clone(),
            booked_by: request.booked_by,
            created_by,
            base_price: quote.base_price,
            room_price_total: quote.room_price_total,
            hotel_addons_total: quote.hotel_addons_total,
            activity_addons_total: quote.activity_addons_total,
            subtotal: quote.subtotal,
            discount_amount: quote.discount,
            tax_amount: quote.tax_total,
            total_price: quote.total,
            price_breakdown: quote.breakdown.clone(),
        }
    }
}

/// Request DTO for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[serde(flatten)]
    #[validate]
    pub stay: QuoteRequest,
    #[validate(length(min = 1, max = 200, message = "Guest name must be 1-200 characters"))]
    pub guest_name: String,
    #[validate(email(message = "Guest email must be a valid email address"))]
    pub guest_email: String,
    #[validate(length(min = 5, max = 32, message = "Guest phone must be 5-32 characters"))]
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub booked_by: BookedBy,
}

/// Request DTO for cancelling a booking
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Booking together with its money trail
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub payments: Vec<Payment>,
    pub refunds: Vec<Refund>,
    pub ledger: Vec<LedgerEntry>,
}

/// Outcome of a cancellation
#[derive(Debug, Clone, Serialize)]
pub struct CancellationOutcome {
    pub booking: Booking,
    pub refund_amount: Decimal,
    pub refunds: Vec<Refund>,
    pub policy_id: Option<i32>,
}
