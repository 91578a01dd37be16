use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A hotel owning room types, rooms and all pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    /// ISO 4217 code copied onto ledger rows; falls back to the configured default
    pub currency: Option<String>,
    pub timezone: String,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
}

/// A sellable room category within a hotel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomType {
    pub id: i32,
    pub hotel_id: i32,
    pub name: String,
    pub max_adults: i32,
    pub max_children: i32,
    pub base_price: Decimal,
    pub is_active: bool,
}

/// Operational status of a physical room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum RoomStatus {
    Available,
    Maintenance,
    OutOfService,
}

/// A physical room, the unit of allocation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i32,
    pub hotel_id: i32,
    pub room_type_id: i32,
    pub room_number: String,
    pub status: RoomStatus,
    pub is_active: bool,
}

impl Room {
    /// Whether the room can be offered for new stays at all
    pub fn is_sellable(&self) -> bool {
        self.is_active && self.status == RoomStatus::Available
    }
}

/// Per-night inventory row; a missing row means the room is free that night
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoomNight {
    pub id: i32,
    pub room_id: i32,
    pub date: NaiveDate,
    pub is_booked: bool,
    pub booking_id: Option<i32>,
}

/// Which addon catalogue an addon belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddonKind {
    /// Hotel services such as breakfast or airport pickup
    Hotel,
    /// Activities, either hotel-specific or global
    Activity,
}

impl AddonKind {
    /// Catalogue table holding addons of this kind
    pub fn table(&self) -> &'static str {
        match self {
            AddonKind::Hotel => "hotel_addons",
            AddonKind::Activity => "activity_addons",
        }
    }

    /// Join table linking bookings to addons of this kind
    pub fn booking_table(&self) -> &'static str {
        match self {
            AddonKind::Hotel => "booking_hotel_addons",
            AddonKind::Activity => "booking_activity_addons",
        }
    }
}

/// A chargeable extra selected alongside a stay
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Addon {
    pub id: i32,
    /// `None` only for global activity addons
    pub hotel_id: Option<i32>,
    pub name: String,
    pub base_price: Decimal,
    pub per_guest: bool,
    pub is_active: bool,
}

/// Longest stay that can be quoted, searched or booked
pub const MAX_STAY_NIGHTS: i64 = 365;

/// A `[check_in, check_out)` date range; check-out night is not included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    /// Build a stay, returning `None` unless at least one night is covered
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        if check_out > check_in {
            Some(Self {
                check_in,
                check_out,
            })
        } else {
            None
        }
    }

    /// Number of nights in the stay
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every night of the stay, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.check_in;
        (0..self.nights()).map(move |offset| start + Duration::days(offset))
    }

    /// Whether the given night falls within the stay
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.check_in && date < self.check_out
    }
}
