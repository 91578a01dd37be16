use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::availability::error::AvailabilityError;
use crate::models::{Room, RoomType, Stay, MAX_STAY_NIGHTS};
use crate::store::Store;

/// Query for free rooms in a hotel over a stay
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityQuery {
    pub hotel_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_adults")]
    #[validate(range(min = 1, message = "At least one adult is required"))]
    pub adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Children count cannot be negative"))]
    pub children: i32,
}

fn default_adults() -> i32 {
    1
}

/// Free room count for one room type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeAvailability {
    pub room_type_id: i32,
    pub name: String,
    pub base_price: Decimal,
    pub max_adults: i32,
    pub max_children: i32,
    pub available_room_count: usize,
}

/// Count free rooms per room type that fits the party
///
/// Room types with no free room are left out.
pub fn summarize(
    room_types: &[RoomType],
    rooms: &[Room],
    occupied: &[i32],
    adults: i32,
    children: i32,
) -> Vec<RoomTypeAvailability> {
    room_types
        .iter()
        .filter(|rt| rt.max_adults >= adults && rt.max_children >= children)
        .filter_map(|rt| {
            let free = rooms
                .iter()
                .filter(|r| r.room_type_id == rt.id && !occupied.contains(&r.id))
                .count();
            (free > 0).then(|| RoomTypeAvailability {
                room_type_id: rt.id,
                name: rt.name.clone(),
                base_price: rt.base_price,
                max_adults: rt.max_adults,
                max_children: rt.max_children,
                available_room_count: free,
            })
        })
        .collect()
}

/// Read-only availability search; takes no locks and writes nothing
pub struct AvailabilityService {
    store: Arc<dyn Store>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn search(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<RoomTypeAvailability>, AvailabilityError> {
        query.validate()?;
        let stay = Stay::new(query.check_in, query.check_out)
            .ok_or(AvailabilityError::InvalidDateRange)?;
        if stay.nights() > MAX_STAY_NIGHTS {
            return Err(AvailabilityError::Validation(format!(
                "Stay cannot exceed {} nights",
                MAX_STAY_NIGHTS
            )));
        }

        let mut tx = self.store.begin().await?;
        tx.hotel(query.hotel_id)
            .await?
            .ok_or(AvailabilityError::HotelNotFound(query.hotel_id))?;

        let room_types = tx.room_types_for_hotel(query.hotel_id).await?;
        let rooms = tx.sellable_rooms(query.hotel_id, None).await?;
        let ids: Vec<i32> = rooms.iter().map(|r| r.id).collect();
        let occupied = tx.booked_room_ids(&ids, &stay).await?;

        let results = summarize(&room_types, &rooms, &occupied, query.adults, query.children);
        tracing::debug!(
            "Availability for hotel {} from {} to {}: {} room types",
            query.hotel_id,
            stay.check_in,
            stay.check_out,
            results.len()
        );
        Ok(results)
    }
}
