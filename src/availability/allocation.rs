// Room allocation inside a booking's unit of work
//
// A plain scan picks a candidate, then every night is claimed with a
// conditional write. A claim that loses a race aborts the whole unit of work.

use tracing::{debug, warn};

use crate::bookings::BookingError;
use crate::models::{Room, Stay};
use crate::store::StoreTx;

/// First candidate, in the given order, with no booked night in the stay
pub fn pick_free_room<'a>(candidates: &'a [Room], occupied: &[i32]) -> Option<&'a Room> {
    candidates.iter().find(|room| !occupied.contains(&room.id))
}

/// Claim every night of the stay for one room
pub async fn claim_stay(tx: &mut dyn StoreTx, room_id: i32, stay: &Stay) -> Result<(), BookingError> {
    for date in stay.dates() {
        if !tx.claim_night(room_id, date).await? {
            warn!("Night {} of room {} was claimed concurrently", date, room_id);
            return Err(BookingError::AvailabilityConflict { room_id });
        }
    }
    Ok(())
}

/// Select a free room of the requested type and claim its nights
pub async fn allocate(
    tx: &mut dyn StoreTx,
    hotel_id: i32,
    room_type_id: i32,
    stay: &Stay,
) -> Result<Room, BookingError> {
    let candidates = tx.sellable_rooms(hotel_id, Some(room_type_id)).await?;
    let ids: Vec<i32> = candidates.iter().map(|r| r.id).collect();
    let occupied = tx.booked_room_ids(&ids, stay).await?;

    let room = pick_free_room(&candidates, &occupied)
        .cloned()
        .ok_or(BookingError::NoRoomAvailable { room_type_id })?;

    claim_stay(tx, room.id, stay).await?;
    debug!(
        "Allocated room {} ({}) for {} to {}",
        room.id, room.room_number, stay.check_in, stay.check_out
    );
    Ok(room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomStatus;
    use crate::store::memory::MemoryStore;
    use crate::store::Store;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn stay(from: u32, to: u32) -> Stay {
        Stay::new(date(from), date(to)).unwrap()
    }

    fn room(id: i32) -> Room {
        Room {
            id,
            hotel_id: 1,
            room_type_id: 1,
            room_number: format!("{}", id),
            status: RoomStatus::Available,
            is_active: true,
        }
    }

    #[test]
    fn test_pick_first_unoccupied() {
        let rooms = vec![room(1), room(2), room(3)];
        assert_eq!(pick_free_room(&rooms, &[1]).map(|r| r.id), Some(2));
        assert_eq!(pick_free_room(&rooms, &[]).map(|r| r.id), Some(1));
        assert!(pick_free_room(&rooms, &[1, 2, 3]).is_none());
    }

    #[tokio::test]
    async fn test_allocate_claims_every_night() {
        let store = MemoryStore::new();
        let (hotel, rt, room_id) = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                let room = s.add_room(hotel, rt);
                (hotel, rt, room)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        let room = allocate(tx.as_mut(), hotel, rt, &stay(1, 4)).await.unwrap();
        assert_eq!(room.id, room_id);

        let nights = tx.room_nights(room_id, &stay(1, 4)).await.unwrap();
        assert_eq!(nights.len(), 3);
        assert!(nights.iter().all(|n| n.is_booked));
    }

    #[tokio::test]
    async fn test_allocate_skips_rooms_booked_in_the_stay() {
        let store = MemoryStore::new();
        let (hotel, rt, second) = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                s.add_room(hotel, rt);
                let second = s.add_room(hotel, rt);
                (hotel, rt, second)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        allocate(tx.as_mut(), hotel, rt, &stay(1, 3)).await.unwrap();
        let room = allocate(tx.as_mut(), hotel, rt, &stay(2, 5)).await.unwrap();
        assert_eq!(room.id, second);

        let err = allocate(tx.as_mut(), hotel, rt, &stay(2, 3)).await.unwrap_err();
        assert!(matches!(err, BookingError::NoRoomAvailable { room_type_id } if room_type_id == rt));
    }

    #[tokio::test]
    async fn test_adjacent_stays_share_a_room() {
        let store = MemoryStore::new();
        let (hotel, rt, room_id) = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                let room = s.add_room(hotel, rt);
                (hotel, rt, room)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        allocate(tx.as_mut(), hotel, rt, &stay(1, 3)).await.unwrap();
        // Check-out day is free for the next guest
        let room = allocate(tx.as_mut(), hotel, rt, &stay(3, 5)).await.unwrap();
        assert_eq!(room.id, room_id);
    }

    #[tokio::test]
    async fn test_rooms_under_maintenance_are_never_allocated() {
        let store = MemoryStore::new();
        let (hotel, rt) = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                let room = s.add_room(hotel, rt);
                if let Some(r) = s.rooms.iter_mut().find(|r| r.id == room) {
                    r.status = RoomStatus::Maintenance;
                }
                (hotel, rt)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        let err = allocate(tx.as_mut(), hotel, rt, &stay(1, 2)).await.unwrap_err();
        assert!(matches!(err, BookingError::NoRoomAvailable { .. }));
    }

    #[tokio::test]
    async fn test_claim_conflict_on_already_booked_night() {
        let store = MemoryStore::new();
        let room_id = store
            .seed(|s| {
                let hotel = s.add_hotel(None);
                let rt = s.add_room_type(hotel, dec!(100), 2, 0);
                s.add_room(hotel, rt)
            })
            .await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.claim_night(room_id, date(3)).await.unwrap());

        // A claim that overlaps the taken night loses
        let err = claim_stay(tx.as_mut(), room_id, &stay(1, 5)).await.unwrap_err();
        assert!(matches!(err, BookingError::AvailabilityConflict { room_id: r } if r == room_id));
    }
}
