// HTTP handlers for availability endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::availability::{AvailabilityError, AvailabilityQuery, RoomTypeAvailability};
use crate::AppState;

/// Handler for GET /api/v1/availability
/// Lists room types with at least one free room for the stay
pub async fn search_availability_handler(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<RoomTypeAvailability>>, AvailabilityError> {
    let results = state.availability.search(&query).await?;
    Ok(Json(results))
}
