use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::models::Hotel;
use crate::store::NewHotel;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
}

/// GET /api/hotels
/// All hotels, no pagination or filtering
pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Hotel>>>, ApiError> {
    let hotels = state.store().list_hotels().await;
    Ok(Json(ApiResponse::success(hotels)))
}

/// GET /api/hotels/{id}
pub async fn get_hotel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Hotel>>, ApiError> {
    let hotel = state
        .store()
        .get_hotel(id)
        .await
        .ok_or_else(|| ApiError::not_found("Hotel", id))?;

    Ok(Json(ApiResponse::success(hotel)))
}

/// POST /api/hotels
/// Create a hotel. Unauthenticated on purpose: the original exposes this
/// without a guard as a demo-only gap, admin-only in a real deployment.
pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateHotelRequest>,
) -> Result<Json<ApiResponse<Hotel>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    let hotel = state
        .store()
        .create_hotel(NewHotel {
            name: payload.name,
            description: payload.description,
            location: payload.location,
            price: payload.price,
            image_url: payload.image_url,
        })
        .await?;

    tracing::info!("Created hotel {} ({})", hotel.id, hotel.name);
    Ok(Json(ApiResponse::success(hotel)))
}
