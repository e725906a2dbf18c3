use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::DateTime;
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, ApiResponse, AppState, BookingDto};
use crate::models::Booking;
use crate::store::NewBooking;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub hotel_id: i64,
    pub check_in: String,
    pub check_out: String,
    #[serde(default)]
    pub guests: Vec<GuestName>,
}

#[derive(Debug, Deserialize)]
pub struct GuestName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    #[serde(default)]
    pub guests: Vec<GuestDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDocument {
    pub aadhaar_no: Option<String>,
}

/// GET /api/bookings
/// The caller's bookings, each joined with its hotel
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let bookings = state.store().bookings_for_user(auth.id).await;
    let hotels = state.store().list_hotels().await;

    let dtos = bookings
        .into_iter()
        .map(|booking| {
            let hotel = hotels.iter().find(|h| h.id == booking.hotel_id).cloned();
            BookingDto::new(booking, hotel)
        })
        .collect();

    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = fetch_owned_booking(&state, id, auth.id).await?;
    let hotel = state.store().get_hotel(booking.hotel_id).await;

    Ok(Json(ApiResponse::success(BookingDto::new(booking, hotel))))
}

/// POST /api/bookings
/// Create a booking for the caller; the response embeds the hotel record
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let hotel = state
        .store()
        .get_hotel(payload.hotel_id)
        .await
        .ok_or_else(|| ApiError::not_found("Hotel", payload.hotel_id))?;

    let check_in = parse_timestamp(&payload.check_in, "checkIn")?;
    let check_out = parse_timestamp(&payload.check_out, "checkOut")?;

    let booking = state
        .store()
        .create_booking(NewBooking {
            user_id: auth.id,
            hotel_id: hotel.id,
            check_in,
            check_out,
            guest_names: payload.guests.into_iter().map(|g| g.name).collect(),
        })
        .await?;

    tracing::info!(
        "Created booking {} for user {} at hotel {}",
        booking.id,
        auth.id,
        hotel.id
    );

    Ok(Json(ApiResponse::success(BookingDto::new(
        booking,
        Some(hotel),
    ))))
}

/// PUT /api/bookings/{id}/check-in
/// Fill guest document numbers and mark the booking checked-in
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    fetch_owned_booking(&state, id, auth.id).await?;

    let documents: Vec<Option<String>> =
        payload.guests.into_iter().map(|g| g.aadhaar_no).collect();

    let booking = state
        .store()
        .check_in_booking(id, &documents)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    let hotel = state.store().get_hotel(booking.hotel_id).await;
    Ok(Json(ApiResponse::success(BookingDto::new(booking, hotel))))
}

/// PUT /api/bookings/{id}/cancel
/// Mark the booking cancelled; repeated calls are a no-op apart from the
/// `updatedAt` stamp
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    fetch_owned_booking(&state, id, auth.id).await?;

    let booking = state
        .store()
        .cancel_booking(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    let hotel = state.store().get_hotel(booking.hotel_id).await;
    Ok(Json(ApiResponse::success(BookingDto::new(booking, hotel))))
}

/// Looks the booking up, 404 first, then 401 when it belongs to someone
/// else. Bookings are never deleted and never change owner, so the check
/// stays valid for the follow-up mutation.
async fn fetch_owned_booking(
    state: &AppState,
    id: i64,
    user_id: i64,
) -> Result<Booking, ApiError> {
    let booking = state
        .store()
        .get_booking(id)
        .await
        .ok_or_else(|| ApiError::not_found("Booking", id))?;

    if booking.user_id != user_id {
        return Err(ApiError::unauthorized("Not authorized"));
    }

    Ok(booking)
}

/// Normalizes a request timestamp to RFC 3339 in UTC, rejecting garbage at
/// the boundary instead of storing it.
fn parse_timestamp(value: &str, field: &str) -> Result<String, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc().to_rfc3339())
        .map_err(|_| ApiError::validation(format!("Invalid {field} date")))
}
