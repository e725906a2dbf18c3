use serde::Serialize;

use crate::models::{Booking, BookingStatus, Guest, Hotel, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Public view of a user: everything except the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

/// Booking joined with its hotel record. The hotel is `null` when the
/// referenced record no longer exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i64,
    pub user_id: i64,
    pub hotel_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub status: BookingStatus,
    pub guests: Vec<Guest>,
    pub created_at: String,
    pub updated_at: String,
    pub hotel: Option<Hotel>,
}

impl BookingDto {
    pub fn new(booking: Booking, hotel: Option<Hotel>) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            hotel_id: booking.hotel_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status,
            guests: booking.guests,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            hotel,
        }
    }
}
