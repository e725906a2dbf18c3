use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation record as persisted in `bookings.json`.
///
/// `user_id`/`hotel_id` reference the other entity files by id; integrity is
/// advisory only (a booking survives its hotel).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub hotel_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub status: BookingStatus,
    pub guests: Vec<Guest>,
    pub created_at: String,
    pub updated_at: String,
}

/// Occupant on a booking's roster. The identity document number is null
/// until check-in supplies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub aadhaar_no: Option<String>,
}

/// Booking lifecycle tag.
///
/// `pending` is the initial state; check-in and cancel stamp `checked-in`
/// and `cancelled` without guarding the prior state, so repeated calls only
/// refresh `updatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    CheckedIn,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::CheckedIn => write!(f, "checked-in"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
