//! Flat-file persistence: one pretty-printed JSON array per entity type.
//!
//! The original datastore contract is `load -> records` / `save -> whole
//! file`, with no coordination between writers. This port keeps the file
//! format but serializes every read-modify-write cycle through a per-entity
//! mutex and allocates ids from a counter, so concurrent requests can no
//! longer lose updates or collide on ids.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Booking, Hotel, User};

mod bookings;
mod file;
mod hotels;
mod users;

pub use bookings::BookingRepository;
pub use file::{JsonFile, Rows};
pub use hotels::HotelRepository;
pub use users::UserRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Facade over the three entity collections.
#[derive(Clone)]
pub struct Store {
    users: Arc<JsonFile<User>>,
    hotels: Arc<JsonFile<Hotel>>,
    bookings: Arc<JsonFile<Booking>>,
}

impl Store {
    /// Opens (creating if necessary) the data directory and loads all three
    /// entity files.
    pub async fn open(data_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_path.as_ref();

        Ok(Self {
            users: Arc::new(JsonFile::open(dir.join("users.json"), |u: &User| u.id).await?),
            hotels: Arc::new(JsonFile::open(dir.join("hotels.json"), |h: &Hotel| h.id).await?),
            bookings: Arc::new(
                JsonFile::open(dir.join("bookings.json"), |b: &Booking| b.id).await?,
            ),
        })
    }

    fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.users.clone())
    }

    fn hotel_repo(&self) -> HotelRepository {
        HotelRepository::new(self.hotels.clone())
    }

    fn booking_repo(&self) -> BookingRepository {
        BookingRepository::new(self.bookings.clone())
    }

    // Users

    pub async fn get_user(&self, id: i64) -> Option<User> {
        self.user_repo().get(id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.user_repo().find_by_email(email).await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.user_repo().create(name, email, password_hash).await
    }

    // Hotels

    pub async fn list_hotels(&self) -> Vec<Hotel> {
        self.hotel_repo().list().await
    }

    pub async fn get_hotel(&self, id: i64) -> Option<Hotel> {
        self.hotel_repo().get(id).await
    }

    pub async fn create_hotel(&self, fields: hotels::NewHotel) -> Result<Hotel, StoreError> {
        self.hotel_repo().create(fields).await
    }

    // Bookings

    pub async fn bookings_for_user(&self, user_id: i64) -> Vec<Booking> {
        self.booking_repo().list_for_user(user_id).await
    }

    pub async fn get_booking(&self, id: i64) -> Option<Booking> {
        self.booking_repo().get(id).await
    }

    pub async fn create_booking(
        &self,
        fields: bookings::NewBooking,
    ) -> Result<Booking, StoreError> {
        self.booking_repo().create(fields).await
    }

    /// Stamps the booking `checked-in` and merges guest document numbers by
    /// positional index. Returns `None` when the booking does not exist.
    pub async fn check_in_booking(
        &self,
        id: i64,
        documents: &[Option<String>],
    ) -> Result<Option<Booking>, StoreError> {
        self.booking_repo().check_in(id, documents).await
    }

    /// Stamps the booking `cancelled`. Returns `None` when the booking does
    /// not exist.
    pub async fn cancel_booking(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        self.booking_repo().cancel(id).await
    }
}

pub use bookings::NewBooking;
pub use hotels::NewHotel;
