pub mod booking;
pub mod hotel;
pub mod user;

pub use booking::{Booking, BookingStatus, Guest};
pub use hotel::Hotel;
pub use user::User;
