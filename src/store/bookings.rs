use chrono::Utc;
use std::sync::Arc;

use super::{JsonFile, StoreError};
use crate::models::{Booking, BookingStatus, Guest};

/// Fields accepted when creating a booking. Timestamps arrive already
/// normalized to RFC 3339 by the API boundary.
#[derive(Debug)]
pub struct NewBooking {
    pub user_id: i64,
    pub hotel_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub guest_names: Vec<String>,
}

pub struct BookingRepository {
    file: Arc<JsonFile<Booking>>,
}

impl BookingRepository {
    pub(crate) fn new(file: Arc<JsonFile<Booking>>) -> Self {
        Self { file }
    }

    pub async fn get(&self, id: i64) -> Option<Booking> {
        self.file.find(|b| b.id == id).await
    }

    pub async fn list_for_user(&self, user_id: i64) -> Vec<Booking> {
        self.file
            .snapshot()
            .await
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect()
    }

    /// Inserts a new `pending` booking. Guest sub-ids derive from the
    /// booking id and the guest's 1-based position as `id * 100 + position`,
    /// with the document number unset until check-in.
    pub async fn create(&self, fields: NewBooking) -> Result<Booking, StoreError> {
        self.file
            .mutate(|rows| {
                let id = rows.allocate_id();
                let guests = fields
                    .guest_names
                    .into_iter()
                    .enumerate()
                    .map(|(index, name)| Guest {
                        id: id * 100 + index as i64 + 1,
                        name,
                        aadhaar_no: None,
                    })
                    .collect();

                let now = Utc::now().to_rfc3339();
                let booking = Booking {
                    id,
                    user_id: fields.user_id,
                    hotel_id: fields.hotel_id,
                    check_in: fields.check_in,
                    check_out: fields.check_out,
                    status: BookingStatus::Pending,
                    guests,
                    created_at: now.clone(),
                    updated_at: now,
                };
                rows.push(booking.clone());
                booking
            })
            .await
    }

    /// Marks the booking checked-in, merging document numbers into the
    /// stored roster by position. A missing, null, or empty entry keeps the
    /// guest's prior value; entries beyond the roster length are ignored.
    pub async fn check_in(
        &self,
        id: i64,
        documents: &[Option<String>],
    ) -> Result<Option<Booking>, StoreError> {
        self.file
            .mutate(|rows| {
                let booking = rows.iter_mut().find(|b| b.id == id)?;

                for (index, guest) in booking.guests.iter_mut().enumerate() {
                    if let Some(doc) = documents.get(index).and_then(Option::as_deref)
                        && !doc.is_empty()
                    {
                        guest.aadhaar_no = Some(doc.to_string());
                    }
                }

                booking.status = BookingStatus::CheckedIn;
                booking.updated_at = Utc::now().to_rfc3339();
                Some(booking.clone())
            })
            .await
    }

    /// Marks the booking cancelled. No guard on the prior status: repeated
    /// calls only re-stamp `updatedAt`.
    pub async fn cancel(&self, id: i64) -> Result<Option<Booking>, StoreError> {
        self.file
            .mutate(|rows| {
                let booking = rows.iter_mut().find(|b| b.id == id)?;
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = Utc::now().to_rfc3339();
                Some(booking.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_repo(name: &str) -> BookingRepository {
        let path = std::env::temp_dir().join(format!(
            "innkeeper-bookings-test-{name}-{}.json",
            std::process::id()
        ));
        let _ = tokio::fs::remove_file(&path).await;
        BookingRepository::new(Arc::new(
            JsonFile::open(path, |b: &Booking| b.id).await.unwrap(),
        ))
    }

    fn new_booking(user_id: i64, guest_names: &[&str]) -> NewBooking {
        NewBooking {
            user_id,
            hotel_id: 1,
            check_in: "2026-09-01T12:00:00+00:00".to_string(),
            check_out: "2026-09-03T10:00:00+00:00".to_string(),
            guest_names: guest_names.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn guest_ids_derive_from_booking_id() {
        let repo = temp_repo("guest-ids").await;

        let booking = repo.create(new_booking(1, &["A", "B"])).await.unwrap();
        assert_eq!(booking.id, 1);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.guests[0].id, 101);
        assert_eq!(booking.guests[1].id, 102);
        assert!(booking.guests.iter().all(|g| g.aadhaar_no.is_none()));
    }

    #[tokio::test]
    async fn check_in_merges_documents_by_position() {
        let repo = temp_repo("check-in").await;
        repo.create(new_booking(1, &["A", "B", "C"])).await.unwrap();

        // Pre-fill guest B so a later sparse update can prove it is kept.
        let first = repo
            .check_in(1, &[None, Some("9999".to_string())])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, BookingStatus::CheckedIn);
        assert_eq!(first.guests[0].aadhaar_no, None);
        assert_eq!(first.guests[1].aadhaar_no.as_deref(), Some("9999"));

        // Shorter request than roster: C keeps its prior value; empty string
        // does not clear B.
        let second = repo
            .check_in(1, &[Some("1234".to_string()), Some(String::new())])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.guests[0].aadhaar_no.as_deref(), Some("1234"));
        assert_eq!(second.guests[1].aadhaar_no.as_deref(), Some("9999"));
        assert_eq!(second.guests[2].aadhaar_no, None);
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_unguarded() {
        let repo = temp_repo("cancel").await;
        repo.create(new_booking(1, &["A"])).await.unwrap();

        repo.check_in(1, &[]).await.unwrap().unwrap();
        let cancelled = repo.cancel(1).await.unwrap().unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let again = repo.cancel(1).await.unwrap().unwrap();
        assert_eq!(again.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn transitions_on_missing_booking_return_none() {
        let repo = temp_repo("missing").await;
        assert!(repo.check_in(42, &[]).await.unwrap().is_none());
        assert!(repo.cancel(42).await.unwrap().is_none());
    }
}
