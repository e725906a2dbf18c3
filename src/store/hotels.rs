use chrono::Utc;
use std::sync::Arc;

use super::{JsonFile, StoreError};
use crate::models::Hotel;

/// Fields accepted when creating a hotel.
#[derive(Debug)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub location: String,
    pub price: f64,
    pub image_url: String,
}

pub struct HotelRepository {
    file: Arc<JsonFile<Hotel>>,
}

impl HotelRepository {
    pub(crate) fn new(file: Arc<JsonFile<Hotel>>) -> Self {
        Self { file }
    }

    pub async fn list(&self) -> Vec<Hotel> {
        self.file.snapshot().await
    }

    pub async fn get(&self, id: i64) -> Option<Hotel> {
        self.file.find(|h| h.id == id).await
    }

    pub async fn create(&self, fields: NewHotel) -> Result<Hotel, StoreError> {
        self.file
            .mutate(|rows| {
                let now = Utc::now().to_rfc3339();
                let hotel = Hotel {
                    id: rows.allocate_id(),
                    name: fields.name,
                    description: fields.description,
                    location: fields.location,
                    price: fields.price,
                    image_url: fields.image_url,
                    created_at: now.clone(),
                    updated_at: now,
                };
                rows.push(hotel.clone());
                hotel
            })
            .await
    }
}
