use serde::{Deserialize, Serialize};

/// Hotel record as persisted in `hotels.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price: f64,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}
