use serde::{Deserialize, Serialize};

/// Registered account as persisted in `users.json`.
///
/// Field names serialize in camelCase to match the on-disk and wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 hash in PHC string format. Stripped from every API response.
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}
