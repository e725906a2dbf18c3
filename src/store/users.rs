use chrono::Utc;
use std::sync::Arc;

use super::{JsonFile, StoreError};
use crate::models::User;

pub struct UserRepository {
    file: Arc<JsonFile<User>>,
}

impl UserRepository {
    pub(crate) fn new(file: Arc<JsonFile<User>>) -> Self {
        Self { file }
    }

    pub async fn get(&self, id: i64) -> Option<User> {
        self.file.find(|u| u.id == id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.file.find(|u| u.email == email).await
    }

    /// Inserts a new user. The uniqueness check and the insert happen under
    /// one lock acquisition, so two concurrent registrations with the same
    /// email cannot both succeed.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.file
            .mutate(|rows| {
                if rows.iter().any(|u| u.email == email) {
                    return Err(StoreError::DuplicateEmail);
                }

                let now = Utc::now().to_rfc3339();
                let user = User {
                    id: rows.allocate_id(),
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password_hash.to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                rows.push(user.clone());
                Ok(user)
            })
            .await?
    }
}
