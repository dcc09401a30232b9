use serde_json::Value;
use tracing::info;

use quiz_core::model::{User, UserId, UserUpdate};
use storage::LocalState;

use super::bearer_token;
use crate::api::ApiClient;
use crate::error::AdminError;

/// User management for admins.
#[derive(Clone)]
pub struct UserAdminService {
    api: ApiClient,
    state: LocalState,
}

impl UserAdminService {
    #[must_use]
    pub fn new(api: ApiClient, state: LocalState) -> Self {
        Self { api, state }
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` (including `MissingToken`) or `AdminError::Storage`.
    pub async fn list_users(&self) -> Result<Vec<User>, AdminError> {
        let token = bearer_token(&self.state).await?;
        Ok(self.api.list_users(&token).await?)
    }

    /// Update a user's names and role. Names are trimmed and must not be blank.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingField` for blank names, `AdminError::Api`,
    /// or `AdminError::Storage`.
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, AdminError> {
        let update = UserUpdate {
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            role: update.role,
        };
        if update.first_name.is_empty() {
            return Err(AdminError::MissingField("first name"));
        }
        if update.last_name.is_empty() {
            return Err(AdminError::MissingField("last name"));
        }

        let token = bearer_token(&self.state).await?;
        let user = self.api.update_user(&token, id, &update).await?;
        info!(user_id = %id, role = %user.role, "updated user");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` or `AdminError::Storage`.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AdminError> {
        let token = bearer_token(&self.state).await?;
        self.api.delete_user(&token, id).await?;
        info!(user_id = %id, "deleted user");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` or `AdminError::Storage`.
    pub async fn selected_topics(&self, id: UserId) -> Result<Value, AdminError> {
        let token = bearer_token(&self.state).await?;
        Ok(self.api.selected_topics(&token, id).await?)
    }
}
