use quiz_core::auth::Credentials;
use quiz_core::model::{NewUser, User, UserId, UserUpdate};
use serde_json::Value;

use super::ApiClient;
use super::wire::{EmailBody, LoginWire, RegisterBody, UpdateUserBody, UserWire, VerifyCodeBody};
use crate::error::ApiError;

/// Token and profile returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Option<User>,
}

impl ApiClient {
    /// OAuth2 password-grant login.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the credentials are rejected or the request fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let form = [
            ("grant_type", "password"),
            ("username", credentials.email()),
            ("password", credentials.password()),
            ("scope", ""),
            ("client_id", ""),
            ("client_secret", ""),
        ];
        let request = self.client.post(self.url("log_in")).form(&form);
        let body: LoginWire = self.send_json(request).await?;
        Ok(LoginResponse {
            access_token: body.access_token,
            user: body.user.map(User::from),
        })
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the registration.
    pub async fn register_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let body = RegisterBody {
            first_name: &new_user.first_name,
            last_name: &new_user.last_name,
            email: &new_user.email,
            password: &new_user.password,
        };
        let request = self.client.post(self.url("users")).json(&body);
        let created: UserWire = self.send_json(request).await?;
        Ok(created.into())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let request = self.client.get(self.url("users")).bearer_auth(token);
        let users: Vec<UserWire> = self.send_json(request).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn update_user(
        &self,
        token: &str,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<User, ApiError> {
        let body = UpdateUserBody {
            first_name: &update.first_name,
            last_name: &update.last_name,
            role: update.role.as_str(),
        };
        let request = self
            .client
            .put(self.url(&format!("users/{id}")))
            .bearer_auth(token)
            .json(&body);
        let updated: UserWire = self.send_json(request).await?;
        Ok(updated.into())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn delete_user(&self, token: &str, id: UserId) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("users/{id}")))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }

    /// Topics a user picked for quiz generation; returned as the server sends them.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    pub async fn selected_topics(&self, token: &str, id: UserId) -> Result<Value, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("users/{id}/selected-topics")))
            .bearer_auth(token);
        self.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the request.
    pub async fn send_register_code(&self, email: &str) -> Result<Value, ApiError> {
        let request = self
            .client
            .post(self.url("register/send-code"))
            .json(&EmailBody { email });
        self.send_json(request).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the code.
    pub async fn verify_register_code(&self, email: &str, code: &str) -> Result<Value, ApiError> {
        let request = self
            .client
            .post(self.url("register/verify-code"))
            .json(&VerifyCodeBody { email, code });
        self.send_json(request).await
    }
}
