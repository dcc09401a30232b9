use serde_json::Value;
use tracing::info;

use quiz_core::auth::{AuthContext, Credentials, Role, Route, landing_route};
use quiz_core::model::{NewUser, User};
use storage::LocalState;

use crate::api::{ApiClient, LoginResponse};
use crate::error::AuthError;

/// What a successful login resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: Option<User>,
    pub role: Role,
    pub landing: Route,
}

/// Login, logout, and sign-up against the API, with the session kept in `LocalState`.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    state: LocalState,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient, state: LocalState) -> Self {
        Self { api, state }
    }

    /// Log in and remember the token, profile, and role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` for malformed input (no request is made),
    /// `AuthError::Api` if the server rejects the login, or `AuthError::Storage`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let credentials = Credentials::new(email, password)?;
        let response = self.api.login(&credentials).await?;
        self.complete_login(response).await
    }

    /// Persist a login response and work out where the user lands.
    ///
    /// A response without a profile logs in as a regular user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for a blank token, or `AuthError::Storage`.
    pub async fn complete_login(&self, response: LoginResponse) -> Result<LoginOutcome, AuthError> {
        if response.access_token.trim().is_empty() {
            return Err(AuthError::MissingField("access_token"));
        }

        let role = response.user.as_ref().map_or(Role::User, |user| user.role);
        self.state.set_access_token(&response.access_token).await?;
        if let Some(user) = &response.user {
            self.state.set_user(user).await?;
        }
        self.state.set_role(role).await?;

        info!(%role, "logged in");
        Ok(LoginOutcome {
            user: response.user,
            role,
            landing: landing_route(role),
        })
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if local state cannot be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.state.clear_auth().await?;
        info!("logged out");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if local state cannot be read.
    pub async fn context(&self) -> Result<AuthContext, AuthError> {
        Ok(self.state.auth_context().await?)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Storage` if local state cannot be read.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.state.user().await?)
    }

    /// Create an account. Names are required; email and password follow the login rules.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` or `AuthError::Credentials` for bad input,
    /// or `AuthError::Api` if the server rejects the registration.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        if new_user.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("first name"));
        }
        if new_user.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("last name"));
        }
        let credentials = Credentials::new(&new_user.email, &new_user.password)?;
        let new_user = NewUser {
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            email: credentials.email().to_string(),
            password: new_user.password,
        };

        let user = self.api.register_user(&new_user).await?;
        info!(user_id = %user.id, "registered account");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for a blank email, or `AuthError::Api`.
    pub async fn send_register_code(&self, email: &str) -> Result<Value, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        Ok(self.api.send_register_code(email).await?)
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank input, or `AuthError::Api`.
    pub async fn verify_register_code(&self, email: &str, code: &str) -> Result<Value, AuthError> {
        let (email, code) = (email.trim(), code.trim());
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if code.is_empty() {
            return Err(AuthError::MissingField("code"));
        }
        Ok(self.api.verify_register_code(email, code).await?)
    }
}
