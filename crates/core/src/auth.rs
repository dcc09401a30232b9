//! Roles and route authorization.
//!
//! Access decisions take an explicit [`AuthContext`] instead of reading shared
//! state, so every caller states whose permissions it is checking.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ROLE ─────────────────────────────────────────────────────────────────────
//

/// Account role as reported by the API.
///
/// Parsing is case-insensitive and lenient: anything that is not `admin` or
/// `tutor` is treated as a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Tutor,
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tutor => "tutor",
            Role::User => "user",
        }
    }

    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "tutor" => Role::Tutor,
            _ => Role::User,
        }
    }

    /// Admins and tutors manage course content.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Tutor)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse_lenient(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CONTEXT ──────────────────────────────────────────────────────────────────
//

/// Who is asking. `None` means nobody is logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthContext {
    role: Option<Role>,
}

impl AuthContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { role: None }
    }

    #[must_use]
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }
}

//
// ─── ROUTES ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    SignUp,
    QuizGenerate,
    Quiz,
    AdminUsers,
    AdminUploadContent,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::SignUp => "/signup",
            Route::QuizGenerate => "/quiz_generate",
            Route::Quiz => "/quizzes",
            Route::AdminUsers => "/admin/users",
            Route::AdminUploadContent => "/admin/upload-content",
        }
    }

    /// Resolve a path, falling back to `Home` for anything unknown.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/signup" => Route::SignUp,
            "/quiz_generate" => Route::QuizGenerate,
            "/quizzes" => Route::Quiz,
            "/admin" | "/admin/users" => Route::AdminUsers,
            "/admin/upload-content" => Route::AdminUploadContent,
            _ => Route::Home,
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Decide whether `ctx` may open `route`.
///
/// User management is admin-only; content upload is open to staff. Everything
/// else is public. Denied requests are sent to the login page.
#[must_use]
pub fn authorize(route: Route, ctx: &AuthContext) -> Access {
    let allowed = match route {
        Route::AdminUsers => ctx.role() == Some(Role::Admin),
        Route::AdminUploadContent => ctx.role().is_some_and(Role::is_staff),
        Route::Home | Route::Login | Route::SignUp | Route::QuizGenerate | Route::Quiz => true,
    };

    if allowed {
        Access::Allow
    } else {
        Access::Redirect(Route::Login)
    }
}

/// Where a freshly logged-in user lands.
#[must_use]
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminUsers,
        Role::Tutor => Route::AdminUploadContent,
        Role::User => Route::Home,
    }
}

//
// ─── CREDENTIALS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("email is required")]
    MissingEmail,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Login form input, checked before it is sent anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub const MIN_PASSWORD_LEN: usize = 6;

    /// # Errors
    ///
    /// Returns `CredentialsError` if the email is blank or malformed or the password is too short.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsError::MissingEmail);
        }
        if !looks_like_email(email) {
            return Err(CredentialsError::InvalidEmail);
        }
        if password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort {
                min: Self::MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
