#![forbid(unsafe_code)]

pub mod admin;
pub mod api;
pub mod auth_service;
pub mod error;
pub mod generator;
pub mod sessions;

pub use quiz_core::Clock;

pub use admin::{ContentService, UserAdminService};
pub use api::{ApiClient, ApiConfig, LoginResponse};
pub use auth_service::{AuthService, LoginOutcome};
pub use error::{AdminError, ApiError, AuthError, SessionError};
pub use generator::QuizGenerator;
pub use sessions::{
    Feedback, QuizSession, QuizSessionService, ReviewItem, SessionProgress, SessionState,
    SessionStatus,
};
