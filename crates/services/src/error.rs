//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::auth::CredentialsError;
use quiz_core::grading::GradingError;
use quiz_core::model::{GenerationError, QuestionId, SummaryError};
use storage::StorageError;

/// Errors emitted by `ApiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("access token not found, please log in")]
    MissingToken,
    #[error("{message}")]
    HttpStatus {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Errors emitted by the quiz session controller and workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz already finished")]
    Finished,
    #[error("quiz is not finished yet")]
    NotFinished,
    #[error("acknowledge the current feedback first")]
    FeedbackPending,
    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),
    #[error("question {0} was already answered")]
    AlreadyAnswered(QuestionId),
    #[error(transparent)]
    AnswerShapeMismatch(#[from] GradingError),
    #[error("no job id found; generate a quiz first")]
    MissingJobId,
    #[error(transparent)]
    InvalidParams(#[from] GenerationError),
    #[error("failed to generate quiz: {0}")]
    Generation(#[source] ApiError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the admin services (`UserService`, `ContentService`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("at least one file is required")]
    NoFiles,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
