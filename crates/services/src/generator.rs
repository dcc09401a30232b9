use async_trait::async_trait;

use quiz_core::model::{GenerationParams, Quiz};

use crate::api::ApiClient;
use crate::error::ApiError;

/// Source of freshly generated quizzes.
///
/// The session controller only sees this trait, so regeneration can be driven
/// by the real API or by a test double.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Request a new quiz for the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the quiz cannot be produced.
    async fn create_quiz(&self, params: &GenerationParams) -> Result<Quiz, ApiError>;
}

#[async_trait]
impl QuizGenerator for ApiClient {
    async fn create_quiz(&self, params: &GenerationParams) -> Result<Quiz, ApiError> {
        ApiClient::create_quiz(self, params).await
    }
}
