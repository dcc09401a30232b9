use quiz_core::model::{GenerationParams, JobId, Quiz};
use tracing::info;

use super::ApiClient;
use super::wire::JobIdWire;
use crate::error::ApiError;

impl ApiClient {
    /// Request a freshly generated quiz for an uploaded-content job.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    pub async fn create_quiz(&self, params: &GenerationParams) -> Result<Quiz, ApiError> {
        info!(
            job_id = %params.job_id,
            num_questions = params.num_questions,
            "requesting quiz generation"
        );
        let request = self.client.post(self.url("quizzes")).json(params);
        let quiz: Quiz = self.send_json(request).await?;
        info!(questions = quiz.len(), title = %quiz.title, "quiz generated");
        Ok(quiz)
    }

    /// Pick a random uploaded-content job to generate from.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    pub async fn random_job_id(&self) -> Result<JobId, ApiError> {
        let request = self.client.get(self.url("random_upload_id"));
        let body: JobIdWire = self.send_json(request).await?;
        Ok(body.job_id)
    }
}
