use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::model::{GenerationOverrides, GenerationParams};
use storage::{LocalState, StoredQuiz};

use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;
use crate::generator::QuizGenerator;

/// Orchestrates quiz generation, persistence, and resumption around `QuizSession`.
///
/// The controller itself never touches storage; this service is the only place
/// a generated quiz is written, and it writes before the session sees the quiz.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    state: LocalState,
    generator: Arc<dyn QuizGenerator>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(clock: Clock, state: LocalState, generator: Arc<dyn QuizGenerator>) -> Self {
        Self {
            clock,
            state,
            generator,
        }
    }

    /// Generate a quiz, persist it with its job id, and start a session over it.
    ///
    /// Any previously stored quiz is dropped before the request is made.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidParams` for unusable parameters,
    /// `SessionError::Generation` if the request fails, or `SessionError::Storage`.
    pub async fn generate(&self, params: GenerationParams) -> Result<QuizSession, SessionError> {
        params.validate()?;
        self.state.clear_quiz().await?;
        let quiz = self
            .generator
            .create_quiz(&params)
            .await
            .map_err(SessionError::Generation)?;

        if quiz.is_empty() {
            warn!(job_id = %params.job_id, "generator returned an empty quiz");
        }

        self.state.set_job_id(&params.job_id).await?;
        self.state
            .save_quiz(&StoredQuiz::new(quiz.clone(), params.clone()))
            .await?;
        info!(job_id = %params.job_id, questions = quiz.len(), "quiz generated");

        Ok(QuizSession::load(quiz, self.clock).with_params(params))
    }

    /// Start a session over the stored quiz, or an empty one if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if local state cannot be read.
    pub async fn resume(&self) -> Result<QuizSession, SessionError> {
        let Some(stored) = self.state.load_quiz().await? else {
            info!("no stored quiz; starting empty session");
            return Ok(QuizSession::empty(self.clock));
        };

        let session = QuizSession::load(stored.quiz, self.clock);
        Ok(match stored.generation {
            Some(params) => session.with_params(params),
            None => session,
        })
    }

    /// Parameters a regeneration would use, with `overrides` applied on top.
    ///
    /// The stored job id decides the job. The session's own parameters are reused
    /// when they belong to that job; otherwise generation defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingJobId` if no job id is stored.
    pub async fn regeneration_params(
        &self,
        session: &QuizSession,
        overrides: GenerationOverrides,
    ) -> Result<GenerationParams, SessionError> {
        let job_id = self
            .state
            .job_id()
            .await?
            .ok_or(SessionError::MissingJobId)?;
        let base = session
            .params()
            .filter(|params| params.job_id == job_id)
            .cloned()
            .unwrap_or_else(|| GenerationParams::new(job_id));
        Ok(base.apply(overrides))
    }

    /// Replace the session's quiz with a freshly generated one.
    ///
    /// The new quiz is persisted before the session is touched. Any failure
    /// leaves both the session and the stored quiz as they were.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingJobId`, `SessionError::InvalidParams`,
    /// `SessionError::Generation`, or `SessionError::Storage`.
    pub async fn regenerate(
        &self,
        session: &mut QuizSession,
        overrides: GenerationOverrides,
    ) -> Result<(), SessionError> {
        let params = self.regeneration_params(session, overrides).await?;
        params.validate()?;

        info!(job_id = %params.job_id, questions = params.num_questions, "regenerating quiz");
        let quiz = self
            .generator
            .create_quiz(&params)
            .await
            .map_err(SessionError::Generation)?;

        self.state
            .save_quiz(&StoredQuiz::new(quiz.clone(), params.clone()))
            .await?;
        session.replace_quiz(quiz, params);
        Ok(())
    }
}
