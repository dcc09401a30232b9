use std::sync::Arc;

use quiz_core::auth::{AuthContext, Role};
use quiz_core::model::{GenerationParams, JobId, Quiz, User};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::repository::{InMemoryStore, KeyValueStore, StorageError};

/// Well-known keys of the persisted client state.
pub mod keys {
    pub const GENERATED_QUIZ: &str = "generated_quiz";
    pub const JOB_ID: &str = "job_id";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const USER: &str = "user";
    pub const ROLE: &str = "role";
}

/// A generated quiz together with the request that produced it.
///
/// The quiz fields sit at the top level so a bare API response also reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuiz {
    #[serde(flatten)]
    pub quiz: Quiz,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationParams>,
}

impl StoredQuiz {
    #[must_use]
    pub fn new(quiz: Quiz, generation: GenerationParams) -> Self {
        Self {
            quiz,
            generation: Some(generation),
        }
    }
}

/// Typed view over the client's key-value state.
///
/// Passed explicitly to the services that need it; nothing reads the store ambiently.
#[derive(Clone)]
pub struct LocalState {
    store: Arc<dyn KeyValueStore>,
}

impl LocalState {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    // ─── Quiz ────────────────────────────────────────────────────────────────

    /// Read the stored quiz.
    ///
    /// Unreadable JSON is treated like a missing quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store itself fails.
    pub async fn load_quiz(&self) -> Result<Option<StoredQuiz>, StorageError> {
        let Some(raw) = self.store.get(keys::GENERATED_QUIZ).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<StoredQuiz>(&raw) {
            Ok(stored) => Ok(Some(stored)),
            Err(err) => {
                warn!(error = %err, "stored quiz is unreadable; treating as missing");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be encoded or written.
    pub async fn save_quiz(&self, stored: &StoredQuiz) -> Result<(), StorageError> {
        let raw = serde_json::to_string(stored)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(keys::GENERATED_QUIZ, &raw).await?;
        debug!(questions = stored.quiz.len(), "stored generated quiz");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear_quiz(&self) -> Result<(), StorageError> {
        self.store.remove(keys::GENERATED_QUIZ).await
    }

    // ─── Job ─────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn job_id(&self) -> Result<Option<JobId>, StorageError> {
        Ok(self
            .store
            .get(keys::JOB_ID)
            .await?
            .and_then(|raw| raw.parse::<JobId>().ok()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_job_id(&self, job_id: &JobId) -> Result<(), StorageError> {
        self.store.set(keys::JOB_ID, job_id.as_str()).await
    }

    // ─── Auth ────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(keys::ACCESS_TOKEN)
            .await?
            .filter(|token| !token.trim().is_empty()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(keys::ACCESS_TOKEN, token).await
    }

    /// Read the logged-in profile. Unreadable JSON reads as logged out.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.store.get(keys::USER).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "stored user profile is unreadable");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be encoded or written.
    pub async fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(user).map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(keys::USER, &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn role(&self) -> Result<Option<Role>, StorageError> {
        Ok(self
            .store
            .get(keys::ROLE)
            .await?
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| Role::parse_lenient(&raw)))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_role(&self, role: Role) -> Result<(), StorageError> {
        self.store.set(keys::ROLE, role.as_str()).await
    }

    /// Authorization context for whoever is logged in.
    ///
    /// A role without a token does not count as logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn auth_context(&self) -> Result<AuthContext, StorageError> {
        if self.access_token().await?.is_none() {
            return Ok(AuthContext::anonymous());
        }
        Ok(self
            .role()
            .await?
            .map_or_else(AuthContext::anonymous, AuthContext::with_role))
    }

    /// Forget the token, profile, and role.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear_auth(&self) -> Result<(), StorageError> {
        self.store.remove(keys::ACCESS_TOKEN).await?;
        self.store.remove(keys::USER).await?;
        self.store.remove(keys::ROLE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionType, UserId};

    fn sample_quiz() -> Quiz {
        Quiz::new(
            "Sample",
            vec![
                Question::new("q1", QuestionType::TrueFalse, "?")
                    .with_options(["True", "False"])
                    .with_correct_answers(["True"]),
            ],
        )
    }

    #[tokio::test]
    async fn quiz_round_trips_with_params() {
        let state = LocalState::in_memory();
        let params = GenerationParams::new(JobId::new("job-1")).with_topic_hint("sets");
        let stored = StoredQuiz::new(sample_quiz(), params.clone());

        state.save_quiz(&stored).await.unwrap();
        let loaded = state.load_quiz().await.unwrap().unwrap();

        assert_eq!(loaded.quiz, sample_quiz());
        assert_eq!(loaded.generation, Some(params));
    }

    #[tokio::test]
    async fn bare_api_response_reads_back() {
        let state = LocalState::in_memory();
        state
            .store()
            .set(
                keys::GENERATED_QUIZ,
                r#"{"title":"Raw","questions":[{"id":"a","type":"mcq_single","question":"?","options":["x"],"correctAnswers":["x"]}]}"#,
            )
            .await
            .unwrap();

        let loaded = state.load_quiz().await.unwrap().unwrap();
        assert_eq!(loaded.quiz.title, "Raw");
        assert_eq!(loaded.generation, None);
    }

    #[tokio::test]
    async fn corrupt_quiz_reads_as_missing() {
        let state = LocalState::in_memory();
        state
            .store()
            .set(keys::GENERATED_QUIZ, "{not json")
            .await
            .unwrap();
        assert_eq!(state.load_quiz().await.unwrap(), None);
    }

    #[tokio::test]
    async fn auth_context_requires_token() {
        let state = LocalState::in_memory();
        state.set_role(Role::Admin).await.unwrap();
        assert_eq!(state.auth_context().await.unwrap(), AuthContext::anonymous());

        state.set_access_token("tok").await.unwrap();
        assert_eq!(
            state.auth_context().await.unwrap(),
            AuthContext::with_role(Role::Admin)
        );

        state
            .set_user(&User {
                id: UserId::new(9),
                first_name: "A".into(),
                last_name: "B".into(),
                email: "a@b.io".into(),
                role: Role::Admin,
                is_active: true,
            })
            .await
            .unwrap();
        state.clear_auth().await.unwrap();

        assert_eq!(state.access_token().await.unwrap(), None);
        assert_eq!(state.user().await.unwrap(), None);
        assert_eq!(state.role().await.unwrap(), None);
    }

    #[tokio::test]
    async fn job_id_round_trips() {
        let state = LocalState::in_memory();
        assert_eq!(state.job_id().await.unwrap(), None);
        state.set_job_id(&JobId::new("j-7")).await.unwrap();
        assert_eq!(state.job_id().await.unwrap(), Some(JobId::new("j-7")));
    }
}
