use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::JobId;
use crate::model::question::QuestionType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("at least one question must be requested")]
    NoQuestions,

    #[error("too many questions requested: {requested} (max {max})")]
    TooManyQuestions { requested: u32, max: u32 },

    #[error("at least one question type must be selected")]
    NoTypes,
}

/// Parameters for a quiz-generation request, kept so a quiz can be regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default = "GenerationParams::default_num_questions")]
    pub num_questions: u32,
    #[serde(default = "GenerationParams::default_types")]
    pub types: Vec<QuestionType>,
    #[serde(default)]
    pub topic_hint: String,
}

impl GenerationParams {
    pub const DEFAULT_NUM_QUESTIONS: u32 = 12;
    pub const MAX_NUM_QUESTIONS: u32 = 100;

    fn default_num_questions() -> u32 {
        Self::DEFAULT_NUM_QUESTIONS
    }

    fn default_types() -> Vec<QuestionType> {
        QuestionType::ALL.to_vec()
    }

    /// Defaults: 12 questions of every type, no topic hint.
    #[must_use]
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            student_id: None,
            num_questions: Self::DEFAULT_NUM_QUESTIONS,
            types: Self::default_types(),
            topic_hint: String::new(),
        }
    }

    #[must_use]
    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    #[must_use]
    pub fn with_num_questions(mut self, num_questions: u32) -> Self {
        self.num_questions = num_questions;
        self
    }

    #[must_use]
    pub fn with_types(mut self, types: Vec<QuestionType>) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub fn with_topic_hint(mut self, topic_hint: impl Into<String>) -> Self {
        self.topic_hint = topic_hint.into();
        self
    }

    /// Apply per-request overrides on top of these parameters.
    #[must_use]
    pub fn apply(mut self, overrides: GenerationOverrides) -> Self {
        if let Some(num_questions) = overrides.num_questions {
            self.num_questions = num_questions;
        }
        if let Some(types) = overrides.types {
            self.types = types;
        }
        if let Some(topic_hint) = overrides.topic_hint {
            self.topic_hint = topic_hint;
        }
        if let Some(student_id) = overrides.student_id {
            self.student_id = Some(student_id);
        }
        self
    }

    /// # Errors
    ///
    /// Returns `GenerationError` if the question count is out of range or no types are selected.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.num_questions == 0 {
            return Err(GenerationError::NoQuestions);
        }
        if self.num_questions > Self::MAX_NUM_QUESTIONS {
            return Err(GenerationError::TooManyQuestions {
                requested: self.num_questions,
                max: Self::MAX_NUM_QUESTIONS,
            });
        }
        if self.types.is_empty() {
            return Err(GenerationError::NoTypes);
        }
        Ok(())
    }
}

/// Fields a caller may change when regenerating a quiz for the same job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOverrides {
    pub num_questions: Option<u32>,
    pub types: Option<Vec<QuestionType>>,
    pub topic_hint: Option<String>,
    pub student_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_all_types() {
        let params = GenerationParams::new(JobId::new("job"));
        assert_eq!(params.num_questions, 12);
        assert_eq!(params.types.len(), 4);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn serializes_request_body_in_camel_case() {
        let params = GenerationParams::new(JobId::new("job-1"))
            .with_student_id("s123")
            .with_types(vec![QuestionType::TrueFalse])
            .with_topic_hint("recursion");
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["jobId"], "job-1");
        assert_eq!(json["studentId"], "s123");
        assert_eq!(json["numQuestions"], 12);
        assert_eq!(json["types"][0], "true_false");
        assert_eq!(json["topicHint"], "recursion");
    }

    #[test]
    fn student_id_is_omitted_when_absent() {
        let json = serde_json::to_value(GenerationParams::new(JobId::new("j"))).unwrap();
        assert!(json.get("studentId").is_none());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let params = GenerationParams::new(JobId::new("j"))
            .with_topic_hint("graphs")
            .apply(GenerationOverrides {
                num_questions: Some(5),
                ..GenerationOverrides::default()
            });

        assert_eq!(params.num_questions, 5);
        assert_eq!(params.topic_hint, "graphs");
        assert_eq!(params.types.len(), 4);
    }

    #[test]
    fn validate_rejects_empty_requests() {
        let none = GenerationParams::new(JobId::new("j")).with_num_questions(0);
        assert_eq!(none.validate(), Err(GenerationError::NoQuestions));

        let no_types = GenerationParams::new(JobId::new("j")).with_types(Vec::new());
        assert_eq!(no_types.validate(), Err(GenerationError::NoTypes));
    }
}
