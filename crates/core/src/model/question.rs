use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("unknown question type: {0}")]
    UnknownType(String),
}

//
// ─── QUESTION TYPE ────────────────────────────────────────────────────────────
//

/// Answer format of a generated question.
///
/// Serialized with the snake_case tags the generation API emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Pick exactly one option.
    McqSingle,
    /// Pick every correct option; graded as a set.
    McqMulti,
    /// Pick "True" or "False".
    TrueFalse,
    /// Free-text answer, no options.
    AnswerShortQuestion,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::McqSingle,
        QuestionType::McqMulti,
        QuestionType::TrueFalse,
        QuestionType::AnswerShortQuestion,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::McqSingle => "mcq_single",
            QuestionType::McqMulti => "mcq_multi",
            QuestionType::TrueFalse => "true_false",
            QuestionType::AnswerShortQuestion => "answer_short_question",
        }
    }

    /// Whether answers for this type are a set of options rather than one value.
    #[must_use]
    pub fn expects_multiple(self) -> bool {
        matches!(self, QuestionType::McqMulti)
    }

    /// Whether the question is answered by typing rather than choosing.
    #[must_use]
    pub fn is_free_text(self) -> bool {
        matches!(self, QuestionType::AnswerShortQuestion)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| QuestionError::UnknownType(s.to_string()))
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single generated question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub question: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "scalars_as_text")]
    pub correct_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: QuestionType, question: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            kind,
            question: question.into(),
            options: Vec::new(),
            correct_answers: Vec::new(),
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_correct_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correct_answers = answers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// A question with no correct answers can never be passed.
    #[must_use]
    pub fn is_ungradable(&self) -> bool {
        self.correct_answers.is_empty()
    }
}

//
// ─── QUIZ ─────────────────────────────────────────────────────────────────────
//

fn default_title() -> String {
    "Quiz".to_string()
}

/// An ordered set of questions returned by the generation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default = "default_title", deserialize_with = "null_as_default_title")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            questions,
        }
    }

    /// The "no quiz" state: nothing to answer.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(default_title(), Vec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Position of a question in original order.
    #[must_use]
    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }
}

//
// ─── SERDE HELPERS ────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Bool(true) => "True".to_string(),
            Scalar::Bool(false) => "False".to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

// Correct answers are compared as text; generators sometimes emit bare
// booleans or numbers.
fn scalars_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw: Option<Vec<Scalar>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Scalar::into_text)
        .collect())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let title: Option<String> = Option::deserialize(deserializer)?;
    Ok(title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(default_title))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generated_quiz_payload() {
        let json = r#"{
            "title": "Week 3",
            "questions": [
                {"id": "q1", "type": "true_false", "question": "Sky is blue?",
                 "options": ["True", "False"], "correctAnswers": ["True"]},
                {"id": 2, "type": "answer_short_question", "question": "Capital of France?",
                 "correctAnswers": ["Paris"], "explanation": "It is Paris."}
            ]
        }"#;

        let quiz: Quiz = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.title, "Week 3");
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.questions[0].kind, QuestionType::TrueFalse);
        assert_eq!(quiz.questions[1].id.as_str(), "2");
        assert!(quiz.questions[1].options.is_empty());
        assert_eq!(quiz.questions[1].explanation.as_deref(), Some("It is Paris."));
    }

    #[test]
    fn missing_title_and_questions_default() {
        let quiz: Quiz = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(quiz.title, "Quiz");
        assert!(quiz.is_empty());
    }

    #[test]
    fn non_text_correct_answers_become_text() {
        let json = r#"{"id": "q", "type": "true_false", "question": "?",
                       "correctAnswers": [true, 3]}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.correct_answers, vec!["True", "3"]);
    }

    #[test]
    fn null_correct_answers_are_ungradable() {
        let json = r#"{"id": "q", "type": "mcq_single", "question": "?", "correctAnswers": null}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert!(question.is_ungradable());
    }

    #[test]
    fn question_type_parses_wire_tags() {
        assert_eq!(
            "mcq_multi".parse::<QuestionType>().unwrap(),
            QuestionType::McqMulti
        );
        let err = "essay".parse::<QuestionType>().unwrap_err();
        assert!(matches!(err, QuestionError::UnknownType(_)));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let q = Question::new("q1", QuestionType::McqSingle, "Pick")
            .with_options(["a", "b"])
            .with_correct_answers(["a"]);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "mcq_single");
        assert_eq!(json["correctAnswers"][0], "a");
    }
}
