use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {0} already has an answer")]
    AlreadyAnswered(QuestionId),
}

/// Raw input submitted for one question.
///
/// `mcq_multi` questions take a set of options; every other type takes a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl SubmittedAnswer {
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    #[must_use]
    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multiple(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// True when nothing was actually chosen or typed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(value) => value.trim().is_empty(),
            Self::Multiple(values) => values.is_empty(),
        }
    }
}

impl fmt::Display for SubmittedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value),
            Self::Multiple(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Stored outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub user_answer: SubmittedAnswer,
    pub correct: bool,
}

/// Answers recorded so far in a session, keyed by question id.
///
/// Entries are write-once: a question that already has a record cannot be re-answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    records: HashMap<QuestionId, AnswerRecord>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for a question.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::AlreadyAnswered` if the question already has a record.
    pub fn record(&mut self, id: QuestionId, record: AnswerRecord) -> Result<(), AnswerError> {
        if self.records.contains_key(&id) {
            return Err(AnswerError::AlreadyAnswered(id));
        }
        self.records.insert(id, record);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.records.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.records.values().filter(|r| r.correct).count()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_write_once() {
        let mut sheet = AnswerSheet::new();
        let id = QuestionId::new("q1");
        let first = AnswerRecord {
            user_answer: SubmittedAnswer::single("A"),
            correct: true,
        };
        sheet.record(id.clone(), first.clone()).unwrap();

        let err = sheet
            .record(
                id.clone(),
                AnswerRecord {
                    user_answer: SubmittedAnswer::single("B"),
                    correct: false,
                },
            )
            .unwrap_err();

        assert_eq!(err, AnswerError::AlreadyAnswered(id.clone()));
        assert_eq!(sheet.get(&id), Some(&first));
        assert_eq!(sheet.correct_count(), 1);
    }

    #[test]
    fn display_joins_multiple_answers() {
        let answer = SubmittedAnswer::multiple(["B", "A"]);
        assert_eq!(answer.to_string(), "B, A");
        assert!(!answer.is_blank());
        assert!(SubmittedAnswer::single("  ").is_blank());
    }
}
