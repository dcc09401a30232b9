//! Correctness rules for submitted answers.

use thiserror::Error;

use crate::model::{Question, QuestionType, SubmittedAnswer};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GradingError {
    #[error("{kind} expects a set of options")]
    ExpectedMultiple { kind: QuestionType },

    #[error("{kind} expects a single answer")]
    ExpectedSingle { kind: QuestionType },
}

/// Check that the answer shape fits the question type and canonicalize it.
///
/// Free-text answers are trimmed; choice answers are kept verbatim.
///
/// # Errors
///
/// Returns `GradingError` when a set is submitted for a single-answer type or vice versa.
pub fn normalize(
    kind: QuestionType,
    answer: SubmittedAnswer,
) -> Result<SubmittedAnswer, GradingError> {
    match (kind.expects_multiple(), answer) {
        (true, answer @ SubmittedAnswer::Multiple(_)) => Ok(answer),
        (true, SubmittedAnswer::Single(_)) => Err(GradingError::ExpectedMultiple { kind }),
        (false, SubmittedAnswer::Multiple(_)) => Err(GradingError::ExpectedSingle { kind }),
        (false, SubmittedAnswer::Single(value)) if kind.is_free_text() => {
            Ok(SubmittedAnswer::Single(value.trim().to_string()))
        }
        (false, answer @ SubmittedAnswer::Single(_)) => Ok(answer),
    }
}

/// Decide whether a (normalized) answer is correct.
///
/// - `mcq_multi`: the sorted submission must equal the sorted correct answers.
/// - everything else: the submission must be one of the correct answers.
/// - no correct answers at all: always incorrect.
#[must_use]
pub fn is_correct(question: &Question, answer: &SubmittedAnswer) -> bool {
    if question.is_ungradable() {
        return false;
    }

    match answer {
        SubmittedAnswer::Multiple(selected) if question.kind.expects_multiple() => {
            let mut selected: Vec<&str> = selected.iter().map(String::as_str).collect();
            let mut expected: Vec<&str> =
                question.correct_answers.iter().map(String::as_str).collect();
            selected.sort_unstable();
            expected.sort_unstable();
            selected == expected
        }
        SubmittedAnswer::Single(value) if !question.kind.expects_multiple() => {
            question.correct_answers.iter().any(|c| c == value)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi(correct: &[&str]) -> Question {
        Question::new("m", QuestionType::McqMulti, "Pick all")
            .with_options(["A", "B", "C", "D"])
            .with_correct_answers(correct.iter().copied())
    }

    #[test]
    fn multi_select_ignores_order_on_both_sides() {
        let q1 = multi(&["A", "C"]);
        let q2 = multi(&["C", "A"]);
        for q in [&q1, &q2] {
            assert!(is_correct(q, &SubmittedAnswer::multiple(["A", "C"])));
            assert!(is_correct(q, &SubmittedAnswer::multiple(["C", "A"])));
        }
    }

    #[test]
    fn multi_select_requires_exact_set() {
        let q = multi(&["A", "C"]);
        assert!(!is_correct(&q, &SubmittedAnswer::multiple(["A"])));
        assert!(!is_correct(&q, &SubmittedAnswer::multiple(["A", "C", "D"])));
        assert!(!is_correct(&q, &SubmittedAnswer::multiple(Vec::<String>::new())));
    }

    #[test]
    fn single_answer_is_membership_not_first_element() {
        let q = Question::new("s", QuestionType::AnswerShortQuestion, "Name one")
            .with_correct_answers(["Paris", "paris"]);
        assert!(is_correct(&q, &SubmittedAnswer::single("paris")));
        assert!(!is_correct(&q, &SubmittedAnswer::single("PARIS")));
    }

    #[test]
    fn empty_correct_answers_never_pass() {
        let q = Question::new("e", QuestionType::TrueFalse, "?").with_options(["True", "False"]);
        assert!(!is_correct(&q, &SubmittedAnswer::single("True")));
        assert!(!is_correct(&q, &SubmittedAnswer::single("False")));
        assert!(!is_correct(&q, &SubmittedAnswer::single("")));
    }

    #[test]
    fn normalize_trims_free_text_only() {
        let trimmed =
            normalize(QuestionType::AnswerShortQuestion, SubmittedAnswer::single("  Paris ")).unwrap();
        assert_eq!(trimmed, SubmittedAnswer::single("Paris"));

        let kept = normalize(QuestionType::McqSingle, SubmittedAnswer::single(" A")).unwrap();
        assert_eq!(kept, SubmittedAnswer::single(" A"));
    }

    #[test]
    fn normalize_rejects_wrong_shape() {
        let err = normalize(QuestionType::McqMulti, SubmittedAnswer::single("A")).unwrap_err();
        assert!(matches!(err, GradingError::ExpectedMultiple { .. }));

        let err = normalize(QuestionType::TrueFalse, SubmittedAnswer::multiple(["True"])).unwrap_err();
        assert!(matches!(err, GradingError::ExpectedSingle { .. }));
    }
}
