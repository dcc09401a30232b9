use quiz_core::model::{AnswerRecord, Question, QuestionId, QuestionType, SubmittedAnswer};

/// One row of the post-quiz review.
///
/// Presentation-agnostic: the caller decides how to render answers and marks.
/// Unanswered questions are reported with `user_answer: None` and count as wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question_id: QuestionId,
    pub kind: QuestionType,
    pub question: String,
    pub user_answer: Option<SubmittedAnswer>,
    pub correct: bool,
    pub correct_answers: Vec<String>,
    pub explanation: Option<String>,
}

impl ReviewItem {
    #[must_use]
    pub fn new(number: usize, question: &Question, record: Option<&AnswerRecord>) -> Self {
        Self {
            number,
            question_id: question.id.clone(),
            kind: question.kind,
            question: question.question.clone(),
            user_answer: record.map(|r| r.user_answer.clone()),
            correct: record.is_some_and(|r| r.correct),
            correct_answers: question.correct_answers.clone(),
            explanation: question.explanation.clone(),
        }
    }
}
