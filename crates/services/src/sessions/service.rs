use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::grading;
use quiz_core::model::{
    AnswerError, AnswerRecord, AnswerSheet, GenerationParams, Question, QuestionId, Quiz,
    QuizSummary, SubmittedAnswer,
};

use super::progress::SessionProgress;
use super::view::ReviewItem;
use crate::error::SessionError;
use crate::generator::QuizGenerator;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Feedback raised by a submission, shown until acknowledged with `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub question_id: QuestionId,
    pub correct: bool,
}

/// Snapshot of the mutable part of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub answers: AnswerSheet,
    pub finished: bool,
}

impl SessionState {
    fn fresh(quiz: &Quiz) -> Self {
        Self {
            current_index: 0,
            answers: AnswerSheet::new(),
            finished: quiz.is_empty(),
        }
    }
}

/// Coarse session phase, for choosing what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No quiz loaded; nothing to answer.
    Empty,
    InProgress,
    AwaitingAcknowledgement,
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a generated quiz, from load to summary.
///
/// Answers are write-once. After each submission the session holds feedback
/// until `advance` is called, which moves to the first unanswered question in
/// original order. The session finishes as soon as every question has an answer.
pub struct QuizSession {
    quiz: Quiz,
    params: Option<GenerationParams>,
    state: SessionState,
    feedback: Option<Feedback>,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `quiz`. An empty quiz yields a finished, empty session.
    #[must_use]
    pub fn load(quiz: Quiz, clock: Clock) -> Self {
        let state = SessionState::fresh(&quiz);
        let started_at = clock.now();
        Self {
            quiz,
            params: None,
            state,
            feedback: None,
            clock,
            started_at,
            completed_at: None,
        }
    }

    /// The "no quiz found" session.
    #[must_use]
    pub fn empty(clock: Clock) -> Self {
        Self::load(Quiz::empty(), clock)
    }

    /// Remember the parameters the quiz was generated with.
    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.quiz.title
    }

    #[must_use]
    pub fn params(&self) -> Option<&GenerationParams> {
        self.params.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.state.answers
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.quiz.is_empty() {
            SessionStatus::Empty
        } else if self.feedback.is_some() {
            SessionStatus::AwaitingAcknowledgement
        } else if self.state.finished {
            SessionStatus::Finished
        } else {
            SessionStatus::InProgress
        }
    }

    /// The question on screen, if the session is still running.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.state.finished {
            return None;
        }
        self.quiz.questions.get(self.state.current_index)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.len();
        let answered = self.state.answers.len();
        SessionProgress {
            position: self.state.current_index + 1,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.state.finished,
        }
    }

    /// Grade and record an answer for `id`.
    ///
    /// Free-text answers are trimmed first. A question without correct answers
    /// is recorded as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once every question is answered (or the quiz is empty),
    /// `SessionError::FeedbackPending` until the previous feedback is acknowledged,
    /// `SessionError::UnknownQuestion` / `SessionError::AlreadyAnswered` for bad ids,
    /// and `SessionError::AnswerShapeMismatch` if a set is sent for a single-answer
    /// question or vice versa.
    pub fn submit_answer(
        &mut self,
        id: &QuestionId,
        input: SubmittedAnswer,
    ) -> Result<Feedback, SessionError> {
        if self.state.finished {
            return Err(SessionError::Finished);
        }
        if self.feedback.is_some() {
            return Err(SessionError::FeedbackPending);
        }
        let question = self
            .quiz
            .question(id)
            .ok_or_else(|| SessionError::UnknownQuestion(id.clone()))?;
        if self.state.answers.contains(id) {
            return Err(SessionError::AlreadyAnswered(id.clone()));
        }

        let user_answer = grading::normalize(question.kind, input)?;
        if question.is_ungradable() {
            warn!(question_id = %id, "question has no correct answers; marking incorrect");
        }
        let correct = grading::is_correct(question, &user_answer);

        self.state
            .answers
            .record(
                id.clone(),
                AnswerRecord {
                    user_answer,
                    correct,
                },
            )
            .map_err(|err| match err {
                AnswerError::AlreadyAnswered(id) => SessionError::AlreadyAnswered(id),
                _ => SessionError::AlreadyAnswered(id.clone()),
            })?;

        debug!(question_id = %id, correct, "answer recorded");

        if self.all_answered() {
            self.state.finished = true;
            self.completed_at = Some(self.clock.now());
            debug!(total = self.quiz.len(), "every question answered");
        }

        let feedback = Feedback {
            question_id: id.clone(),
            correct,
        };
        self.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Submit an answer for the question currently on screen.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::submit_answer`].
    pub fn submit_current(&mut self, input: SubmittedAnswer) -> Result<Feedback, SessionError> {
        let id = self
            .current_question()
            .map(|q| q.id.clone())
            .ok_or(SessionError::Finished)?;
        self.submit_answer(&id, input)
    }

    /// Acknowledge feedback and move to the first unanswered question.
    ///
    /// The scan runs in original order, so skipped questions come back before
    /// later ones. Finishes the session if nothing is left.
    pub fn advance(&mut self) -> SessionStatus {
        self.feedback = None;
        if self.state.finished {
            return self.status();
        }

        match self.first_unanswered() {
            Some(index) => {
                self.state.current_index = index;
                debug!(index, "advanced to next unanswered question");
            }
            None => {
                self.state.finished = true;
                self.completed_at = Some(self.clock.now());
            }
        }
        self.status()
    }

    /// Move to the next position, wrapping to the start. Never records an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` if there is nothing left to skip through,
    /// or `SessionError::FeedbackPending` while feedback is showing.
    pub fn skip(&mut self) -> Result<usize, SessionError> {
        if self.state.finished {
            return Err(SessionError::Finished);
        }
        if self.feedback.is_some() {
            return Err(SessionError::FeedbackPending);
        }
        self.state.current_index = (self.state.current_index + 1) % self.quiz.len();
        debug!(index = self.state.current_index, "skipped question");
        Ok(self.state.current_index)
    }

    /// Final counts and accuracy.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` while questions remain.
    pub fn compute_summary(&self) -> Result<QuizSummary, SessionError> {
        if !self.state.finished {
            return Err(SessionError::NotFinished);
        }
        Ok(QuizSummary::from_usize(
            self.quiz.len(),
            self.state.answers.correct_count(),
        )?)
    }

    /// Per-question report in original order.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| ReviewItem::new(i + 1, q, self.state.answers.get(&q.id)))
            .collect()
    }

    /// Retry the same quiz from scratch.
    pub fn restart(&mut self) {
        self.reset();
        debug!("session restarted");
    }

    /// Swap in a new quiz and start over. Used once the new quiz is safely in hand.
    pub fn replace_quiz(&mut self, quiz: Quiz, params: GenerationParams) {
        self.quiz = quiz;
        self.params = Some(params);
        self.reset();
        info!(questions = self.quiz.len(), "quiz replaced");
    }

    /// Request a new quiz and, only if that succeeds, replace the current one.
    ///
    /// The session is borrowed exclusively for the whole request, so a second
    /// regeneration cannot start while one is in flight.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidParams` for unusable parameters and
    /// `SessionError::Generation` if the request fails. In both cases the
    /// session is left exactly as it was.
    pub async fn regenerate(
        &mut self,
        generator: &dyn QuizGenerator,
        params: GenerationParams,
    ) -> Result<(), SessionError> {
        params.validate()?;
        let quiz = generator
            .create_quiz(&params)
            .await
            .map_err(SessionError::Generation)?;
        self.replace_quiz(quiz, params);
        Ok(())
    }

    fn reset(&mut self) {
        self.state = SessionState::fresh(&self.quiz);
        self.feedback = None;
        self.started_at = self.clock.now();
        self.completed_at = None;
    }

    fn all_answered(&self) -> bool {
        self.quiz
            .questions
            .iter()
            .all(|q| self.state.answers.contains(&q.id))
    }

    fn first_unanswered(&self) -> Option<usize> {
        self.quiz
            .questions
            .iter()
            .position(|q| !self.state.answers.contains(&q.id))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("title", &self.quiz.title)
            .field("questions_len", &self.quiz.len())
            .field("current_index", &self.state.current_index)
            .field("answered", &self.state.answers.len())
            .field("finished", &self.state.finished)
            .field("feedback", &self.feedback)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
