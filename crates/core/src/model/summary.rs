use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { total: u32, correct: u32 },

    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },
}

/// Final report for a finished quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    total: u32,
    correct: u32,
    incorrect: u32,
    accuracy_percent: f64,
}

impl QuizSummary {
    /// Build a summary from counts.
    ///
    /// Questions without a correct answer count as incorrect, so
    /// `incorrect = total - correct`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::CountMismatch` if `correct > total`.
    pub fn from_counts(total: u32, correct: u32) -> Result<Self, SummaryError> {
        if correct > total {
            return Err(SummaryError::CountMismatch { total, correct });
        }

        Ok(Self {
            total,
            correct,
            incorrect: total - correct,
            accuracy_percent: accuracy_percent(correct, total),
        })
    }

    /// Build a summary from `usize` counts as held by a session.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::TooManyQuestions` if a count does not fit in `u32`,
    /// or `SummaryError::CountMismatch` if `correct > total`.
    pub fn from_usize(total: usize, correct: usize) -> Result<Self, SummaryError> {
        let total_u32 =
            u32::try_from(total).map_err(|_| SummaryError::TooManyQuestions { len: total })?;
        let correct_u32 =
            u32::try_from(correct).map_err(|_| SummaryError::TooManyQuestions { len: correct })?;
        Self::from_counts(total_u32, correct_u32)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Percentage of correct answers rounded to one decimal place.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy_percent
    }
}

// Zero questions yields 0.0 rather than NaN.
fn accuracy_percent(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = f64::from(correct) / f64::from(total);
    (ratio * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_of_three_rounds_to_one_decimal() {
        let summary = QuizSummary::from_counts(3, 2).unwrap();
        assert_eq!(summary.accuracy_percent(), 66.7);
        assert_eq!(summary.incorrect(), 1);
    }

    #[test]
    fn counts_always_add_up() {
        for total in 0..=12_u32 {
            for correct in 0..=total {
                let s = QuizSummary::from_counts(total, correct).unwrap();
                assert_eq!(s.correct() + s.incorrect(), s.total());
            }
        }
    }

    #[test]
    fn zero_total_is_guarded() {
        let summary = QuizSummary::from_counts(0, 0).unwrap();
        assert_eq!(summary.accuracy_percent(), 0.0);
    }

    #[test]
    fn perfect_score_is_one_hundred() {
        let summary = QuizSummary::from_usize(1, 1).unwrap();
        assert_eq!(summary.accuracy_percent(), 100.0);
    }

    #[test]
    fn rejects_more_correct_than_total() {
        let err = QuizSummary::from_counts(2, 3).unwrap_err();
        assert_eq!(err, SummaryError::CountMismatch { total: 2, correct: 3 });
    }
}
