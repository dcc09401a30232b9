/// Aggregated view of session progress, useful for UI.
///
/// `position` is 1-based and refers to the question currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of questions answered, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction_answered(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_quiz() {
        let progress = SessionProgress {
            position: 1,
            total: 0,
            answered: 0,
            remaining: 0,
            is_complete: true,
        };
        assert_eq!(progress.fraction_answered(), 0.0);
    }

    #[test]
    fn fraction_counts_answered() {
        let progress = SessionProgress {
            position: 3,
            total: 4,
            answered: 2,
            remaining: 2,
            is_complete: false,
        };
        assert_eq!(progress.fraction_answered(), 0.5);
    }
}
