use thiserror::Error;

use crate::auth::CredentialsError;
use crate::grading::GradingError;
use crate::model::{AnswerError, GenerationError, QuestionError, SummaryError};

/// Any validation failure raised by the domain layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenerationParams, JobId};

    fn check_params(params: &GenerationParams) -> Result<(), Error> {
        params.validate()?;
        Ok(())
    }

    #[test]
    fn layer_errors_convert_into_domain_error() {
        let params = GenerationParams::new(JobId::new("j")).with_num_questions(0);
        let err = check_params(&params).unwrap_err();
        assert!(matches!(err, Error::Generation(GenerationError::NoQuestions)));
        assert_eq!(err.to_string(), "at least one question must be requested");
    }
}
