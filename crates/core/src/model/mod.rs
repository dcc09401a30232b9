mod answer;
mod content;
mod generation;
mod ids;
mod question;
mod summary;
mod user;

pub use answer::{AnswerError, AnswerRecord, AnswerSheet, SubmittedAnswer};
pub use content::{ContentUpload, UploadFile, UploadedContent, UploadedFile};
pub use generation::{GenerationError, GenerationOverrides, GenerationParams};
pub use ids::{JobId, ParseIdError, QuestionId, UserId};
pub use question::{Question, QuestionError, QuestionType, Quiz};
pub use summary::{QuizSummary, SummaryError};
pub use user::{NewUser, User, UserUpdate};
