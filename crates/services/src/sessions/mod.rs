mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{Feedback, QuizSession, SessionState, SessionStatus};
pub use view::ReviewItem;
pub use workflow::QuizSessionService;
