#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use catalog::{QuizCatalog, QuizListItem};
pub use error::{CatalogError, SessionError};

pub use sessions::{
    CountdownHandle, EvaluationOutcome, Feedback, FeedbackView, OptionView, QuestionView,
    SessionController, SessionPhase, SessionProgress, SessionQuestion, SessionSnapshot,
    SessionState, SessionSummary, TickOutcome,
};
