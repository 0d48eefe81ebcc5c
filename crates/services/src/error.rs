//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::SessionMode;
use quiz_core::model::QuizId;

/// Reasons a session operation was ignored.
///
/// An `Err` from any `SessionController` operation guarantees the session
/// state is exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no quiz has been selected")]
    NoActiveSession,
    #[error("session already completed")]
    Completed,
    #[error("question {index} has already been answered")]
    AlreadyAnswered { index: usize },
    #[error("{operation} is not available in {mode:?} mode")]
    UnsupportedInMode {
        operation: &'static str,
        mode: SessionMode,
    },
    #[error("option {0:?} is not offered by the current question")]
    UnknownOption(String),
    #[error("already at the {0} question")]
    AtBoundary(&'static str),
    #[error("no countdown is running")]
    NoCountdown,
    #[error("countdown tick does not belong to the current question")]
    StaleTick,
}

/// Errors emitted while loading quiz documents into a `QuizCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read quiz file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid quiz document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate quiz id {0}")]
    DuplicateId(QuizId),
    #[error("quiz {0} not found")]
    NotFound(QuizId),
}
