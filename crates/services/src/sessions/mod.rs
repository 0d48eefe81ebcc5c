mod controller;
mod countdown;
mod policy;
mod progress;
mod shuffle;
mod state;
mod summary;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{EvaluationOutcome, SessionController, TickOutcome};
pub use countdown::{Countdown, CountdownHandle};
pub use policy::{
    Evaluation, EvaluationPolicy, ManualMultiSelect, TimedSingleSelect, classify, policy_for,
};
pub use progress::SessionProgress;
pub use shuffle::{SessionQuestion, shuffle_quiz};
pub use state::{Feedback, SessionPhase, SessionState};
pub use summary::SessionSummary;
pub use view::{FeedbackView, OptionView, QuestionView, SessionSnapshot};
