use chrono::{DateTime, Duration, Utc};

use quiz_core::model::{QuizId, SessionId};

/// Final tally of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub quiz_id: Option<QuizId>,
    pub title: String,
    pub total_questions: usize,
    pub evaluated: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionSummary {
    #[must_use]
    pub fn duration(&self) -> Duration {
        (self.completed_at - self.started_at).max(Duration::zero())
    }

    /// Share of counted evaluations that were correct, or `None` if nothing
    /// was counted.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let counted = u64::from(self.correct) + u64::from(self.incorrect);
        if counted == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(u64::from(self.correct) as f64 / counted as f64)
    }
}
