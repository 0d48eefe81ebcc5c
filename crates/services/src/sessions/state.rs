use std::collections::{BTreeMap, BTreeSet};

use quiz_core::model::{Classification, FeedbackMessage};

use super::countdown::Countdown;
use super::shuffle::SessionQuestion;

/// Feedback for the most recent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub message: FeedbackMessage,
    pub visible: bool,
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No quiz chosen yet.
    Selecting,
    /// A question is waiting for an answer.
    InProgress,
    /// Feedback is visible; in timed mode the countdown is running.
    Answered,
    /// Every question has been passed. Only a new session leaves this state.
    Completed,
}

/// Everything that changes while a participant takes one quiz.
///
/// Owned by the `SessionController`; readers get it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) ordered_questions: Vec<SessionQuestion>,
    pub(crate) current_index: usize,
    pub(crate) selection: BTreeSet<String>,
    pub(crate) answer_status: BTreeMap<usize, Classification>,
    pub(crate) correct_count: u32,
    pub(crate) incorrect_count: u32,
    pub(crate) feedback: Option<Feedback>,
    pub(crate) timer: Option<Countdown>,
}

impl SessionState {
    pub(crate) fn new(ordered_questions: Vec<SessionQuestion>, timer: Option<Countdown>) -> Self {
        Self {
            ordered_questions,
            current_index: 0,
            selection: BTreeSet::new(),
            answer_status: BTreeMap::new(),
            correct_count: 0,
            incorrect_count: 0,
            feedback: None,
            timer,
        }
    }

    #[must_use]
    pub fn ordered_questions(&self) -> &[SessionQuestion] {
        &self.ordered_questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&SessionQuestion> {
        self.ordered_questions.get(self.current_index)
    }

    #[must_use]
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Classification of question `index`, present once it has been evaluated.
    #[must_use]
    pub fn answer_status(&self, index: usize) -> Option<&Classification> {
        self.answer_status.get(&index)
    }

    #[must_use]
    pub fn evaluated_count(&self) -> usize {
        self.answer_status.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    #[must_use]
    pub fn timer(&self) -> Option<&Countdown> {
        self.timer.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.ordered_questions.len()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Completed
        } else if self.feedback.is_some_and(|f| f.visible) {
            SessionPhase::Answered
        } else {
            SessionPhase::InProgress
        }
    }

    pub(crate) fn record_verdict(&mut self, is_correct: bool) {
        if is_correct {
            self.correct_count = self.correct_count.saturating_add(1);
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
        }
    }

    pub(crate) fn hide_feedback(&mut self) {
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.visible = false;
        }
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
    }
}
