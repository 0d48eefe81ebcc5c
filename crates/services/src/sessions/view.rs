use quiz_core::SessionMode;
use quiz_core::model::{FeedbackMessage, OptionStatus};

use super::state::{SessionPhase, SessionState};

/// Presentation-agnostic read model of a session.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings and
/// no styling decisions. A renderer reads everything it needs from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub mode: SessionMode,
    pub title: Option<String>,
    pub question: Option<QuestionView>,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub feedback: Option<FeedbackView>,
    /// Remaining countdown while one is running.
    pub countdown_remaining: Option<u32>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<OptionView>,
    pub answered: bool,
}

impl QuestionView {
    /// 1-based position for display.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub text: String,
    /// Classification, once the question has been evaluated.
    pub status: Option<OptionStatus>,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackView {
    pub message: FeedbackMessage,
    pub visible: bool,
}

impl SessionSnapshot {
    /// Snapshot before any quiz has been chosen.
    #[must_use]
    pub fn selecting(mode: SessionMode) -> Self {
        Self {
            phase: SessionPhase::Selecting,
            mode,
            title: None,
            question: None,
            correct_count: 0,
            incorrect_count: 0,
            feedback: None,
            countdown_remaining: None,
            is_complete: false,
        }
    }

    #[must_use]
    pub fn from_state(title: &str, mode: SessionMode, state: &SessionState) -> Self {
        let question = state.current_question().map(|question| {
            let index = state.current_index();
            let status = state.answer_status(index);
            QuestionView {
                index,
                total: state.ordered_questions().len(),
                text: question.question_text().to_owned(),
                options: question
                    .options()
                    .iter()
                    .map(|option| OptionView {
                        text: option.clone(),
                        status: status.and_then(|c| c.status_of(option)),
                        selected: state.selection().contains(option),
                    })
                    .collect(),
                answered: status.is_some(),
            }
        });

        let countdown_remaining = state
            .timer()
            .filter(|timer| timer.is_running())
            .map(|timer| timer.remaining());

        Self {
            phase: state.phase(),
            mode,
            title: Some(title.to_owned()),
            question,
            correct_count: state.correct_count(),
            incorrect_count: state.incorrect_count(),
            feedback: state.feedback().map(|f| FeedbackView {
                message: f.message,
                visible: f.visible,
            }),
            countdown_remaining,
            is_complete: state.is_complete(),
        }
    }

    /// Feedback message to show right now, if any.
    #[must_use]
    pub fn visible_feedback(&self) -> Option<FeedbackMessage> {
        self.feedback.filter(|f| f.visible).map(|f| f.message)
    }
}
