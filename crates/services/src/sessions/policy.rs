use std::collections::BTreeSet;
use std::fmt;

use quiz_core::SessionMode;
use quiz_core::model::{Classification, CorrectAnswerSet, FeedbackMessage, OptionStatus};

use super::shuffle::SessionQuestion;

/// Result of evaluating the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub classification: Classification,
    pub message: FeedbackMessage,
}

/// Label every option of `question` against its correct set and the chosen
/// options.
///
/// Correct options are always labelled `correct`, whether chosen or not.
#[must_use]
pub fn classify(question: &SessionQuestion, chosen: &BTreeSet<String>) -> Classification {
    let correct = question.correct_answers();
    Classification::new(
        question
            .options()
            .iter()
            .map(|option| {
                let status = if correct.contains(option) {
                    OptionStatus::Correct
                } else if chosen.contains(option) {
                    OptionStatus::Incorrect
                } else {
                    OptionStatus::Default
                };
                (option.clone(), status)
            })
            .collect(),
    )
}

/// Evaluation and navigation rules of one session mode.
pub trait EvaluationPolicy: fmt::Debug + Send + Sync {
    fn mode(&self) -> SessionMode;

    /// Verdict for the chosen options against the correct set.
    fn is_correct(&self, correct: &CorrectAnswerSet, chosen: &BTreeSet<String>) -> bool;

    /// Whether exactly one option is submitted per answer, as opposed to a
    /// selection that is built up and then checked.
    fn is_single_select(&self) -> bool;

    /// Whether feedback starts an auto-advance countdown.
    fn uses_countdown(&self) -> bool;

    /// Whether the participant moves between questions by hand.
    fn allows_navigation(&self) -> bool;

    /// Whether an evaluated question may be evaluated again.
    fn allows_reevaluation(&self) -> bool;

    fn evaluate(&self, question: &SessionQuestion, chosen: &BTreeSet<String>) -> Evaluation {
        Evaluation {
            classification: classify(question, chosen),
            message: FeedbackMessage::from_correct(
                self.is_correct(question.correct_answers(), chosen),
            ),
        }
    }
}

/// One option per question, answered once, followed by auto-advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedSingleSelect;

impl EvaluationPolicy for TimedSingleSelect {
    fn mode(&self) -> SessionMode {
        SessionMode::Timed
    }

    fn is_correct(&self, correct: &CorrectAnswerSet, chosen: &BTreeSet<String>) -> bool {
        chosen.len() == 1 && chosen.iter().all(|option| correct.contains(option))
    }

    fn is_single_select(&self) -> bool {
        true
    }

    fn uses_countdown(&self) -> bool {
        true
    }

    fn allows_navigation(&self) -> bool {
        false
    }

    fn allows_reevaluation(&self) -> bool {
        false
    }
}

/// Any number of options, checked for exact set equality on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualMultiSelect;

impl EvaluationPolicy for ManualMultiSelect {
    fn mode(&self) -> SessionMode {
        SessionMode::Manual
    }

    fn is_correct(&self, correct: &CorrectAnswerSet, chosen: &BTreeSet<String>) -> bool {
        correct.matches_exactly(chosen)
    }

    fn is_single_select(&self) -> bool {
        false
    }

    fn uses_countdown(&self) -> bool {
        false
    }

    fn allows_navigation(&self) -> bool {
        true
    }

    fn allows_reevaluation(&self) -> bool {
        true
    }
}

/// Policy for `mode`.
#[must_use]
pub fn policy_for(mode: SessionMode) -> Box<dyn EvaluationPolicy> {
    match mode {
        SessionMode::Timed => Box::new(TimedSingleSelect),
        SessionMode::Manual => Box::new(ManualMultiSelect),
    }
}
