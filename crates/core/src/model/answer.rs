use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Delimiter that joins multiple correct options in a stored answer string.
pub const CORRECT_ANSWER_DELIMITER: &str = ", ";

//
// ─── CORRECT ANSWER SET ────────────────────────────────────────────────────────
//

/// The set of option strings that count as correct for a question.
///
/// Decoded from the stored `"A, C"` form. An empty set is a data-quality
/// problem, not an error: nothing is ever classified as correct against it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorrectAnswerSet(BTreeSet<String>);

impl CorrectAnswerSet {
    /// Split `raw` on `", "`, trim every piece and drop empty pieces.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(CORRECT_ANSWER_DELIMITER)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.0.contains(option)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when `selection` holds every correct option and nothing else.
    ///
    /// Never true for an empty set.
    #[must_use]
    pub fn matches_exactly(&self, selection: &BTreeSet<String>) -> bool {
        !self.0.is_empty() && self.0 == *selection
    }
}

impl<S: Into<String>> FromIterator<S> for CorrectAnswerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

/// Per-option label computed when a question is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionStatus {
    /// The option belongs to the correct-answer set.
    Correct,
    /// The option was chosen but is not correct.
    Incorrect,
    /// Neither correct nor chosen.
    Default,
}

impl OptionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionStatus::Correct => "correct",
            OptionStatus::Incorrect => "incorrect",
            OptionStatus::Default => "default",
        }
    }
}

/// Labels for every option of one question, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    entries: Vec<(String, OptionStatus)>,
}

impl Classification {
    #[must_use]
    pub fn new(entries: Vec<(String, OptionStatus)>) -> Self {
        Self { entries }
    }

    /// Status of `option`, or `None` if the option is not part of the question.
    #[must_use]
    pub fn status_of(&self, option: &str) -> Option<OptionStatus> {
        self.entries
            .iter()
            .find(|(text, _)| text == option)
            .map(|(_, status)| *status)
    }

    /// Options labelled with `status`, in display order.
    #[must_use]
    pub fn options_with(&self, status: OptionStatus) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(text, _)| text.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Message shown to the participant after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackMessage {
    CorrectAnswer,
    WrongAnswer,
}

impl FeedbackMessage {
    #[must_use]
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Self::CorrectAnswer
        } else {
            Self::WrongAnswer
        }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::CorrectAnswer)
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackMessage::CorrectAnswer => f.write_str("Correct Answer"),
            FeedbackMessage::WrongAnswer => f.write_str("Wrong Answer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn parses_comma_space_delimited_answers() {
        let set = CorrectAnswerSet::parse("A, C");
        assert_eq!(set.len(), 2);
        assert!(set.contains("A"));
        assert!(set.contains("C"));
        assert!(!set.contains("B"));
    }

    #[test]
    fn trims_pieces_and_drops_blanks() {
        let set = CorrectAnswerSet::parse("  Paris ,  ,  Lyon  ");
        let expected: CorrectAnswerSet = ["Lyon", "Paris"].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn bare_comma_is_not_a_delimiter() {
        let set = CorrectAnswerSet::parse("1,000");
        assert_eq!(set.len(), 1);
        assert!(set.contains("1,000"));
    }

    #[test]
    fn blank_answer_decodes_to_empty_set() {
        assert!(CorrectAnswerSet::parse("   ").is_empty());
        assert!(CorrectAnswerSet::parse("").is_empty());
    }

    #[test]
    fn exact_match_requires_same_members() {
        let set = CorrectAnswerSet::parse("A, C");
        assert!(!set.matches_exactly(&selection(&["A"])));
        assert!(!set.matches_exactly(&selection(&["A", "B", "C"])));
        assert!(set.matches_exactly(&selection(&["C", "A"])));
    }

    #[test]
    fn empty_set_never_matches() {
        let set = CorrectAnswerSet::default();
        assert!(!set.matches_exactly(&BTreeSet::new()));
    }

    #[test]
    fn classification_lookup_and_filter() {
        let classification = Classification::new(vec![
            ("3".into(), OptionStatus::Incorrect),
            ("4".into(), OptionStatus::Correct),
            ("5".into(), OptionStatus::Default),
        ]);
        assert_eq!(classification.status_of("4"), Some(OptionStatus::Correct));
        assert_eq!(classification.status_of("6"), None);
        assert_eq!(classification.options_with(OptionStatus::Default), vec!["5"]);
    }

    #[test]
    fn feedback_message_text() {
        assert_eq!(FeedbackMessage::CorrectAnswer.to_string(), "Correct Answer");
        assert_eq!(FeedbackMessage::from_correct(false).to_string(), "Wrong Answer");
    }
}
