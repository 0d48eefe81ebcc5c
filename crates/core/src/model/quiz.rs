use serde::{Deserialize, Serialize};

use crate::model::answer::CorrectAnswerSet;
use crate::model::ids::QuizId;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question as stored by the quiz store.
///
/// `correct_answer` keeps the stored string form (`"A, C"`); decode it with
/// [`Question::correct_answers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    question_text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
}

impl Question {
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer: correct_answer.into(),
        }
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> CorrectAnswerSet {
        CorrectAnswerSet::parse(&self.correct_answer)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A titled, ordered list of questions. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<QuizId>,
    title: String,
    #[serde(default)]
    questions: Vec<Question>,
}

impl Quiz {
    #[must_use]
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: None,
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: QuizId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&QuizId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
